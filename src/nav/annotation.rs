//! Active annotations and the class tokens that express them.

use serde::{Deserialize, Serialize};

use crate::ports::ElementId;

/// Visual marker for an element on the current page's navigation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveAnnotation {
    /// Underline style for top-level controls and links.
    TopLevelActive,
    /// Accent style for links inside a dropdown.
    SubActive,
}

impl ActiveAnnotation {
    /// Short name used in command output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLevelActive => "top-level",
            Self::SubActive => "sub",
        }
    }
}

/// Class tokens applied for each annotation kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationClasses {
    /// Tokens for [`ActiveAnnotation::TopLevelActive`].
    pub top_level: Vec<String>,
    /// Tokens for [`ActiveAnnotation::SubActive`].
    pub sub: Vec<String>,
}

impl Default for AnnotationClasses {
    fn default() -> Self {
        Self {
            top_level: vec!["border-b-2".into(), "border-red-600".into(), "pb-1".into()],
            sub: vec!["text-red-600".into(), "font-semibold".into()],
        }
    }
}

impl AnnotationClasses {
    /// Tokens for one annotation kind.
    #[must_use]
    pub fn tokens(&self, annotation: ActiveAnnotation) -> &[String] {
        match annotation {
            ActiveAnnotation::TopLevelActive => &self.top_level,
            ActiveAnnotation::SubActive => &self.sub,
        }
    }

    /// Every token either annotation can leave on a link.
    #[must_use]
    pub fn link_tokens(&self) -> Vec<String> {
        self.top_level.iter().chain(&self.sub).cloned().collect()
    }

    /// Reads back the annotation an element carries from its class list.
    ///
    /// An element carrying every top-level token reports `TopLevelActive`
    /// even if it also carries sub tokens.
    #[must_use]
    pub fn classify(&self, classes: &[String]) -> Option<ActiveAnnotation> {
        let has_all = |tokens: &[String]| {
            !tokens.is_empty() && tokens.iter().all(|t| classes.contains(t))
        };
        if has_all(&self.top_level) {
            Some(ActiveAnnotation::TopLevelActive)
        } else if has_all(&self.sub) {
            Some(ActiveAnnotation::SubActive)
        } else {
            None
        }
    }
}

/// One annotation applied during a resolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    /// The element that received the annotation.
    pub element: ElementId,
    /// The annotation kind.
    pub annotation: ActiveAnnotation,
    /// The matching link, when the mark was promoted to its group toggle.
    pub promoted_from: Option<ElementId>,
}
