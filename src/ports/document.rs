//! Element-provider port for the navigation region of a page.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to an element owned by a [`NavDocument`].
///
/// Handles are only meaningful to the document that issued them and stay
/// stable for the lifetime of the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three element families the resolver cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Desktop dropdown trigger (`nav .relative.group > button`).
    TopLevelControl,
    /// Mobile menu toggle (`nav button.mobile-dropdown-toggle`).
    MobileControl,
    /// Anchor with an `href` inside the navigation region.
    Link,
}

/// Read and class-write access to the navigation region of a document.
///
/// Abstracting the document lets the resolver run against synthetic
/// fixtures, recording wrappers, and the live browser DOM alike. Hosts are
/// single-threaded, so implementations are not required to be `Send`.
pub trait NavDocument {
    /// Returns `true` if the document has a navigation root to observe.
    fn has_nav_root(&self) -> bool;

    /// Returns every element of the given kind, in document order.
    fn query(&self, kind: ElementKind) -> Vec<ElementId>;

    /// Returns the element's full text content.
    fn text_content(&self, element: ElementId) -> Option<String>;

    /// Returns the text of a nested label node (a `span` inside a button),
    /// or `None` when the element has no such child.
    fn label_text(&self, element: ElementId) -> Option<String>;

    /// Returns the raw `href` attribute value.
    fn href(&self, element: ElementId) -> Option<String>;

    /// Returns the toggle control of the nearest enclosing menu group.
    fn group_toggle(&self, element: ElementId) -> Option<ElementId>;

    /// Adds class tokens to an element. Tokens already present are kept.
    fn add_classes(&mut self, element: ElementId, classes: &[String]);

    /// Removes class tokens from an element. Absent tokens are ignored.
    fn remove_classes(&mut self, element: ElementId, classes: &[String]);
}

impl<D: NavDocument + ?Sized> NavDocument for &mut D {
    fn has_nav_root(&self) -> bool {
        (**self).has_nav_root()
    }

    fn query(&self, kind: ElementKind) -> Vec<ElementId> {
        (**self).query(kind)
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        (**self).text_content(element)
    }

    fn label_text(&self, element: ElementId) -> Option<String> {
        (**self).label_text(element)
    }

    fn href(&self, element: ElementId) -> Option<String> {
        (**self).href(element)
    }

    fn group_toggle(&self, element: ElementId) -> Option<ElementId> {
        (**self).group_toggle(element)
    }

    fn add_classes(&mut self, element: ElementId, classes: &[String]) {
        (**self).add_classes(element, classes);
    }

    fn remove_classes(&mut self, element: ElementId, classes: &[String]) {
        (**self).remove_classes(element, classes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_id_displays_with_hash() {
        assert_eq!(ElementId(7).to_string(), "#7");
    }

    #[test]
    fn element_kind_uses_snake_case_in_yaml() {
        let yaml = serde_yaml::to_string(&ElementKind::TopLevelControl).unwrap();
        assert_eq!(yaml.trim(), "top_level_control");
    }
}
