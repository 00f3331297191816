//! Page-lifecycle scripts for the `session` command.
//!
//! A script names the page origin and lists host events in delivery order:
//!
//! ```yaml
//! origin: https://example.com
//! events:
//!   - event: ready
//!     path: /pages/tourfinal.html?category=city-tour
//!   - event: append_link
//!     group: 0
//!     href: /pages/tourfinal.html?category=omo-valley
//!     text: Omo Valley
//!   - event: popstate
//!     path: /pages/about.html
//!   - event: unload
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

/// One host event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// The document finished loading at `path`.
    Ready {
        /// Path and query of the page.
        path: String,
    },
    /// History navigation to `path`.
    Popstate {
        /// Path and query navigated to.
        path: String,
    },
    /// A link was inserted into the navigation.
    AppendLink {
        /// Index of the desktop group to insert into; top level when absent.
        #[serde(default)]
        group: Option<usize>,
        /// Link target.
        href: String,
        /// Link text.
        text: String,
    },
    /// The page is being unloaded.
    Unload,
}

/// An origin plus the events delivered to one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScript {
    /// Page origin that event paths are resolved against.
    pub origin: String,
    /// Events in delivery order.
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

impl SessionScript {
    /// Parses a script from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or the origin is not an
    /// absolute URL.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let script: Self =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse session script: {e}"))?;
        script.origin_url()?;
        Ok(script)
    }

    /// Loads a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read session script {}: {e}", path.display()))?;
        Self::from_yaml(&content).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// The parsed origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is not an absolute URL.
    pub fn origin_url(&self) -> Result<Url, String> {
        Url::parse(&self.origin).map_err(|e| format!("Invalid origin {}: {e}", self.origin))
    }

    /// Resolves an event path against the origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin or the path is invalid.
    pub fn page_url(&self, path: &str) -> Result<Url, String> {
        self.origin_url()?.join(path).map_err(|e| format!("Invalid page path {path}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "\
origin: https://example.com
events:
  - event: ready
    path: /pages/tourfinal.html?category=city-tour
  - event: append_link
    group: 0
    href: /pages/tourfinal.html?category=omo-valley
    text: Omo Valley
  - event: append_link
    href: /pages/blog.html
    text: Blog
  - event: popstate
    path: /pages/about.html
  - event: unload
";

    #[test]
    fn parses_every_event_kind() {
        let script = SessionScript::from_yaml(SCRIPT).unwrap();
        assert_eq!(script.events.len(), 5);
        assert_eq!(
            script.events[0],
            ScriptEvent::Ready { path: "/pages/tourfinal.html?category=city-tour".into() }
        );
        assert!(matches!(script.events[1], ScriptEvent::AppendLink { group: Some(0), .. }));
        assert!(matches!(script.events[2], ScriptEvent::AppendLink { group: None, .. }));
        assert_eq!(script.events[4], ScriptEvent::Unload);
    }

    #[test]
    fn page_url_joins_origin() {
        let script = SessionScript::from_yaml(SCRIPT).unwrap();
        let url = script.page_url("/pages/about.html?tab=team").unwrap();
        assert_eq!(url.as_str(), "https://example.com/pages/about.html?tab=team");
    }

    #[test]
    fn relative_origin_is_rejected() {
        let err = SessionScript::from_yaml("origin: /pages\nevents: []\n").unwrap_err();
        assert!(err.contains("Invalid origin"));
    }

    #[test]
    fn unknown_event_is_rejected() {
        let yaml = "origin: https://example.com\nevents:\n  - event: resize\n";
        assert!(SessionScript::from_yaml(yaml).is_err());
    }
}
