//! Site configuration.
//!
//! Everything the resolver treats as site-specific lives here: the home
//! document, the section table, the promotion rule, and the class tokens.
//! Every field has a default matching the tourism site, so an empty YAML
//! file is a valid configuration.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::nav::annotation::AnnotationClasses;
use crate::nav::rules::{PromotionRule, RuleTable};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "NAVMARK_CONFIG";

/// Site-specific resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// File name of the home document (`index.html`).
    pub home_document: String,
    /// Section rules, in evaluation order.
    pub sections: RuleTable,
    /// Parent-promotion rule for subpages.
    pub promotion: PromotionRule,
    /// Class tokens for each annotation kind.
    pub classes: AnnotationClasses,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            home_document: "index.html".to_string(),
            sections: RuleTable::default(),
            promotion: PromotionRule::default(),
            classes: AnnotationClasses::default(),
        }
    }
}

impl SiteConfig {
    /// Parses a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse site config: {e}"))?;
        config.home_document = config.home_document.to_lowercase();
        config.sections.lowercase_paths();
        config.promotion.lowercase_paths();
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read site config {}: {e}", path.display()))?;
        Self::from_yaml(&content).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Resolves the configuration from an explicit path, then
    /// `NAVMARK_CONFIG`, then the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured file cannot be loaded.
    pub fn discover(path: Option<&Path>) -> Result<Self, String> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => {
                debug!(%path, "loading site config from {CONFIG_ENV}");
                Self::load(Path::new(&path))
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::rules::SectionMatch;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(SiteConfig::from_yaml("").unwrap(), SiteConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = SiteConfig::from_yaml(
            "home_document: Home.HTML\nclasses:\n  top_level: [active]\n",
        )
        .unwrap();
        assert_eq!(config.home_document, "home.html");
        assert_eq!(config.classes.top_level, ["active"]);
        assert_eq!(config.classes.sub, AnnotationClasses::default().sub);
        assert_eq!(config.sections, RuleTable::default());
    }

    #[test]
    fn sections_replace_the_default_table() {
        let config = SiteConfig::from_yaml(
            "sections:\n  - path: /pages/blog.html\n    label: Blog\n  - path: /pages/faq.html\n    label: FAQ\n    match: href\n",
        )
        .unwrap();
        assert_eq!(config.sections.len(), 2);
        let faq = config.sections.first_match("/pages/faq.html").unwrap();
        assert_eq!(faq.matching, SectionMatch::Href);
    }

    #[test]
    fn mixed_case_paths_match_lowercased_urls() {
        let config = SiteConfig::from_yaml(
            "sections:\n  - path: /Pages/Blog.html\n    label: Blog\npromotion:\n  family: /Company\n  subpage: /Company-\n  canonical: /Company.HTML\n",
        )
        .unwrap();
        let blog = config.sections.first_match("/pages/blog.html").unwrap();
        assert_eq!(blog.path, "/pages/blog.html");
        assert!(config.promotion.applies("/pages/company-history.html"));
        assert!(!config.promotion.applies("/pages/company.html"));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = SiteConfig::from_yaml("sections: 3").unwrap_err();
        assert!(err.contains("Failed to parse site config"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SiteConfig::load(Path::new("/nonexistent/navmark.yaml")).unwrap_err();
        assert!(err.contains("Failed to read site config"));
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let dir = std::env::temp_dir().join("navmark_config_discover");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("site.yaml");
        std::fs::write(&path, "home_document: start.html\n").unwrap();

        let config = SiteConfig::discover(Some(&path)).unwrap();
        assert_eq!(config.home_document, "start.html");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
