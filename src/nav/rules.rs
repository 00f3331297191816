//! Section rule table and parent-promotion rule.

use serde::{Deserialize, Serialize};

/// How a section rule lights up the navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SectionMatch {
    /// Mark the top-level control by label, then sub-links by query value.
    #[default]
    Label,
    /// Mark links whose path contains the rule path. No label matching.
    Href,
}

/// One row of the section table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    /// Lowercase path substring that selects this rule.
    pub path: String,
    /// Visible label of the top-level control for this section.
    pub label: String,
    /// Query parameter that selects a sub-item within the section.
    #[serde(default = "default_query_key")]
    pub query_key: String,
    /// Matching strategy.
    #[serde(default, rename = "match")]
    pub matching: SectionMatch,
}

fn default_query_key() -> String {
    "section".to_string()
}

impl SectionRule {
    /// A rule that matches the control by label and sub-links by `query_key`.
    pub fn labelled(
        path: impl Into<String>,
        label: impl Into<String>,
        query_key: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            query_key: query_key.into(),
            matching: SectionMatch::Label,
        }
    }

    /// A rule that matches links by href containment only.
    pub fn direct(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            query_key: default_query_key(),
            matching: SectionMatch::Href,
        }
    }
}

/// Ordered section table. The first rule whose path is contained in the
/// current (lowercased) path wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable(Vec<SectionRule>);

impl Default for RuleTable {
    fn default() -> Self {
        Self(vec![
            SectionRule::labelled("/pages/ethiopia.html", "Ethiopia", "section"),
            SectionRule::labelled("/pages/attraction.html", "Attractions", "section"),
            SectionRule::labelled("/pages/activities.html", "Activities", "section"),
            SectionRule::labelled("/pages/tailormadetour.html", "Tailor-made Tours", "tour"),
            SectionRule::labelled("/pages/tourfinal.html", "Tour Packages", "category"),
            SectionRule::labelled("/pages/about.html", "About us", "tab"),
            SectionRule::direct("/pages/contact.html", "Contact"),
        ])
    }
}

impl RuleTable {
    /// Builds a table from rules in evaluation order.
    #[must_use]
    pub fn new(rules: Vec<SectionRule>) -> Self {
        Self(rules)
    }

    /// Returns the first rule whose path occurs in `path`.
    #[must_use]
    pub fn first_match(&self, path: &str) -> Option<&SectionRule> {
        self.0.iter().find(|rule| path.contains(&rule.path))
    }

    /// Iterates rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionRule> {
        self.0.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercases every rule path. Paths are compared against lowercased
    /// URLs.
    pub(crate) fn lowercase_paths(&mut self) {
        for rule in &mut self.0 {
            rule.path = rule.path.to_lowercase();
        }
    }
}

/// Decides when a matched link should light up its parent group toggle
/// instead of itself.
///
/// Subpages of a family (company profile, terms) are not linked from the top
/// bar, so the family's entry is highlighted in their place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionRule {
    /// Path fragment shared by every page of the family.
    pub family: String,
    /// Path fragment that marks a family subpage.
    pub subpage: String,
    /// Path suffix of the family's own page, which is never promoted.
    pub canonical: String,
}

impl Default for PromotionRule {
    fn default() -> Self {
        Self {
            family: "/about".to_string(),
            subpage: "/about-".to_string(),
            canonical: "/about.html".to_string(),
        }
    }
}

impl PromotionRule {
    /// Returns `true` if a link to `path` (lowercased) should be promoted.
    #[must_use]
    pub fn applies(&self, path: &str) -> bool {
        if self.family.is_empty() {
            return false;
        }
        path.contains(&self.subpage)
            || (path.contains(&self.family) && !path.ends_with(&self.canonical))
    }

    /// Lowercases every path fragment.
    pub(crate) fn lowercase_paths(&mut self) {
        self.family = self.family.to_lowercase();
        self.subpage = self.subpage.to_lowercase();
        self.canonical = self.canonical.to_lowercase();
    }
}
