//! In-memory navigation document built from code or a YAML fixture.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::nav::annotation::{ActiveAnnotation, AnnotationClasses};
use crate::ports::{ElementId, ElementKind, NavDocument};

/// YAML description of a navigation bar.
///
/// ```yaml
/// groups:
///   - text: "Tour Packages ▾"
///     label: Tour Packages
///     links:
///       - { href: "/pages/tourfinal.html?category=bird-watching", text: Bird Watching }
/// mobile:
///   - toggle: "Tour Packages +"
///     links:
///       - { href: "/pages/tourfinal.html?category=bird-watching" }
/// links:
///   - { href: /index.html, text: Home }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavFixture {
    /// Whether the page has a `nav` root at all.
    #[serde(default = "default_true")]
    pub nav: bool,
    /// Standalone top-level links.
    #[serde(default)]
    pub links: Vec<LinkFixture>,
    /// Desktop dropdown groups.
    #[serde(default)]
    pub groups: Vec<GroupFixture>,
    /// Mobile menu sections.
    #[serde(default)]
    pub mobile: Vec<MobileFixture>,
}

fn default_true() -> bool {
    true
}

/// A desktop dropdown group: a trigger button and its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFixture {
    /// Full text of the trigger button.
    pub text: String,
    /// Text of the nested label span, if the button has one.
    #[serde(default)]
    pub label: Option<String>,
    /// Links inside the dropdown.
    #[serde(default)]
    pub links: Vec<LinkFixture>,
}

/// A mobile menu toggle and the links it reveals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileFixture {
    /// Full text of the toggle button.
    pub toggle: String,
    /// Links revealed by the toggle.
    #[serde(default)]
    pub links: Vec<LinkFixture>,
}

/// An anchor element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFixture {
    /// Raw `href`; anchors without one are not navigation links.
    #[serde(default)]
    pub href: Option<String>,
    /// Link text.
    #[serde(default)]
    pub text: String,
}

impl NavFixture {
    /// Loads a fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read nav fixture {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse nav fixture {}: {e}", path.display()))
    }
}

#[derive(Debug, Clone)]
struct MemoryElement {
    kind: Option<ElementKind>,
    text: String,
    label: Option<String>,
    href: Option<String>,
    group: Option<ElementId>,
    classes: BTreeSet<String>,
}

/// A navigation region held in memory.
///
/// Elements are kept in document order. Handles are indices and never
/// change once issued.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    has_nav: bool,
    elements: Vec<MemoryElement>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// An empty `nav` root.
    #[must_use]
    pub fn new() -> Self {
        Self { has_nav: true, elements: Vec::new() }
    }

    /// A page with no `nav` root.
    #[must_use]
    pub fn without_nav() -> Self {
        Self { has_nav: false, elements: Vec::new() }
    }

    /// Builds a document from a fixture. Top-level links come first, then
    /// desktop groups, then mobile sections.
    #[must_use]
    pub fn from_fixture(fixture: &NavFixture) -> Self {
        let mut doc = Self { has_nav: fixture.nav, elements: Vec::new() };
        for link in &fixture.links {
            doc.push_link(link.href.clone(), &link.text, None);
        }
        for group in &fixture.groups {
            let toggle = doc.add_group(&group.text, group.label.as_deref());
            for link in &group.links {
                doc.push_link(link.href.clone(), &link.text, Some(toggle));
            }
        }
        for section in &fixture.mobile {
            doc.add_mobile_toggle(&section.toggle);
            for link in &section.links {
                doc.push_link(link.href.clone(), &link.text, None);
            }
        }
        doc
    }

    /// Loads a document from a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be loaded.
    pub fn load(path: &Path) -> Result<Self, String> {
        NavFixture::load(path).map(|fixture| Self::from_fixture(&fixture))
    }

    /// Adds a desktop dropdown trigger and returns its handle.
    pub fn add_group(&mut self, text: &str, label: Option<&str>) -> ElementId {
        self.push(MemoryElement {
            kind: Some(ElementKind::TopLevelControl),
            text: text.to_string(),
            label: label.map(str::to_string),
            href: None,
            group: None,
            classes: BTreeSet::new(),
        })
    }

    /// Adds a button that toggles a group but is not a desktop trigger.
    pub fn add_detached_toggle(&mut self, text: &str) -> ElementId {
        self.push(MemoryElement {
            kind: None,
            text: text.to_string(),
            label: None,
            href: None,
            group: None,
            classes: BTreeSet::new(),
        })
    }

    /// Adds a link inside the group whose toggle is `toggle`.
    pub fn add_group_link(&mut self, toggle: ElementId, href: &str, text: &str) -> ElementId {
        self.push_link(Some(href.to_string()), text, Some(toggle))
    }

    /// Adds a mobile menu toggle.
    pub fn add_mobile_toggle(&mut self, text: &str) -> ElementId {
        self.push(MemoryElement {
            kind: Some(ElementKind::MobileControl),
            text: text.to_string(),
            label: None,
            href: None,
            group: None,
            classes: BTreeSet::new(),
        })
    }

    /// Adds a link outside any group.
    pub fn add_link(&mut self, href: &str, text: &str) -> ElementId {
        self.push_link(Some(href.to_string()), text, None)
    }

    /// Appends a link to the `index`-th desktop group, or to the top level
    /// when `index` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no such group.
    pub fn append_link(
        &mut self,
        index: Option<usize>,
        href: &str,
        text: &str,
    ) -> Result<ElementId, String> {
        match index {
            None => Ok(self.add_link(href, text)),
            Some(index) => {
                let toggle = self
                    .query(ElementKind::TopLevelControl)
                    .get(index)
                    .copied()
                    .ok_or_else(|| format!("No menu group at index {index}"))?;
                Ok(self.add_group_link(toggle, href, text))
            }
        }
    }

    /// Class tokens on an element, sorted.
    #[must_use]
    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.get(element).map(|e| e.classes.iter().cloned().collect()).unwrap_or_default()
    }

    /// Returns `true` if the element carries every token.
    #[must_use]
    pub fn has_classes(&self, element: ElementId, tokens: &[String]) -> bool {
        self.get(element).is_some_and(|e| tokens.iter().all(|t| e.classes.contains(t)))
    }

    /// Every element currently carrying an annotation, in document order.
    #[must_use]
    pub fn annotated(&self, classes: &AnnotationClasses) -> Vec<(ElementId, ActiveAnnotation)> {
        self.ids()
            .filter_map(|id| classes.classify(&self.classes(id)).map(|a| (id, a)))
            .collect()
    }

    /// Human-readable one-line description of an element.
    #[must_use]
    pub fn describe(&self, element: ElementId) -> String {
        let Some(e) = self.get(element) else {
            return format!("{element} <missing>");
        };
        match (e.kind, &e.href) {
            (Some(ElementKind::Link) | None, Some(href)) => {
                format!("{element} link \"{}\" -> {href}", e.text)
            }
            (Some(ElementKind::MobileControl), _) => format!("{element} mobile \"{}\"", e.text),
            _ => format!("{element} button \"{}\"", e.label.as_deref().unwrap_or(&e.text)),
        }
    }

    fn ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.elements.len()).map(|i| ElementId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    fn get(&self, element: ElementId) -> Option<&MemoryElement> {
        self.elements.get(element.0 as usize)
    }

    fn push_link(&mut self, href: Option<String>, text: &str, group: Option<ElementId>) -> ElementId {
        self.push(MemoryElement {
            kind: Some(ElementKind::Link),
            text: text.to_string(),
            label: None,
            href,
            group,
            classes: BTreeSet::new(),
        })
    }

    fn push(&mut self, element: MemoryElement) -> ElementId {
        let id = ElementId(u32::try_from(self.elements.len()).unwrap_or(u32::MAX));
        self.elements.push(element);
        id
    }
}

impl NavDocument for MemoryDocument {
    fn has_nav_root(&self) -> bool {
        self.has_nav
    }

    fn query(&self, kind: ElementKind) -> Vec<ElementId> {
        if !self.has_nav {
            return Vec::new();
        }
        self.ids()
            .filter(|&id| {
                self.get(id).is_some_and(|e| {
                    e.kind == Some(kind) && (kind != ElementKind::Link || e.href.is_some())
                })
            })
            .collect()
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.get(element).map(|e| e.text.clone())
    }

    fn label_text(&self, element: ElementId) -> Option<String> {
        self.get(element).and_then(|e| e.label.clone())
    }

    fn href(&self, element: ElementId) -> Option<String> {
        self.get(element).and_then(|e| e.href.clone())
    }

    fn group_toggle(&self, element: ElementId) -> Option<ElementId> {
        self.get(element).and_then(|e| e.group)
    }

    fn add_classes(&mut self, element: ElementId, classes: &[String]) {
        if let Some(e) = self.elements.get_mut(element.0 as usize) {
            e.classes.extend(classes.iter().cloned());
        }
    }

    fn remove_classes(&mut self, element: ElementId, classes: &[String]) {
        if let Some(e) = self.elements.get_mut(element.0 as usize) {
            for class in classes {
                e.classes.remove(class);
            }
        }
    }
}
