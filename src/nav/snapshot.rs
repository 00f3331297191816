//! Memoized snapshot of the navigation elements.

use tracing::trace;

use crate::ports::{ElementId, ElementKind, NavDocument};

/// Element handles captured from the navigation region in one query pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationSnapshot {
    /// Desktop dropdown triggers.
    pub top_level_controls: Vec<ElementId>,
    /// Mobile menu toggles.
    pub mobile_controls: Vec<ElementId>,
    /// Anchors with an `href`.
    pub links: Vec<ElementId>,
}

impl NavigationSnapshot {
    /// Queries the document for all three element families.
    pub fn capture<D: NavDocument + ?Sized>(doc: &D) -> Self {
        Self {
            top_level_controls: doc.query(ElementKind::TopLevelControl),
            mobile_controls: doc.query(ElementKind::MobileControl),
            links: doc.query(ElementKind::Link),
        }
    }

    /// Top-level and mobile controls together.
    pub fn controls(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.top_level_controls.iter().chain(&self.mobile_controls).copied()
    }

    /// Returns `true` if the element is part of this snapshot.
    #[must_use]
    pub fn contains(&self, element: ElementId) -> bool {
        self.controls().any(|e| e == element) || self.links.contains(&element)
    }
}

/// Lazily rebuilt cache of the current [`NavigationSnapshot`].
#[derive(Debug, Default)]
pub struct SnapshotCache {
    snapshot: Option<NavigationSnapshot>,
}

impl SnapshotCache {
    /// Returns the cached snapshot, querying the document if there is none.
    pub fn get<D: NavDocument + ?Sized>(&mut self, doc: &D) -> &NavigationSnapshot {
        self.snapshot.get_or_insert_with(|| {
            trace!("capturing navigation snapshot");
            NavigationSnapshot::capture(doc)
        })
    }

    /// Drops the cached snapshot so the next `get` re-queries.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Returns `true` while a snapshot is cached.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.snapshot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryDocument;

    #[test]
    fn capture_splits_element_families() {
        let mut doc = MemoryDocument::new();
        let group = doc.add_group("Tour Packages", Some("Tour Packages"));
        let link = doc.add_group_link(group, "/pages/tourfinal.html", "All");
        let mobile = doc.add_mobile_toggle("Tour Packages +");

        let snapshot = NavigationSnapshot::capture(&doc);
        assert_eq!(snapshot.top_level_controls, [group]);
        assert_eq!(snapshot.mobile_controls, [mobile]);
        assert_eq!(snapshot.links, [link]);
        assert!(snapshot.contains(mobile));
        assert_eq!(snapshot.controls().count(), 2);
    }

    #[test]
    fn cache_is_memoized_until_invalidated() {
        let mut doc = MemoryDocument::new();
        doc.add_link("/index.html", "Home");
        let mut cache = SnapshotCache::default();
        assert!(!cache.is_valid());
        assert_eq!(cache.get(&doc).links.len(), 1);

        doc.add_link("/pages/contact.html", "Contact");
        assert_eq!(cache.get(&doc).links.len(), 1, "stale until invalidated");

        cache.invalidate();
        assert!(!cache.is_valid());
        assert_eq!(cache.get(&doc).links.len(), 2);
        assert!(cache.is_valid());
    }
}
