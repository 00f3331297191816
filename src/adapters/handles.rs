//! Handle table for host objects that cannot be stored in the port types.

use std::collections::BTreeMap;

use crate::ports::ElementId;

/// Maps [`ElementId`]s to host objects.
///
/// Ids are handed out in increasing order and never reused, so a handle that
/// outlives its object resolves to nothing instead of to a newer object.
#[derive(Debug)]
pub struct HandleTable<T> {
    entries: BTreeMap<u32, T>,
    next: u32,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self { entries: BTreeMap::new(), next: 0 }
    }
}

impl<T> HandleTable<T> {
    /// The object behind `id`, if it is still held.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.entries.get(&id.0)
    }

    /// Stores `value` under a fresh id.
    pub fn insert(&mut self, value: T) -> ElementId {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        self.entries.insert(id, value);
        ElementId(id)
    }

    /// Drops every entry for which `keep` returns `false`.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.entries.retain(|_, value| keep(value));
    }

    /// Number of held objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
