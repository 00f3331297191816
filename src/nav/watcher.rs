//! Change watching and the page-session event handlers.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::resolver::{Resolution, Resolver};
use crate::config::SiteConfig;
use crate::ports::NavDocument;

/// Kind of a DOM mutation notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    /// Children were added or removed.
    ChildList,
    /// An attribute changed.
    Attributes,
    /// Text content changed.
    CharacterData,
}

/// One mutation notification delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// What changed.
    pub kind: MutationKind,
    /// Number of nodes added by a child-list mutation.
    pub added_nodes: usize,
}

impl MutationRecord {
    /// A child-list mutation that added `added_nodes` nodes.
    #[must_use]
    pub fn child_list(added_nodes: usize) -> Self {
        Self { kind: MutationKind::ChildList, added_nodes }
    }

    /// Returns `true` if this mutation added nodes to the tree.
    #[must_use]
    pub fn adds_nodes(&self) -> bool {
        self.kind == MutationKind::ChildList && self.added_nodes > 0
    }
}

/// The document's loading phase when the session is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    /// Still parsing; the ready signal is yet to come.
    Loading,
    /// Parsed. The ready signal has already fired.
    Interactive,
    /// Fully loaded. The ready signal has already fired.
    Complete,
}

impl ReadyState {
    /// Parses `document.readyState`. Unknown values count as loaded.
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state {
            "loading" => Self::Loading,
            "interactive" => Self::Interactive,
            _ => Self::Complete,
        }
    }

    /// Returns `true` if the host still has to deliver the ready signal.
    #[must_use]
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchState {
    Idle,
    Observing,
    Disconnected,
}

/// Tracks whether mutation notifications for the navigation are live.
#[derive(Debug)]
pub struct ChangeWatcher {
    state: WatchState,
}

impl Default for ChangeWatcher {
    fn default() -> Self {
        Self { state: WatchState::Idle }
    }
}

impl ChangeWatcher {
    /// Starts observing. Has no effect once disconnected.
    pub fn observe(&mut self) {
        if self.state == WatchState::Idle {
            self.state = WatchState::Observing;
        }
    }

    /// Stops observing for good.
    pub fn disconnect(&mut self) {
        self.state = WatchState::Disconnected;
    }

    /// Returns `true` while notifications should be acted on.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.state == WatchState::Observing
    }

    /// Returns `true` if the batch contains a structural change.
    #[must_use]
    pub fn is_structural(records: &[MutationRecord]) -> bool {
        records.iter().any(MutationRecord::adds_nodes)
    }
}

/// One page's navigation state, driven by host events.
///
/// Hosts deliver events serially, so handlers never overlap.
#[derive(Debug)]
pub struct NavSession {
    resolver: Resolver,
    watcher: ChangeWatcher,
}

impl NavSession {
    /// Creates a session for a freshly loaded page.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self { resolver: Resolver::new(config), watcher: ChangeWatcher::default() }
    }

    /// The session's resolver.
    #[must_use]
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Returns `true` while the change watcher is attached.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watcher.is_observing()
    }

    /// Handles the document-ready signal: resolves, then attaches the change
    /// watcher if the page has a navigation root.
    pub fn on_ready<D: NavDocument + ?Sized>(&mut self, doc: &mut D, url: &Url) -> Resolution {
        let resolution = self.resolver.resolve(doc, url);
        if doc.has_nav_root() {
            self.watcher.observe();
            debug!("watching navigation for structural changes");
        } else {
            debug!("page has no navigation root, change watcher not attached");
        }
        resolution
    }

    /// Handles installation into a page that may already be parsed.
    ///
    /// While the document is still loading this does nothing and returns
    /// `None`; the host calls [`NavSession::on_ready`] when the ready signal
    /// arrives. Otherwise the signal has already been missed, so the session
    /// runs its ready handling now.
    pub fn on_install<D: NavDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        url: &Url,
        state: ReadyState,
    ) -> Option<Resolution> {
        if state.is_loading() {
            debug!("document still loading, waiting for the ready signal");
            return None;
        }
        debug!(?state, "document already parsed, resolving on install");
        Some(self.on_ready(doc, url))
    }

    /// Handles back/forward history navigation.
    pub fn on_popstate<D: NavDocument + ?Sized>(&mut self, doc: &mut D, url: &Url) -> Resolution {
        self.resolver.resolve(doc, url)
    }

    /// Handles a batch of mutation notifications for the navigation subtree.
    ///
    /// A batch that added nodes invalidates the snapshot and re-resolves
    /// past the route check, so late-rendered menus get highlighted. Returns
    /// `None` when the batch is ignored.
    pub fn on_mutations<D: NavDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        url: &Url,
        records: &[MutationRecord],
    ) -> Option<Resolution> {
        if !self.watcher.is_observing() || !ChangeWatcher::is_structural(records) {
            return None;
        }
        info!(records = records.len(), "navigation changed, re-resolving");
        self.resolver.invalidate();
        Some(self.resolver.resolve_forced(doc, url))
    }

    /// Handles page unload: releases the change watcher.
    pub fn on_unload(&mut self) {
        self.watcher.disconnect();
        debug!("change watcher released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryDocument;
    use crate::adapters::recording::RecordingDocument;
    use crate::nav::annotation::ActiveAnnotation;

    fn url(path: &str) -> Url {
        Url::parse("https://example.com").unwrap().join(path).unwrap()
    }

    #[test]
    fn adds_nodes_needs_child_list_with_additions() {
        assert!(MutationRecord::child_list(1).adds_nodes());
        assert!(!MutationRecord::child_list(0).adds_nodes());
        let attr = MutationRecord { kind: MutationKind::Attributes, added_nodes: 3 };
        assert!(!attr.adds_nodes());
        assert!(ChangeWatcher::is_structural(&[attr, MutationRecord::child_list(2)]));
    }

    #[test]
    fn watcher_does_not_restart_after_disconnect() {
        let mut watcher = ChangeWatcher::default();
        assert!(!watcher.is_observing());
        watcher.observe();
        assert!(watcher.is_observing());
        watcher.disconnect();
        watcher.observe();
        assert!(!watcher.is_observing());
    }

    #[test]
    fn late_rendered_menu_is_highlighted_after_mutation() {
        let mut doc = MemoryDocument::new();
        doc.add_link("/index.html", "Home");
        let target = url("/pages/tourfinal.html?category=omo-valley");
        let mut session = NavSession::new(SiteConfig::default());
        assert!(session.on_ready(&mut doc, &target).marks().is_empty());
        assert!(session.is_watching());

        let tours = doc.add_group("Tour Packages", None);
        let omo = doc.add_group_link(tours, "/pages/tourfinal.html?category=omo-valley", "Omo");
        let resolution =
            session.on_mutations(&mut doc, &target, &[MutationRecord::child_list(2)]).unwrap();

        let marks: Vec<_> = resolution.marks().iter().map(|m| (m.element, m.annotation)).collect();
        assert_eq!(
            marks,
            [(tours, ActiveAnnotation::TopLevelActive), (omo, ActiveAnnotation::SubActive)]
        );
    }

    #[test]
    fn attribute_mutations_are_ignored() {
        let mut doc = MemoryDocument::new();
        let mut session = NavSession::new(SiteConfig::default());
        session.on_ready(&mut doc, &url("/"));
        let records = [MutationRecord { kind: MutationKind::Attributes, added_nodes: 0 }];
        assert!(session.on_mutations(&mut doc, &url("/"), &records).is_none());
    }

    #[test]
    fn mutations_before_ready_or_after_unload_are_ignored() {
        let mut doc = MemoryDocument::new();
        let mut session = NavSession::new(SiteConfig::default());
        let records = [MutationRecord::child_list(1)];
        assert!(session.on_mutations(&mut doc, &url("/"), &records).is_none());

        session.on_ready(&mut doc, &url("/"));
        session.on_unload();
        assert!(!session.is_watching());
        assert!(session.on_mutations(&mut doc, &url("/"), &records).is_none());
    }

    #[test]
    fn page_without_nav_is_not_watched() {
        let mut doc = MemoryDocument::without_nav();
        let mut session = NavSession::new(SiteConfig::default());
        session.on_ready(&mut doc, &url("/"));
        assert!(!session.is_watching());
    }

    #[test]
    fn popstate_short_circuits_on_same_route() {
        let mut doc = MemoryDocument::new();
        doc.add_link("/pages/contact.html", "Contact");
        let mut session = NavSession::new(SiteConfig::default());
        let contact = url("/pages/contact.html");
        session.on_ready(&mut doc, &contact);
        assert_eq!(session.on_popstate(&mut doc, &contact), Resolution::Unchanged);
        assert!(matches!(session.on_popstate(&mut doc, &url("/")), Resolution::Applied { .. }));
        assert_eq!(session.resolver().last_key().unwrap().as_str(), "/");
    }

    #[test]
    fn ready_state_parses_document_values() {
        assert_eq!(ReadyState::parse("loading"), ReadyState::Loading);
        assert_eq!(ReadyState::parse("interactive"), ReadyState::Interactive);
        assert_eq!(ReadyState::parse("complete"), ReadyState::Complete);
        assert_eq!(ReadyState::parse(""), ReadyState::Complete);
        assert!(ReadyState::Loading.is_loading());
        assert!(!ReadyState::Interactive.is_loading());
    }

    #[test]
    fn install_after_parse_resolves_immediately() {
        for state in [ReadyState::Interactive, ReadyState::Complete] {
            let mut doc = MemoryDocument::new();
            let contact = doc.add_link("/pages/contact.html", "Contact");
            let mut session = NavSession::new(SiteConfig::default());
            let resolution =
                session.on_install(&mut doc, &url("/pages/contact.html"), state).unwrap();
            assert_eq!(resolution.marks().len(), 1);
            assert_eq!(resolution.marks()[0].element, contact);
            assert!(session.is_watching());
        }
    }

    #[test]
    fn install_while_loading_waits_for_ready() {
        let mut doc = RecordingDocument::unrecorded(MemoryDocument::new());
        let contact = doc.inner_mut().add_link("/pages/contact.html", "Contact");
        let target = url("/pages/contact.html");
        let mut session = NavSession::new(SiteConfig::default());

        assert!(session.on_install(&mut doc, &target, ReadyState::Loading).is_none());
        assert_eq!(doc.write_count(), 0);
        assert!(!session.is_watching());
        assert!(session.resolver().last_key().is_none());

        let resolution = session.on_ready(&mut doc, &target);
        assert_eq!(resolution.marks()[0].element, contact);
        assert!(session.is_watching());
    }
}
