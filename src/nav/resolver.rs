//! The URL-to-navigation-state resolver.
//!
//! Resolution runs in three stages, in priority order, and stops at the
//! first stage that applies:
//!
//! 1. home: root, home document, or any directory path
//! 2. section table: first rule whose path occurs in the current path
//! 3. fallback: links mentioning the current file name
//!
//! [`plan`] picks the stage as a pure function of the route; [`Resolver`]
//! carries it out against a document.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info};
use url::Url;

use super::annotation::{ActiveAnnotation, Mark};
use super::matcher::Annotator;
use super::route::{ends_with_document, first_query_value, Route, RouteKey};
use super::rules::SectionMatch;
use super::snapshot::{NavigationSnapshot, SnapshotCache};
use crate::config::SiteConfig;
use crate::ports::{ElementId, NavDocument};

/// The stage selected for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Mark every home link.
    Home,
    /// Mark links whose path contains `path`.
    DirectLink {
        /// Rule path that matched.
        path: String,
    },
    /// Mark the section's control, then its sub-links by query value.
    Section {
        /// Control label.
        label: String,
        /// Query parameter selecting the sub-item.
        query_key: String,
        /// Current value of `query_key`, if any.
        value: Option<String>,
    },
    /// Mark links mentioning the current file name.
    Fallback {
        /// Last path segment of the current path.
        file: String,
    },
    /// Nothing to mark.
    Nothing,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::DirectLink { path } => write!(f, "direct link {path}"),
            Self::Section { label, query_key, value: Some(value) } => {
                write!(f, "section \"{label}\" ({query_key}={value})")
            }
            Self::Section { label, .. } => write!(f, "section \"{label}\""),
            Self::Fallback { file } => write!(f, "fallback {file}"),
            Self::Nothing => f.write_str("nothing"),
        }
    }
}

/// Selects the resolution stage for a route.
#[must_use]
pub fn plan(config: &SiteConfig, route: &Route) -> Plan {
    if route.is_home(&config.home_document) {
        return Plan::Home;
    }

    if let Some(rule) = config.sections.first_match(route.path()) {
        return match rule.matching {
            SectionMatch::Href => Plan::DirectLink { path: rule.path.clone() },
            SectionMatch::Label => Plan::Section {
                label: rule.label.clone(),
                query_key: rule.query_key.clone(),
                value: route.query_value(&rule.query_key),
            },
        };
    }

    match route.file_name() {
        Some(file) => Plan::Fallback { file: file.to_string() },
        None => Plan::Nothing,
    }
}

/// Result of one resolve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The route was already processed; the document was not touched.
    Unchanged,
    /// Annotations were cleared and re-applied.
    Applied {
        /// The stage that ran.
        plan: Plan,
        /// Annotations applied, in application order.
        marks: Vec<Mark>,
    },
}

impl Resolution {
    /// Annotations applied by this resolution.
    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        match self {
            Self::Unchanged => &[],
            Self::Applied { marks, .. } => marks,
        }
    }
}

/// Owns the per-page resolver state: the snapshot cache and the last
/// processed route.
///
/// One resolver lives for one page session and is handed to every event
/// handler by reference.
#[derive(Debug)]
pub struct Resolver {
    config: SiteConfig,
    cache: SnapshotCache,
    last_key: Option<RouteKey>,
    promoted: BTreeSet<ElementId>,
}

impl Resolver {
    /// Creates a resolver with an empty cache.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self { config, cache: SnapshotCache::default(), last_key: None, promoted: BTreeSet::new() }
    }

    /// Site configuration in use.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Route key of the last processed resolve.
    #[must_use]
    pub fn last_key(&self) -> Option<&RouteKey> {
        self.last_key.as_ref()
    }

    /// Drops the cached snapshot; the next resolve re-queries the document.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Resolves navigation state for `url`.
    ///
    /// Returns [`Resolution::Unchanged`] without touching the document when
    /// the route matches the previously processed one.
    pub fn resolve<D: NavDocument + ?Sized>(&mut self, doc: &mut D, url: &Url) -> Resolution {
        let route = Route::from_url(url);
        if self.last_key.as_ref() == Some(route.key()) {
            debug!(route = %route.key(), "route unchanged, skipping");
            return Resolution::Unchanged;
        }
        self.apply(doc, &route)
    }

    /// Resolves navigation state for `url` even if the route is unchanged.
    ///
    /// Used after structural changes to the navigation, where the route is
    /// the same but the elements are not.
    pub fn resolve_forced<D: NavDocument + ?Sized>(&mut self, doc: &mut D, url: &Url) -> Resolution {
        self.apply(doc, &Route::from_url(url))
    }

    fn apply<D: NavDocument + ?Sized>(&mut self, doc: &mut D, route: &Route) -> Resolution {
        self.last_key = Some(route.key().clone());
        let snapshot = self.cache.get(&*doc).clone();
        self.clear(doc, &snapshot);

        let plan = plan(&self.config, route);
        let home_document = self.config.home_document.as_str();
        let mut annotator =
            Annotator::new(doc, &self.config.classes, &self.config.promotion, route.base());

        match &plan {
            Plan::Home => {
                annotator.match_links(
                    &snapshot.links,
                    |u| {
                        let path = u.path();
                        path.ends_with('/') || ends_with_document(path, home_document)
                    },
                    ActiveAnnotation::TopLevelActive,
                );
            }
            Plan::DirectLink { path } => {
                annotator.match_links(
                    &snapshot.links,
                    |u| u.path().to_lowercase().contains(path.as_str()),
                    ActiveAnnotation::TopLevelActive,
                );
            }
            Plan::Section { label, query_key, value } => {
                annotator.match_by_label(label, &snapshot);
                if let Some(value) = value {
                    annotator.match_links(
                        &snapshot.links,
                        |u| first_query_value(u, query_key).as_deref() == Some(value.as_str()),
                        ActiveAnnotation::SubActive,
                    );
                }
            }
            Plan::Fallback { file } => {
                let suffix = format!("/{file}");
                annotator.match_links(
                    &snapshot.links,
                    |u| {
                        let path = u.path().to_lowercase();
                        path.ends_with(&suffix) || path.contains(file.as_str())
                    },
                    ActiveAnnotation::TopLevelActive,
                );
            }
            Plan::Nothing => {}
        }

        let marks = annotator.finish();
        self.promoted.extend(
            marks.iter().filter(|m| m.promoted_from.is_some()).map(|m| m.element),
        );
        info!(route = %route.key(), ?plan, marked = marks.len(), "navigation resolved");
        Resolution::Applied { plan, marks }
    }

    /// Removes every annotation left by earlier passes.
    fn clear<D: NavDocument + ?Sized>(&mut self, doc: &mut D, snapshot: &NavigationSnapshot) {
        let classes = &self.config.classes;
        for control in snapshot.controls() {
            doc.remove_classes(control, &classes.top_level);
        }
        let link_tokens = classes.link_tokens();
        for &link in &snapshot.links {
            doc.remove_classes(link, &link_tokens);
        }
        // Promoted toggles outside the snapshot would otherwise stay lit.
        for toggle in std::mem::take(&mut self.promoted) {
            if !snapshot.contains(toggle) {
                doc.remove_classes(toggle, &classes.top_level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryDocument;
    use crate::adapters::recording::RecordingDocument;
    use crate::nav::annotation::AnnotationClasses;

    const ORIGIN: &str = "https://example.com";

    fn url(path: &str) -> Url {
        Url::parse(ORIGIN).unwrap().join(path).unwrap()
    }

    /// A navigation bar shaped like the live site's.
    struct Site {
        doc: MemoryDocument,
        home: ElementId,
        home_index: ElementId,
        ethiopia: ElementId,
        tours: ElementId,
        bird: ElementId,
        omo: ElementId,
        about: ElementId,
        company: ElementId,
        about_page: ElementId,
        contact: ElementId,
        mobile_tours: ElementId,
        mobile_about: ElementId,
        mobile_bird: ElementId,
    }

    fn site() -> Site {
        let mut doc = MemoryDocument::new();
        let home = doc.add_link("/", "Home");
        let home_index = doc.add_link("/index.html", "Home");
        let ethiopia = doc.add_group("Ethiopia", Some("Ethiopia"));
        doc.add_group_link(ethiopia, "/pages/ethiopia.html?section=history", "History");
        let tours = doc.add_group("Tour Packages \u{25be}", Some("Tour Packages"));
        let bird = doc.add_group_link(tours, "/pages/tourfinal.html?category=bird-watching", "Birds");
        let omo = doc.add_group_link(tours, "/pages/tourfinal.html?category=omo-valley", "Omo");
        let about = doc.add_group("About us", Some("About us"));
        let about_page = doc.add_group_link(about, "/pages/about.html", "About");
        let company = doc.add_group_link(about, "/pages/about-company.html", "Company profile");
        let contact = doc.add_link("/pages/contact.html", "Contact");
        let mobile_tours = doc.add_mobile_toggle("Tour Packages +");
        let mobile_bird =
            doc.add_link("/pages/tourfinal.html?category=bird-watching", "Birds (mobile)");
        let mobile_about = doc.add_mobile_toggle("About us +");
        Site {
            doc,
            home,
            home_index,
            ethiopia,
            tours,
            bird,
            omo,
            about,
            company,
            about_page,
            contact,
            mobile_tours,
            mobile_about,
            mobile_bird,
        }
    }

    fn marked(resolution: &Resolution) -> Vec<(ElementId, ActiveAnnotation)> {
        let mut marks: Vec<_> =
            resolution.marks().iter().map(|m| (m.element, m.annotation)).collect();
        marks.sort_by_key(|(e, _)| *e);
        marks
    }

    #[test]
    fn home_paths_mark_only_home_links() {
        for path in ["/", "/index.html", "/pages/"] {
            let mut site = site();
            let mut resolver = Resolver::new(SiteConfig::default());
            let resolution = resolver.resolve(&mut site.doc, &url(path));
            assert!(matches!(&resolution, Resolution::Applied { plan: Plan::Home, .. }), "{path}");
            assert_eq!(
                marked(&resolution),
                [
                    (site.home, ActiveAnnotation::TopLevelActive),
                    (site.home_index, ActiveAnnotation::TopLevelActive)
                ],
                "{path}"
            );
        }
    }

    #[test]
    fn home_wins_even_when_a_section_path_is_present() {
        let route = Route::from_url(&url("/pages/tourfinal.html/"));
        assert_eq!(plan(&SiteConfig::default(), &route), Plan::Home);
    }

    #[test]
    fn tour_category_marks_control_and_sub_links() {
        let mut site = site();
        let mut resolver = Resolver::new(SiteConfig::default());
        let resolution =
            resolver.resolve(&mut site.doc, &url("/pages/tourfinal.html?category=bird-watching"));

        assert_eq!(
            marked(&resolution),
            [
                (site.tours, ActiveAnnotation::TopLevelActive),
                (site.bird, ActiveAnnotation::SubActive),
                (site.mobile_tours, ActiveAnnotation::TopLevelActive),
                (site.mobile_bird, ActiveAnnotation::SubActive),
            ]
        );
        assert!(site.doc.classes(site.omo).is_empty());
    }

    #[test]
    fn section_without_query_marks_control_only() {
        let mut site = site();
        let mut resolver = Resolver::new(SiteConfig::default());
        let resolution = resolver.resolve(&mut site.doc, &url("/pages/ethiopia.html"));
        assert_eq!(marked(&resolution), [(site.ethiopia, ActiveAnnotation::TopLevelActive)]);
    }

    #[test]
    fn about_subpage_promotes_to_about_control() {
        let mut site = site();
        let mut resolver = Resolver::new(SiteConfig::default());
        let resolution = resolver.resolve(&mut site.doc, &url("/pages/about-company.html"));

        assert!(matches!(&resolution, Resolution::Applied { plan: Plan::Fallback { .. }, .. }));
        assert_eq!(marked(&resolution), [(site.about, ActiveAnnotation::TopLevelActive)]);
        assert!(site.doc.classes(site.company).is_empty());
        assert!(site.doc.classes(site.about_page).is_empty());
    }

    #[test]
    fn about_tab_marks_control_and_tab_links() {
        let mut site = site();
        let team = site.doc.add_group_link(site.about, "/pages/about.html?tab=team", "Team");
        let mut resolver = Resolver::new(SiteConfig::default());
        let resolution = resolver.resolve(&mut site.doc, &url("/pages/about.html?tab=team"));

        assert_eq!(
            marked(&resolution),
            [
                (site.about, ActiveAnnotation::TopLevelActive),
                (site.mobile_about, ActiveAnnotation::TopLevelActive),
                (team, ActiveAnnotation::SubActive),
            ]
        );
    }

    #[test]
    fn contact_matches_by_href_only() {
        let mut site = site();
        let contact_control = site.doc.add_group("Contact", Some("Contact"));
        let mut resolver = Resolver::new(SiteConfig::default());
        let resolution = resolver.resolve(&mut site.doc, &url("/pages/contact.html"));

        assert_eq!(marked(&resolution), [(site.contact, ActiveAnnotation::TopLevelActive)]);
        assert!(site.doc.classes(contact_control).is_empty());
    }

    #[test]
    fn unknown_page_falls_back_to_file_name() {
        let mut site = site();
        let custom = site.doc.add_link("/pages/custom-page.html", "Custom");
        let nested = site.doc.add_link("/archive/custom-page.html.bak", "Old");
        let mut resolver = Resolver::new(SiteConfig::default());
        let resolution = resolver.resolve(&mut site.doc, &url("/pages/custom-page.html"));

        assert_eq!(
            resolution,
            Resolution::Applied {
                plan: Plan::Fallback { file: "custom-page.html".into() },
                marks: vec![
                    Mark {
                        element: custom,
                        annotation: ActiveAnnotation::TopLevelActive,
                        promoted_from: None
                    },
                    Mark {
                        element: nested,
                        annotation: ActiveAnnotation::TopLevelActive,
                        promoted_from: None
                    },
                ],
            }
        );
    }

    #[test]
    fn unchanged_route_performs_zero_writes() {
        let mut site = site();
        let mut resolver = Resolver::new(SiteConfig::default());
        let target = url("/pages/tourfinal.html?category=omo-valley");

        let mut counter = RecordingDocument::unrecorded(&mut site.doc);
        resolver.resolve(&mut counter, &target);
        let after_first = counter.write_count();
        assert!(after_first > 0);

        assert_eq!(resolver.resolve(&mut counter, &target), Resolution::Unchanged);
        assert_eq!(counter.write_count(), after_first);
    }

    #[test]
    fn navigating_away_clears_previous_annotations() {
        let mut site = site();
        let mut resolver = Resolver::new(SiteConfig::default());
        resolver.resolve(&mut site.doc, &url("/pages/tourfinal.html?category=bird-watching"));
        resolver.resolve(&mut site.doc, &url("/pages/contact.html"));

        let classes = AnnotationClasses::default();
        let active = site.doc.annotated(&classes);
        assert_eq!(active, [(site.contact, ActiveAnnotation::TopLevelActive)]);
    }

    #[test]
    fn promoted_toggle_outside_snapshot_is_cleared() {
        let mut doc = MemoryDocument::new();
        // A group whose toggle is not a desktop control.
        let toggle = doc.add_detached_toggle("About");
        doc.add_group_link(toggle, "/pages/about-company.html", "Company");
        let mut resolver = Resolver::new(SiteConfig::default());

        resolver.resolve(&mut doc, &url("/pages/about-company.html"));
        assert!(!doc.classes(toggle).is_empty());

        resolver.resolve(&mut doc, &url("/pages/contact.html"));
        assert!(doc.classes(toggle).is_empty());
    }

    #[test]
    fn invalidation_picks_up_new_links() {
        let mut site = site();
        let mut resolver = Resolver::new(SiteConfig::default());
        let target = url("/pages/tourfinal.html?category=day-trips");
        resolver.resolve(&mut site.doc, &target);

        let day_trips =
            site.doc.add_group_link(site.tours, "/pages/tourfinal.html?category=day-trips", "Day");
        assert_eq!(resolver.resolve_forced(&mut site.doc, &target).marks().len(), 2);
        assert!(site.doc.classes(day_trips).is_empty(), "stale snapshot misses the link");

        resolver.invalidate();
        let resolution = resolver.resolve_forced(&mut site.doc, &target);
        assert!(marked(&resolution).contains(&(day_trips, ActiveAnnotation::SubActive)));
    }

    #[test]
    fn section_plan_carries_query_value() {
        let route = Route::from_url(&url("/pages/tailormadetour.html?tour=simien&x=1"));
        assert_eq!(
            plan(&SiteConfig::default(), &route),
            Plan::Section {
                label: "Tailor-made Tours".into(),
                query_key: "tour".into(),
                value: Some("simien".into()),
            }
        );
    }

    #[test]
    fn plans_display_for_command_output() {
        let section = Plan::Section {
            label: "Tour Packages".into(),
            query_key: "category".into(),
            value: Some("city-tour".into()),
        };
        assert_eq!(section.to_string(), "section \"Tour Packages\" (category=city-tour)");
        assert_eq!(Plan::Fallback { file: "blog.html".into() }.to_string(), "fallback blog.html");
        assert_eq!(Plan::Home.to_string(), "home");
    }
}
