//! Navigation active-state resolution.
//!
//! Given the current location and the navigation elements of a page, decide
//! which elements are marked active and apply the marks through a
//! [`NavDocument`](crate::ports::NavDocument).

pub mod annotation;
pub mod matcher;
pub mod normalize;
pub mod resolver;
pub mod route;
pub mod rules;
pub mod snapshot;
pub mod watcher;

pub use annotation::{ActiveAnnotation, AnnotationClasses, Mark};
pub use normalize::normalize;
pub use resolver::{plan, Plan, Resolution, Resolver};
pub use route::{Route, RouteKey};
pub use rules::{PromotionRule, RuleTable, SectionMatch, SectionRule};
pub use snapshot::{NavigationSnapshot, SnapshotCache};
pub use watcher::{ChangeWatcher, MutationKind, MutationRecord, NavSession, ReadyState};
