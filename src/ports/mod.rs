//! Port traits defining external boundaries.
//!
//! The resolver never touches a live document directly. Everything it reads
//! or writes goes through [`NavDocument`], with implementations living in
//! `src/adapters/`.

pub mod document;

pub use document::{ElementId, ElementKind, NavDocument};
