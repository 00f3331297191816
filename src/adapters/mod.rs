//! Implementations of the [`NavDocument`](crate::ports::NavDocument) port.
//!
//! - `memory`: in-memory document built from code or a YAML fixture
//! - `recording`: write-counting wrapper that can record to a cassette
//! - `verifying`: wrapper that checks writes against a recorded cassette
//! - `handles`: id table for host elements (feature `web`)
//! - `web`: the live browser DOM (feature `web`)
//! - `web_tours`: the live tour listing (feature `web`)

#[cfg(any(feature = "web", test))]
pub mod handles;
pub mod memory;
pub mod recording;
pub mod verifying;
#[cfg(feature = "web")]
pub mod web;
#[cfg(feature = "web")]
pub mod web_tours;

pub use memory::{MemoryDocument, NavFixture};
pub use recording::RecordingDocument;
pub use verifying::VerifyingDocument;
