//! Per-run context deciding how element writes are observed.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::adapters::recording::RecordingDocument;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::session::RecordingSession;
use crate::ports::NavDocument;

/// Carries the optional cassette recorder for one command run.
///
/// Commands wrap every document they resolve against through
/// [`RunContext::document`], so writes are always counted and, when a
/// recording is active, captured.
#[derive(Debug, Default)]
pub struct RunContext {
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl RunContext {
    /// A context that counts writes without recording them.
    #[must_use]
    pub fn live() -> Self {
        Self { recorder: None }
    }

    /// A context recording into a new session under `root`.
    ///
    /// The session must be finished after the context and every document
    /// it wrapped are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(root: PathBuf, source: &str) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(&root, source)?;
        let ctx = Self { recorder: Some(Arc::clone(&session.dom)) };
        Ok((ctx, session))
    }

    /// Returns `true` when writes are being recorded.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Wraps a document for this run.
    pub fn document<D: NavDocument>(&self, doc: D) -> RecordingDocument<D> {
        match &self.recorder {
            Some(recorder) => RecordingDocument::new(doc, Arc::clone(recorder)),
            None => RecordingDocument::unrecorded(doc),
        }
    }
}
