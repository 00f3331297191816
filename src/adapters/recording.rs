//! Recording adapter that counts and captures element writes.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ElementId, ElementKind, NavDocument};

/// Input payload recorded for a class write.
#[derive(Debug, Serialize)]
pub(crate) struct ClassWrite<'a> {
    pub element: ElementId,
    pub classes: &'a [String],
}

/// Record one interaction on a shared recorder.
pub(crate) fn record_interaction<I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
) where
    I: Serialize,
{
    let input_json = match serde_json::to_value(input) {
        Ok(value) => value,
        Err(err) => {
            warn!(port, method, %err, "dropping unserializable interaction");
            return;
        }
    };
    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, input_json, serde_json::Value::Null);
}

/// Wraps a document, counting every class write and optionally recording it
/// to a cassette. Reads pass straight through.
pub struct RecordingDocument<D> {
    inner: D,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
    writes: usize,
}

impl<D: NavDocument> RecordingDocument<D> {
    /// Records writes on `inner` into `recorder`.
    pub fn new(inner: D, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder: Some(recorder), writes: 0 }
    }

    /// Counts writes on `inner` without recording them.
    pub fn unrecorded(inner: D) -> Self {
        Self { inner, recorder: None, writes: 0 }
    }

    /// Number of class writes seen so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// The wrapped document.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The wrapped document, mutably. Changes made through it are not
    /// counted.
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    /// Unwraps the document.
    pub fn into_inner(self) -> D {
        self.inner
    }

    fn record(&mut self, method: &str, element: ElementId, classes: &[String]) {
        self.writes += 1;
        if let Some(recorder) = &self.recorder {
            record_interaction(recorder, "dom", method, &ClassWrite { element, classes });
        }
    }
}

impl<D: NavDocument> NavDocument for RecordingDocument<D> {
    fn has_nav_root(&self) -> bool {
        self.inner.has_nav_root()
    }

    fn query(&self, kind: ElementKind) -> Vec<ElementId> {
        self.inner.query(kind)
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.inner.text_content(element)
    }

    fn label_text(&self, element: ElementId) -> Option<String> {
        self.inner.label_text(element)
    }

    fn href(&self, element: ElementId) -> Option<String> {
        self.inner.href(element)
    }

    fn group_toggle(&self, element: ElementId) -> Option<ElementId> {
        self.inner.group_toggle(element)
    }

    fn add_classes(&mut self, element: ElementId, classes: &[String]) {
        self.inner.add_classes(element, classes);
        self.record("add_classes", element, classes);
    }

    fn remove_classes(&mut self, element: ElementId, classes: &[String]) {
        self.inner.remove_classes(element, classes);
        self.record("remove_classes", element, classes);
    }
}
