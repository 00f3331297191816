//! Verifying adapter that checks element writes against a cassette.

use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ElementId, ElementKind, NavDocument};

use super::recording::ClassWrite;

/// Wraps a document and compares every class write, method and input, with
/// the next recorded `dom` write in `seq` order.
///
/// Divergences are collected rather than raised, so a whole run can be
/// reported at once.
pub struct VerifyingDocument<D> {
    inner: D,
    replayer: CassetteReplayer,
    mismatches: Vec<String>,
}

impl<D: NavDocument> VerifyingDocument<D> {
    /// Verifies writes on `inner` against `expected`.
    #[must_use]
    pub fn new(inner: D, expected: &Cassette) -> Self {
        Self { inner, replayer: CassetteReplayer::new(expected), mismatches: Vec::new() }
    }

    /// Mismatches found so far.
    #[must_use]
    pub fn mismatches(&self) -> &[String] {
        &self.mismatches
    }

    /// The wrapped document.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// The wrapped document, mutably. Changes made through it are not
    /// verified.
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }

    /// Ends verification, adding a mismatch if expected writes were never
    /// made.
    ///
    /// # Errors
    ///
    /// Returns every mismatch when the run diverged from the cassette.
    pub fn finish(mut self) -> Result<D, Vec<String>> {
        let remaining = self.replayer.remaining();
        if remaining > 0 {
            self.mismatches.push(format!("{remaining} expected writes were never made"));
        }
        if self.mismatches.is_empty() {
            Ok(self.inner)
        } else {
            Err(self.mismatches)
        }
    }

    fn check(&mut self, method: &str, element: ElementId, classes: &[String]) {
        let actual = match serde_json::to_value(ClassWrite { element, classes }) {
            Ok(value) => value,
            Err(e) => {
                self.mismatches.push(format!("{method} on {element}: {e}"));
                return;
            }
        };
        match self.replayer.next_interaction("dom", method) {
            Ok(expected) if expected.input == actual => {}
            Ok(expected) => self.mismatches.push(format!(
                "{method} seq={}: expected {}, got {actual}",
                expected.seq, expected.input
            )),
            Err(e) => self.mismatches.push(format!("unexpected {method} {actual}: {e}")),
        }
    }
}

impl<D: NavDocument> NavDocument for VerifyingDocument<D> {
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
        self.check("add_classes", element, classes);
    }

    fn remove_classes(&mut self, element: ElementId, classes: &[String]) {
        self.inner.remove_classes(element, classes);
        self.check("remove_classes", element, classes);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::adapters::memory::MemoryDocument;
    use crate::adapters::recording::RecordingDocument;
    use crate::cassette::recorder::CassetteRecorder;

    fn recorded(writes: &[(&str, u32, &str)]) -> Cassette {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new("unused", "t", "nav")));
        let mut doc = MemoryDocument::new();
        doc.add_link("/", "a");
        doc.add_link("/b", "b");
        let mut rec = RecordingDocument::new(doc, Arc::clone(&recorder));
        for &(method, element, class) in writes {
            let classes = [class.to_string()];
            if method == "add" {
                rec.add_classes(ElementId(element), &classes);
            } else {
                rec.remove_classes(ElementId(element), &classes);
            }
        }
        let cassette = recorder.lock().unwrap().to_cassette();
        cassette
    }

    #[test]
    fn identical_run_verifies() {
        let cassette = recorded(&[("remove", 0, "x"), ("add", 1, "y")]);
        let mut verify = VerifyingDocument::new(MemoryDocument::new(), &cassette);
        verify.remove_classes(ElementId(0), &["x".to_string()]);
        verify.add_classes(ElementId(1), &["y".to_string()]);
        assert!(verify.finish().is_ok());
    }

    #[test]
    fn divergent_write_is_reported() {
        let cassette = recorded(&[("add", 1, "y")]);
        let mut verify = VerifyingDocument::new(MemoryDocument::new(), &cassette);
        verify.add_classes(ElementId(0), &["y".to_string()]);
        assert_eq!(verify.mismatches().len(), 1);
        assert!(verify.mismatches()[0].contains("expected"));
    }

    #[test]
    fn missing_write_is_reported() {
        let cassette = recorded(&[("add", 1, "y"), ("add", 0, "z")]);
        let mut verify = VerifyingDocument::new(MemoryDocument::new(), &cassette);
        verify.add_classes(ElementId(1), &["y".to_string()]);
        let errors = verify.finish().unwrap_err();
        assert_eq!(errors, vec!["1 expected writes were never made".to_string()]);
    }

    #[test]
    fn extra_write_is_reported() {
        let cassette = recorded(&[("add", 1, "y")]);
        let mut verify = VerifyingDocument::new(MemoryDocument::new(), &cassette);
        verify.add_classes(ElementId(1), &["y".to_string()]);
        verify.remove_classes(ElementId(1), &["y".to_string()]);
        let errors = verify.finish().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("unexpected remove_classes"));
        assert!(errors[0].contains("Cassette exhausted"));
    }

    #[test]
    fn reordered_remove_and_add_is_reported() {
        // Remove-then-add leaves the token set; add-then-remove clears it.
        let cassette = recorded(&[("remove", 1, "pb-1"), ("add", 1, "pb-1")]);
        let mut verify = VerifyingDocument::new(MemoryDocument::new(), &cassette);
        verify.add_classes(ElementId(1), &["pb-1".to_string()]);
        verify.remove_classes(ElementId(1), &["pb-1".to_string()]);
        let errors = verify.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("expected remove_classes at seq=0"));
        assert!(errors[1].contains("expected add_classes at seq=1"));
    }
}
