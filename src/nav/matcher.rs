//! Label and link matching against a navigation snapshot.

use tracing::{debug, trace};
use url::Url;

use super::annotation::{ActiveAnnotation, AnnotationClasses, Mark};
use super::normalize::normalize;
use super::rules::PromotionRule;
use super::snapshot::NavigationSnapshot;
use crate::ports::{ElementId, NavDocument};

/// Applies annotations to a document and keeps track of what it marked.
pub struct Annotator<'a, D: NavDocument + ?Sized> {
    doc: &'a mut D,
    classes: &'a AnnotationClasses,
    promotion: &'a PromotionRule,
    base: Option<&'a Url>,
    marks: Vec<Mark>,
}

impl<'a, D: NavDocument + ?Sized> Annotator<'a, D> {
    /// Creates an annotator. `base` is the page origin that hrefs resolve
    /// against; without one no link can match.
    pub fn new(
        doc: &'a mut D,
        classes: &'a AnnotationClasses,
        promotion: &'a PromotionRule,
        base: Option<&'a Url>,
    ) -> Self {
        Self { doc, classes, promotion, base, marks: Vec::new() }
    }

    /// Marks controls whose visible text matches `label`.
    ///
    /// Desktop controls match on exact normalized equality, preferring a
    /// nested label node over their own text. Mobile toggles match on prefix,
    /// since they carry trailing decoration. Both passes always run.
    /// Returns the number of controls marked.
    pub fn match_by_label(&mut self, label: &str, snapshot: &NavigationSnapshot) -> usize {
        let wanted = normalize(label);
        let before = self.marks.len();

        for &control in &snapshot.top_level_controls {
            let text = self
                .doc
                .label_text(control)
                .or_else(|| self.doc.text_content(control))
                .unwrap_or_default();
            if normalize(&text) == wanted {
                self.mark(control, ActiveAnnotation::TopLevelActive, None);
            }
        }

        for &control in &snapshot.mobile_controls {
            let text = self.doc.text_content(control).unwrap_or_default();
            if normalize(&text).starts_with(&wanted) {
                self.mark(control, ActiveAnnotation::TopLevelActive, None);
            }
        }

        let marked = self.marks.len() - before;
        if marked == 0 {
            debug!(label, "no control carries this label");
        }
        marked
    }

    /// Marks every link whose resolved URL satisfies `predicate`.
    ///
    /// Hrefs that do not resolve against the page origin are skipped. A
    /// matching link to a promoted subpage marks its group toggle instead
    /// of itself. Returns the number of elements marked.
    pub fn match_links<P>(
        &mut self,
        links: &[ElementId],
        predicate: P,
        annotation: ActiveAnnotation,
    ) -> usize
    where
        P: Fn(&Url) -> bool,
    {
        let Some(base) = self.base else {
            debug!("page origin is opaque, no link can resolve");
            return 0;
        };
        let before = self.marks.len();

        for &link in links {
            let Some(href) = self.doc.href(link) else { continue };
            let url = match base.join(&href) {
                Ok(url) => url,
                Err(err) => {
                    trace!(%link, %href, %err, "skipping unresolvable href");
                    continue;
                }
            };
            if !predicate(&url) {
                continue;
            }

            if self.promotion.applies(&url.path().to_lowercase()) {
                if let Some(toggle) = self.doc.group_toggle(link) {
                    debug!(%link, %toggle, "promoting subpage link to its group toggle");
                    self.mark(toggle, ActiveAnnotation::TopLevelActive, Some(link));
                    continue;
                }
            }

            self.mark(link, annotation, None);
        }

        self.marks.len() - before
    }

    /// Consumes the annotator and returns every mark it applied.
    #[must_use]
    pub fn finish(self) -> Vec<Mark> {
        self.marks
    }

    fn mark(
        &mut self,
        element: ElementId,
        annotation: ActiveAnnotation,
        promoted_from: Option<ElementId>,
    ) {
        self.doc.add_classes(element, self.classes.tokens(annotation));
        self.marks.push(Mark { element, annotation, promoted_from });
    }
}
