//! Expand/collapse state for tour and day accordions.

/// One accordion section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accordion {
    expanded: bool,
    content_height: u32,
}

impl Accordion {
    /// A collapsed section whose content is `content_height` pixels tall.
    #[must_use]
    pub fn collapsed(content_height: u32) -> Self {
        Self { expanded: false, content_height }
    }

    /// An expanded section.
    #[must_use]
    pub fn expanded(content_height: u32) -> Self {
        Self { expanded: true, content_height }
    }

    /// Flips between collapsed and expanded.
    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// Updates the measured content height, as when the panel's contents
    /// change size.
    pub fn resize(&mut self, content_height: u32) {
        self.content_height = content_height;
    }

    /// Returns `true` when open.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// CSS `max-height` for the content panel.
    #[must_use]
    pub fn max_height(&self) -> String {
        if self.expanded {
            format!("{}px", self.content_height)
        } else {
            "0".to_string()
        }
    }

    /// Whether the header chevron is rotated (`rotate-180`).
    #[must_use]
    pub fn icon_rotated(&self) -> bool {
        self.expanded
    }
}
