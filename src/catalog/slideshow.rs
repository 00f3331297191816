//! Card image slideshow state.

use std::time::Duration;

/// Time between automatic advances.
pub const AUTOPLAY_PERIOD: Duration = Duration::from_secs(3);

/// Which image of a card is visible, with wrap-around navigation and an
/// autoplay timer that restarts on manual navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slideshow {
    len: usize,
    current: usize,
    since_advance: Duration,
}

impl Slideshow {
    /// A slideshow over `len` images, showing the first.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len, current: 0, since_advance: Duration::ZERO }
    }

    /// A single image (or none) gets no controls and never advances.
    #[must_use]
    pub fn has_controls(&self) -> bool {
        self.len > 1
    }

    /// Index of the visible image.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Returns `true` if image `index` is the one shown.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        index == self.current
    }

    /// Manual "next": advance with wrap-around and restart autoplay.
    pub fn next(&mut self) {
        self.advance();
        self.since_advance = Duration::ZERO;
    }

    /// Manual "prev": step back with wrap-around and restart autoplay.
    pub fn prev(&mut self) {
        if self.has_controls() {
            self.current = (self.current + self.len - 1) % self.len;
        }
        self.since_advance = Duration::ZERO;
    }

    /// Lets `elapsed` pass on the autoplay timer, advancing once per full
    /// period. Returns the number of advances.
    pub fn tick(&mut self, elapsed: Duration) -> u32 {
        if !self.has_controls() {
            return 0;
        }
        self.since_advance += elapsed;
        let mut advances = 0;
        while self.since_advance >= AUTOPLAY_PERIOD {
            self.since_advance -= AUTOPLAY_PERIOD;
            self.advance();
            advances += 1;
        }
        advances
    }

    fn advance(&mut self) {
        if self.has_controls() {
            self.current = (self.current + 1) % self.len;
        }
    }
}
