//! Tour catalog: records, category filtering, and page rendering.

pub mod accordion;
pub mod render;
pub mod slideshow;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Shown when a tour has no images.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x300?text=No+Image";

/// Heading used when no category is selected or the category is unknown.
pub const DEFAULT_TITLE: &str = "Tour Packages";

const CATEGORY_NAMES: &[(&str, &str)] = &[
    ("bird-watching", "Bird Watching Tours"),
    ("city-tour", "City Tours"),
    ("combinations", "Combination Tours"),
    ("day-trips", "Day Trips"),
    ("festival-holidays", "Festival & Holidays Tours"),
    ("festival-tour", "Fixed Departure Tours"),
    ("historic-route", "Historic Route Tours"),
    ("bale-mountains", "Bale Mountains Tours"),
    ("omo-valley", "Omo Valley Tours"),
    ("trekking-hiking", "Trekking & Hiking Tours"),
];

/// Display heading for a category slug.
#[must_use]
pub fn category_display_name(category: &str) -> &'static str {
    CATEGORY_NAMES
        .iter()
        .find(|(slug, _)| *slug == category)
        .map_or(DEFAULT_TITLE, |(_, name)| name)
}

/// One or many images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Images {
    /// A single image URL.
    One(String),
    /// Several image URLs, shown as a slideshow.
    Many(Vec<String>),
}

/// A missing `image` field shows the placeholder.
impl Default for Images {
    fn default() -> Self {
        Self::One(String::new())
    }
}

/// A day of a tour itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourDay {
    /// Day number.
    pub day: u32,
    /// Short title.
    pub title: String,
    /// Description of the day.
    #[serde(default)]
    pub description: String,
    /// Optional illustration.
    #[serde(default)]
    pub image: Option<String>,
}

/// A tour record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    /// Tour code, also used in `?tour=` links.
    pub id: String,
    /// Tour title.
    pub title: String,
    /// Human-readable duration ("8 days").
    #[serde(default)]
    pub duration: String,
    /// Transport used.
    #[serde(default)]
    pub transport: String,
    /// Overview paragraph.
    #[serde(default)]
    pub description: String,
    /// Category slug.
    pub category: String,
    /// Images for the card slideshow.
    #[serde(default)]
    pub image: Images,
    /// Itinerary.
    #[serde(default)]
    pub days: Vec<TourDay>,
}

impl Tour {
    /// Images to show. A missing or empty single image falls back to the
    /// placeholder; an explicit empty list shows nothing.
    #[must_use]
    pub fn images(&self) -> Vec<&str> {
        match &self.image {
            Images::One(url) if url.is_empty() => vec![PLACEHOLDER_IMAGE],
            Images::One(url) => vec![url.as_str()],
            Images::Many(urls) => urls.iter().map(String::as_str).collect(),
        }
    }
}

/// An ordered collection of tours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tours: Vec<Tour>,
}

impl Catalog {
    /// Builds a catalog from tours in display order.
    #[must_use]
    pub fn new(tours: Vec<Tour>) -> Self {
        Self { tours }
    }

    /// Loads a catalog from a JSON (`.json`) or YAML file holding a list of
    /// tours.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read tour catalog {}: {e}", path.display()))?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json { Self::from_json(&content) } else { Self::from_yaml(&content) };
        parsed.map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Parses a JSON list of tours.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse tour catalog: {e}"))
    }

    /// Parses a YAML list of tours.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse tour catalog: {e}"))
    }

    /// All tours.
    #[must_use]
    pub fn tours(&self) -> &[Tour] {
        &self.tours
    }

    /// Tours in `category`, or every tour when no category is given.
    #[must_use]
    pub fn filter_by_category(&self, category: Option<&str>) -> Vec<&Tour> {
        match category {
            None => self.tours.iter().collect(),
            Some(category) => self.tours.iter().filter(|t| t.category == category).collect(),
        }
    }
}
