//! HTML rendering of the tour listing page body.

use std::fmt::Write as _;

use url::Url;

use super::accordion::Accordion;
use super::slideshow::Slideshow;
use super::{category_display_name, Catalog, Tour, TourDay, DEFAULT_TITLE, PLACEHOLDER_IMAGE};

const CHEVRON_PATH: &str = "M5.293 7.293a1 1 0 011.414 0L10 10.586l3.293-3.293a1 1 0 111.414 1.414l-4 4a1 1 0 01-1.414 0l-4-4a1 1 0 010-1.414z";

/// Heading and body of a rendered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Page heading.
    pub title: String,
    /// Markup for the tours container.
    pub html: String,
}

/// Renders the listing selected by the page URL's `category` and `tour`
/// parameters.
#[must_use]
pub fn render_for_url(catalog: &Catalog, url: &Url) -> RenderedPage {
    let category = page_parameter(url, "category");
    let tour = page_parameter(url, "tour");
    render_page(catalog, category.as_deref(), tour.as_deref())
}

/// Last value of `key`, with an empty value counting as absent. Later
/// duplicates overwrite earlier ones.
fn page_parameter(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .filter(|(k, _)| k == key)
        .last()
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Renders tours in `category` (all tours when `None`), pre-expanding the
/// card whose id is `expand`.
#[must_use]
pub fn render_page(
    catalog: &Catalog,
    category: Option<&str>,
    expand: Option<&str>,
) -> RenderedPage {
    let title = category.map_or(DEFAULT_TITLE, category_display_name).to_string();
    let tours = catalog.filter_by_category(category);

    if tours.is_empty() {
        return RenderedPage { title, html: empty_state() };
    }

    let mut html = String::new();
    for tour in tours {
        render_tour(&mut html, tour, expand == Some(tour.id.as_str()));
    }
    RenderedPage { title, html }
}

/// Height reserved for an expanded card's itinerary.
#[must_use]
pub fn expanded_height(tour: &Tour) -> u32 {
    u32::try_from(tour.days.len()).unwrap_or(u32::MAX).saturating_mul(200).saturating_add(400)
}

fn empty_state() -> String {
    concat!(
        "<div class=\"bg-white rounded-lg shadow-md p-8 text-center\">\n",
        "  <h3 class=\"text-xl font-semibold text-gray-800 mb-4\">No tours found</h3>\n",
        "  <p class=\"text-gray-600\">There are no tours available for the selected category.</p>\n",
        "  <a href=\"./pages/tour.html\" class=\"inline-block mt-4 px-6 py-2 bg-red-600 text-white rounded-md hover:bg-red-700 transition-colors\">View All Tours</a>\n",
        "</div>\n",
    )
    .to_string()
}

fn render_tour(out: &mut String, tour: &Tour, expand: bool) {
    let id = escape(&tour.id);
    let title = escape(&tour.title);
    let accordion = if expand {
        Accordion::expanded(expanded_height(tour))
    } else {
        Accordion::collapsed(expanded_height(tour))
    };
    let images = tour.images();
    let slideshow = Slideshow::new(images.len());

    let _ = writeln!(
        out,
        "<div class=\"bg-white rounded-lg shadow-md overflow-hidden tour-accordion-item\" id=\"tour-{id}\">"
    );
    out.push_str("  <div class=\"tour-accordion-header flex flex-col md:flex-row justify-between items-start md:items-center p-4 md:p-6 cursor-pointer\">\n");
    out.push_str("    <div class=\"w-full md:w-1/3 mb-4 md:mb-0 relative\">\n");
    out.push_str("      <div class=\"tour-slideshow relative overflow-hidden rounded-lg\">\n");
    for (index, image) in images.iter().enumerate() {
        let visibility = if slideshow.is_visible(index) { "block" } else { "hidden" };
        let _ = writeln!(
            out,
            "        <img src=\"{}\" alt=\"{title} image {}\" class=\"w-full h-48 md:h-56 object-cover {visibility}\">",
            escape(image),
            index + 1
        );
    }
    if slideshow.has_controls() {
        out.push_str("        <button class=\"prev absolute top-1/2 left-2 transform -translate-y-1/2 bg-gray-800 text-white px-2 py-1 rounded\">\u{2039}</button>\n");
        out.push_str("        <button class=\"next absolute top-1/2 right-2 transform -translate-y-1/2 bg-gray-800 text-white px-2 py-1 rounded\">\u{203a}</button>\n");
    }
    out.push_str("      </div>\n    </div>\n");
    out.push_str("    <div class=\"flex-1 md:px-6\">\n");
    let _ = writeln!(out, "      <h2 class=\"text-xl font-bold text-[#ee3054]\">{title}</h2>");
    let _ = writeln!(
        out,
        "      <p class=\"text-sm text-gray-600 mt-1\">Tour Code: {id} | Duration: {}</p>",
        escape(&tour.duration)
    );
    let _ = writeln!(out, "      <p class=\"text-sm text-gray-600\">Transport: {}</p>", escape(&tour.transport));
    out.push_str("    </div>\n");
    let rotate = if accordion.icon_rotated() { " rotate-180" } else { "" };
    let _ = writeln!(out, "    {}", chevron(&format!("h-5 w-5 transform transition-transform mt-4 md:mt-0{rotate}")));
    out.push_str("  </div>\n");

    if accordion.is_expanded() {
        let _ = writeln!(
            out,
            "  <div class=\"tour-accordion-content overflow-y-auto transition-all duration-300\" style=\"max-height: {};\">",
            accordion.max_height()
        );
    } else {
        out.push_str("  <div class=\"tour-accordion-content overflow-y-auto transition-all duration-300 max-h-0\">\n");
    }
    out.push_str("    <div class=\"p-4 md:p-6 border-t border-gray-200\">\n");
    out.push_str("      <h3 class=\"text-lg font-semibold text-gray-800 mb-2\">Tour Overview</h3>\n");
    let _ = writeln!(out, "      <p class=\"text-gray-600\">{}</p>", escape(&tour.description));
    out.push_str("      <h3 class=\"text-lg font-semibold text-gray-800 mb-4\">Itinerary</h3>\n");
    let _ = writeln!(out, "      <div class=\"space-y-3\" id=\"days-container-{id}\">");
    for day in &tour.days {
        render_day(out, day);
    }
    out.push_str("      </div>\n    </div>\n  </div>\n</div>\n");
}

fn render_day(out: &mut String, day: &TourDay) {
    let title = escape(&day.title);
    out.push_str("        <div class=\"day-accordion-item bg-gray-50 rounded-lg\">\n");
    out.push_str("          <div class=\"day-accordion-header flex justify-between items-center p-3 md:p-4 cursor-pointer\">\n");
    let _ = writeln!(
        out,
        "            <span class=\"bg-red-100 text-red-800 text-sm font-medium mr-3 px-2.5 py-0.5 rounded\">Day {}</span>",
        day.day
    );
    let _ = writeln!(out, "            <span class=\"text-gray-700 text-sm md:text-base\">{title}</span>");
    let _ = writeln!(out, "            {}", chevron("h-4 w-4 transform transition-transform"));
    out.push_str("          </div>\n");
    out.push_str("          <div class=\"day-accordion-content overflow-hidden transition-all duration-300 max-h-0\">\n");
    let image = day.image.as_deref().filter(|i| !i.is_empty()).unwrap_or(PLACEHOLDER_IMAGE);
    let _ = writeln!(
        out,
        "            <img src=\"{}\" alt=\"{title}\" class=\"w-full h-40 object-cover rounded mb-2\">",
        escape(image)
    );
    let _ = writeln!(
        out,
        "            <p class=\"text-gray-600 text-sm md:text-base\">{}</p>",
        escape(&day.description)
    );
    out.push_str("          </div>\n        </div>\n");
}

fn chevron(class: &str) -> String {
    format!(
        "<svg class=\"{class}\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 20 20\" fill=\"currentColor\"><path fill-rule=\"evenodd\" d=\"{CHEVRON_PATH}\" clip-rule=\"evenodd\" /></svg>"
    )
}

/// Escapes text for HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
