//! Live tour listing (feature `web`).
//!
//! Renders the catalog into `#tours-container` for the page URL, then drives
//! each card's [`Slideshow`] and every tour and day [`Accordion`] from DOM
//! events.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, NodeList, Window};

use crate::catalog::accordion::Accordion;
use crate::catalog::render::render_for_url;
use crate::catalog::slideshow::Slideshow;
use crate::catalog::Catalog;
use crate::nav::watcher::ReadyState;

const CONTAINER_ID: &str = "tours-container";
const ROTATED: &str = "rotate-180";
/// Autoplay clock resolution.
const TICK: Duration = Duration::from_millis(250);

fn elements(nodes: &NodeList) -> Vec<Element> {
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn scroll_height(element: &Element) -> u32 {
    u32::try_from(element.scroll_height()).unwrap_or(0)
}

/// One card's images and which of them is shown.
struct Slides {
    images: Vec<Element>,
    show: Slideshow,
}

impl Slides {
    fn paint(&self) {
        for (index, image) in self.images.iter().enumerate() {
            let (on, off) =
                if self.show.is_visible(index) { ("block", "hidden") } else { ("hidden", "block") };
            let list = image.class_list();
            let _ = list.remove_1(off);
            let _ = list.add_1(on);
        }
    }
}

/// Renders the tour listing once the document is parsed and wires its
/// slideshows and accordions.
///
/// # Errors
///
/// Returns the JavaScript error if there is no window or document, or if the
/// ready listener cannot be registered.
pub fn install_tours(catalog: Catalog) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    if !ReadyState::parse(&document.ready_state()).is_loading() {
        return render_listing(&window, &catalog);
    }
    let on_ready = Closure::<dyn FnMut()>::new(move || {
        if let Err(err) = render_listing(&window, &catalog) {
            warn!(?err, "failed to render tour listing");
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    on_ready.forget();
    Ok(())
}

/// `installTours(catalogJson)` entry point.
///
/// # Errors
///
/// Returns an error if the catalog is not a JSON list of tours, or see
/// [`install_tours`].
#[wasm_bindgen(js_name = installTours)]
pub fn install_tours_json(catalog: &str) -> Result<(), JsValue> {
    let catalog = Catalog::from_json(catalog).map_err(|e| JsValue::from_str(&e))?;
    install_tours(catalog)
}

fn render_listing(window: &Window, catalog: &Catalog) -> Result<(), JsValue> {
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let href = window.location().href()?;
    let url = Url::parse(&href).map_err(|e| JsValue::from_str(&format!("bad page URL {href}: {e}")))?;
    let page = render_for_url(catalog, &url);

    if let Some(heading) = document.query_selector("h1")? {
        heading.set_text_content(Some(&page.title));
    }
    let container = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| JsValue::from_str("no #tours-container"))?;
    container.set_inner_html(&page.html);

    wire_accordions(&container, ".tour-accordion-header")?;
    wire_accordions(&container, ".day-accordion-header")?;
    wire_slideshows(window, &container)?;
    debug!(title = %page.title, "tour listing rendered");
    Ok(())
}

/// Each header toggles the panel right after it. The panel is measured when
/// it opens, since its content may have grown.
fn wire_accordions(container: &Element, selector: &str) -> Result<(), JsValue> {
    for header in elements(&container.query_selector_all(selector)?) {
        let Some(panel) = header.next_element_sibling() else { continue };
        let icon = header.query_selector("svg")?;
        let open = icon.as_ref().is_some_and(|icon| icon.class_list().contains(ROTATED));
        let height = scroll_height(&panel);
        let mut state = if open { Accordion::expanded(height) } else { Accordion::collapsed(height) };

        let on_click = Closure::<dyn FnMut()>::new(move || {
            state.toggle();
            if state.is_expanded() {
                state.resize(scroll_height(&panel));
            }
            let _ = panel.set_attribute("style", &format!("max-height: {};", state.max_height()));
            if let Some(icon) = &icon {
                let list = icon.class_list();
                let _ = if state.icon_rotated() { list.add_1(ROTATED) } else { list.remove_1(ROTATED) };
            }
        });
        header.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}

/// Cards with several images get prev/next handlers and share one autoplay
/// interval.
fn wire_slideshows(window: &Window, container: &Element) -> Result<(), JsValue> {
    let mut shows = Vec::new();
    for frame in elements(&container.query_selector_all(".tour-slideshow")?) {
        let images = elements(&frame.query_selector_all("img")?);
        let show = Slideshow::new(images.len());
        if !show.has_controls() {
            continue;
        }
        let slides = Rc::new(RefCell::new(Slides { images, show }));
        slides.borrow().paint();

        for (selector, forward) in [(".prev", false), (".next", true)] {
            let Some(button) = frame.query_selector(selector)? else { continue };
            let slides = Rc::clone(&slides);
            // The buttons sit inside the card header; keep the card closed.
            let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                event.stop_propagation();
                let mut slides = slides.borrow_mut();
                if forward {
                    slides.show.next();
                } else {
                    slides.show.prev();
                }
                slides.paint();
            });
            button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
            on_click.forget();
        }
        shows.push(slides);
    }
    if shows.is_empty() {
        return Ok(());
    }

    let on_tick = Closure::<dyn FnMut()>::new(move || {
        for slides in &shows {
            let mut slides = slides.borrow_mut();
            if slides.show.tick(TICK) > 0 {
                slides.paint();
            }
        }
    });
    let period = i32::try_from(TICK.as_millis()).unwrap_or(i32::MAX);
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        on_tick.as_ref().unchecked_ref(),
        period,
    )?;
    on_tick.forget();
    Ok(())
}
