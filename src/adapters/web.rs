//! Live browser adapter (feature `web`).
//!
//! Serves the navigation of the current page through `web-sys` and wires the
//! page lifecycle (ready, popstate, nav mutations, unload) to one
//! [`NavSession`].

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit, Window};

use super::handles::HandleTable;
use crate::config::SiteConfig;
use crate::nav::watcher::{MutationKind, MutationRecord, NavSession, ReadyState};
use crate::ports::{ElementId, ElementKind, NavDocument};

const NAV_ROOT: &str = "nav";
const GROUP: &str = ".relative.group";
/// Attribute carrying an element's handle, so lookups skip a table scan.
const HANDLE_ATTR: &str = "data-navmark-id";

fn selector(kind: ElementKind) -> &'static str {
    match kind {
        ElementKind::TopLevelControl => "nav .relative.group > button",
        ElementKind::MobileControl => "nav button.mobile-dropdown-toggle",
        ElementKind::Link => "nav a[href]",
    }
}

/// The live document, with elements interned to stable handles.
///
/// Handles are stamped on the element as `data-navmark-id`. Elements that
/// left the document are dropped on the next query, so re-rendered menus do
/// not accumulate.
pub struct LiveDocument {
    document: Document,
    elements: RefCell<HandleTable<Element>>,
}

impl LiveDocument {
    /// Wraps a browser document.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document, elements: RefCell::new(HandleTable::default()) }
    }

    fn intern(&self, element: Element) -> ElementId {
        let stamped = element
            .get_attribute(HANDLE_ATTR)
            .and_then(|raw| raw.parse::<u32>().ok())
            .map(ElementId);
        let mut elements = self.elements.borrow_mut();
        if let Some(id) = stamped {
            // A cloned node carries its source's stamp, so check identity.
            if elements.get(id).is_some_and(|known| known.is_same_node(Some(&element))) {
                return id;
            }
        }
        let id = elements.insert(element.clone());
        if let Err(err) = element.set_attribute(HANDLE_ATTR, &id.0.to_string()) {
            warn!(?err, "failed to stamp navigation element handle");
        }
        id
    }

    fn prune_detached(&self) {
        self.elements.borrow_mut().retain(|element| element.is_connected());
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id).cloned()
    }
}

impl NavDocument for LiveDocument {
    fn has_nav_root(&self) -> bool {
        matches!(self.document.query_selector(NAV_ROOT), Ok(Some(_)))
    }

    fn query(&self, kind: ElementKind) -> Vec<ElementId> {
        self.prune_detached();
        let Ok(nodes) = self.document.query_selector_all(selector(kind)) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect()
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.element(element)?.text_content()
    }

    fn label_text(&self, element: ElementId) -> Option<String> {
        let span = self.element(element)?.query_selector("span").ok()??;
        span.text_content()
    }

    fn href(&self, element: ElementId) -> Option<String> {
        self.element(element)?.get_attribute("href")
    }

    fn group_toggle(&self, element: ElementId) -> Option<ElementId> {
        let group = self.element(element)?.closest(GROUP).ok()??;
        let button = group.query_selector("button").ok()??;
        Some(self.intern(button))
    }

    fn add_classes(&mut self, element: ElementId, classes: &[String]) {
        if let Some(element) = self.element(element) {
            let list = element.class_list();
            for class in classes {
                let _ = list.add_1(class);
            }
        }
    }

    fn remove_classes(&mut self, element: ElementId, classes: &[String]) {
        if let Some(element) = self.element(element) {
            let list = element.class_list();
            for class in classes {
                let _ = list.remove_1(class);
            }
        }
    }
}

struct Page {
    window: Window,
    doc: LiveDocument,
    session: NavSession,
    observer: Option<MutationObserver>,
}

impl Page {
    fn current_url(&self) -> Option<Url> {
        let href = self.window.location().href().ok()?;
        Url::parse(&href).ok()
    }
}

/// Installs navigation highlighting on the current page.
///
/// When the document is already parsed (the module loaded after
/// `DOMContentLoaded`), the page is resolved right away instead of waiting
/// for an event that will not fire again.
///
/// # Errors
///
/// Returns the JavaScript error if there is no window or document, or if an
/// event listener cannot be registered.
pub fn install(config: SiteConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let page = Rc::new(RefCell::new(Page {
        window: window.clone(),
        doc: LiveDocument::new(document.clone()),
        session: NavSession::new(config),
        observer: None,
    }));

    let state = ReadyState::parse(&document.ready_state());
    if state.is_loading() {
        let on_ready = {
            let page = Rc::clone(&page);
            Closure::<dyn FnMut()>::new(move || {
                if let Err(err) = ready(&page, ReadyState::Interactive) {
                    warn!(?err, "failed to attach navigation observer");
                }
            })
        };
        document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
        on_ready.forget();
    } else {
        ready(&page, state)?;
    }

    let on_popstate = {
        let page = Rc::clone(&page);
        Closure::<dyn FnMut()>::new(move || {
            let mut page = page.borrow_mut();
            if let Some(url) = page.current_url() {
                let Page { doc, session, .. } = &mut *page;
                session.on_popstate(doc, &url);
            }
        })
    };
    window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())?;
    on_popstate.forget();

    let on_unload = {
        let page = Rc::clone(&page);
        Closure::<dyn FnMut()>::new(move || {
            let mut page = page.borrow_mut();
            if let Some(observer) = page.observer.take() {
                observer.disconnect();
            }
            page.session.on_unload();
        })
    };
    window.add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())?;
    on_unload.forget();

    Ok(())
}

/// `installNavmark()` entry point with the default site configuration.
///
/// # Errors
///
/// See [`install`].
#[wasm_bindgen(js_name = installNavmark)]
pub fn install_default() -> Result<(), JsValue> {
    install(SiteConfig::default())
}

fn ready(page: &Rc<RefCell<Page>>, state: ReadyState) -> Result<(), JsValue> {
    let nav = {
        let mut guard = page.borrow_mut();
        let Some(url) = guard.current_url() else { return Ok(()) };
        let Page { doc, session, .. } = &mut *guard;
        if session.on_install(doc, &url, state).is_none() || !session.is_watching() {
            return Ok(());
        }
        doc.document.query_selector(NAV_ROOT)?
    };
    let Some(nav) = nav else { return Ok(()) };

    let callback = {
        let page = Rc::clone(page);
        Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |mutations: js_sys::Array, _observer: MutationObserver| {
                let records: Vec<MutationRecord> = mutations
                    .iter()
                    .filter_map(|m| m.dyn_into::<web_sys::MutationRecord>().ok())
                    .map(|m| MutationRecord {
                        kind: match m.type_().as_str() {
                            "childList" => MutationKind::ChildList,
                            "attributes" => MutationKind::Attributes,
                            _ => MutationKind::CharacterData,
                        },
                        added_nodes: m.added_nodes().length() as usize,
                    })
                    .collect();
                let mut guard = page.borrow_mut();
                if let Some(url) = guard.current_url() {
                    let Page { doc, session, .. } = &mut *guard;
                    session.on_mutations(doc, &url, &records);
                }
            },
        )
    };
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    callback.forget();

    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&nav, &options)?;
    page.borrow_mut().observer = Some(observer);
    Ok(())
}
