use gloo_events::EventListener;
use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::SetupError;

pub fn window() -> Result<Window, SetupError> {
    web_sys::window().ok_or(SetupError::MissingGlobal("window"))
}

pub fn document(window: &Window) -> Result<Document, SetupError> {
    window.document().ok_or(SetupError::MissingGlobal("document"))
}

/// First element matching `selector`, `None` when the page has none.
pub fn query(document: &Document, selector: &str) -> Result<Option<Element>, SetupError> {
    document
        .query_selector(selector)
        .map_err(SetupError::js("querySelector"))
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, SetupError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(SetupError::js("querySelectorAll"))?;

    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<T>().ok())
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        warn!("Could not set {}: {:?}", property, err);
    }
}

/// Listeners registered by one behavior. Dropping the group detaches them.
#[derive(Default)]
pub struct ListenerGroup {
    listeners: Vec<EventListener>,
}

impl ListenerGroup {
    pub fn push(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// `None` when nothing was registered, so callers can report the
    /// behavior as not applicable.
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }

    pub fn dispose(self) {
        drop(self);
    }
}
