//! Placeholder search box. It only reports what would be searched for.

use gloo_events::EventListener;
use log::info;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent};

use crate::dom::{self, ListenerGroup};
use crate::error::SetupError;

pub fn normalize_query(raw: &str) -> Option<String> {
    let term = raw.trim().to_lowercase();
    (!term.is_empty()).then_some(term)
}

pub fn is_submit_key(key: &str) -> bool {
    key == "Enter"
}

fn perform_search(input: &HtmlInputElement) {
    if let Some(term) = normalize_query(&input.value()) {
        info!("Searching for: {}", term);
    }
}

pub fn install(
    document: &Document,
    input_id: &str,
    button_id: &str,
) -> Result<Option<ListenerGroup>, SetupError> {
    let (Some(input), Some(button)) = (
        dom::by_id::<HtmlInputElement>(document, input_id),
        dom::by_id::<Element>(document, button_id),
    ) else {
        return Ok(None);
    };

    let mut group = ListenerGroup::default();

    let on_click = input.clone();
    group.push(EventListener::new(&button, "click", move |_| {
        perform_search(&on_click);
    }));

    let on_key = input.clone();
    group.push(EventListener::new(&input, "keypress", move |event| {
        let submitted = event
            .dyn_ref::<KeyboardEvent>()
            .map_or(false, |event| is_submit_key(&event.key()));
        if submitted {
            perform_search(&on_key);
        }
    }));

    Ok(Some(group))
}
