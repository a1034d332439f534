//! Keyboard activation and visible focus for interactive elements.

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, KeyboardEvent};

use crate::dom::{self, ListenerGroup};
use crate::error::SetupError;

pub const FOCUSED_CLASS: &str = "focused";

/// Keys that press a button.
pub fn activates(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

pub fn install(
    document: &Document,
    interactive: &str,
    focusable: &str,
) -> Result<Option<ListenerGroup>, SetupError> {
    let mut group = ListenerGroup::default();

    let buttons = dom::query_all(document, interactive)?
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok());
    for button in buttons {
        let target = button.clone();
        group.push(EventListener::new_with_options(
            &button,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                    return;
                };
                if activates(&key) {
                    event.prevent_default();
                    target.click();
                }
            },
        ));
    }

    for element in dom::query_all(document, focusable)? {
        let focused = element.clone();
        group.push(EventListener::new(&element, "focus", move |_| {
            let _ = focused.class_list().add_1(FOCUSED_CLASS);
        }));

        let blurred = element.clone();
        group.push(EventListener::new(&element, "blur", move |_| {
            let _ = blurred.class_list().remove_1(FOCUSED_CLASS);
        }));
    }

    Ok(group.non_empty())
}
