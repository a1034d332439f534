use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom::{self, ListenerGroup};
use crate::error::SetupError;

pub const HOVER_TRANSITION: &str = "transform 0.3s ease, box-shadow 0.3s ease";
pub const LIFTED: &str = "translateY(-10px)";
pub const RESTING: &str = "translateY(0)";

/// Cards rise a little while the pointer is over them.
pub fn install(document: &Document, selector: &str) -> Result<Option<ListenerGroup>, SetupError> {
    let mut group = ListenerGroup::default();

    let cards = dom::query_all(document, selector)?
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok());

    for card in cards {
        let lift = card.clone();
        group.push(EventListener::new(&card, "mouseenter", move |_| {
            dom::set_style(&lift, "transition", HOVER_TRANSITION);
            dom::set_style(&lift, "transform", LIFTED);
        }));

        let rest = card.clone();
        group.push(EventListener::new(&card, "mouseleave", move |_| {
            dom::set_style(&rest, "transform", RESTING);
        }));
    }

    Ok(group.non_empty())
}
