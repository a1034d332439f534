use std::borrow::Cow;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::dom::{self, ListenerGroup};
use crate::error::SetupError;

/// Room left above a scroll target for the fixed header.
pub const HEADER_OFFSET: f64 = 80.0;

/// Element id named by an in-page link, e.g. `#contact-us` -> `contact-us`.
pub fn fragment_id(href: &str) -> Option<String> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    urlencoding::decode(fragment).ok().map(Cow::into_owned)
}

pub fn scroll_top_for(offset_top: i32) -> f64 {
    (f64::from(offset_top) - HEADER_OFFSET).max(0.0)
}

/// Smooth scrolling for every in-page link.
pub fn install(
    window: &Window,
    document: &Document,
    selector: &str,
) -> Result<Option<ListenerGroup>, SetupError> {
    let mut group = ListenerGroup::default();

    for link in dom::query_all(document, selector)? {
        let window = window.clone();
        let document = document.clone();
        let href_source = link.clone();
        group.push(EventListener::new_with_options(
            &link,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let Some(id) = href_source.get_attribute("href").as_deref().and_then(fragment_id) else {
                    return;
                };
                let Some(target) = document
                    .get_element_by_id(&id)
                    .and_then(|element| element.dyn_into::<HtmlElement>().ok())
                else {
                    return;
                };

                let options = ScrollToOptions::new();
                options.set_top(scroll_top_for(target.offset_top()));
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            },
        ));
    }

    Ok(group.non_empty())
}
