//! Sticky header that slides away while the reader scrolls down and comes
//! back as soon as they scroll up.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::dom;
use crate::error::SetupError;

/// Offsets at or below this never hide the header.
pub const HIDE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVisibility {
    Visible,
    Hidden,
}

impl HeaderVisibility {
    pub fn transform(self) -> &'static str {
        match self {
            HeaderVisibility::Visible => "translateY(0)",
            HeaderVisibility::Hidden => "translateY(-100%)",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScrollState {
    last_offset: f64,
}

/// Decides header visibility from consecutive scroll offsets.
#[derive(Debug, Default)]
pub struct ScrollDirectionTracker {
    state: ScrollState,
}

impl ScrollDirectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_offset(&self) -> f64 {
        self.state.last_offset
    }

    pub fn observe(&mut self, offset: f64) -> HeaderVisibility {
        // Overscroll on touch devices reports negative offsets.
        let current = offset.max(0.0);
        let visibility = if current > self.state.last_offset && current > HIDE_THRESHOLD {
            HeaderVisibility::Hidden
        } else {
            HeaderVisibility::Visible
        };
        self.state.last_offset = current;
        visibility
    }
}

/// Where a visibility decision ends up.
#[cfg_attr(test, mockall::automock)]
pub trait HeaderSurface {
    fn apply(&self, visibility: HeaderVisibility);
}

impl HeaderSurface for HtmlElement {
    fn apply(&self, visibility: HeaderVisibility) {
        dom::set_style(self, "transform", visibility.transform());
    }
}

/// Holds the latest decision until the next frame and drops writes that
/// would not change anything.
pub struct CoalescedWrites<S> {
    surface: S,
    applied: Option<HeaderVisibility>,
    pending: Option<HeaderVisibility>,
}

impl<S: HeaderSurface> CoalescedWrites<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            applied: None,
            pending: None,
        }
    }

    pub fn queue(&mut self, visibility: HeaderVisibility) {
        self.pending = Some(visibility);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn flush(&mut self) {
        let Some(visibility) = self.pending.take() else {
            return;
        };
        if self.applied != Some(visibility) {
            self.surface.apply(visibility);
            self.applied = Some(visibility);
        }
    }
}

struct HeaderState {
    tracker: ScrollDirectionTracker,
    writes: CoalescedWrites<HtmlElement>,
    frame: Option<i32>,
}

/// Installed sticky header. Dropping it (or calling `dispose`) removes the
/// scroll listener and cancels a frame that has not run yet.
pub struct StickyHeader {
    window: Window,
    state: Rc<RefCell<HeaderState>>,
    _scroll: EventListener,
    _on_frame: Rc<Closure<dyn FnMut()>>,
}

impl StickyHeader {
    pub fn install(
        window: &Window,
        document: &Document,
        selector: &str,
    ) -> Result<Option<Self>, SetupError> {
        let Some(header) = dom::query(document, selector)? else {
            return Ok(None);
        };
        let header = header
            .dyn_into::<HtmlElement>()
            .map_err(|_| SetupError::Js {
                context: "header lookup",
                message: format!("`{}` is not an HTML element", selector),
            })?;

        let state = Rc::new(RefCell::new(HeaderState {
            tracker: ScrollDirectionTracker::new(),
            writes: CoalescedWrites::new(header),
            frame: None,
        }));

        let on_frame = {
            let state = state.clone();
            Rc::new(Closure::wrap(Box::new(move || {
                let mut state = state.borrow_mut();
                state.frame = None;
                state.writes.flush();
            }) as Box<dyn FnMut()>))
        };

        let scroll = {
            let state = state.clone();
            let on_frame = on_frame.clone();
            let win = window.clone();
            EventListener::new(window, "scroll", move |_| {
                let offset = current_offset(&win);
                let mut state = state.borrow_mut();
                let visibility = state.tracker.observe(offset);
                state.writes.queue(visibility);

                if state.frame.is_none() {
                    match win.request_animation_frame((*on_frame).as_ref().unchecked_ref()) {
                        Ok(id) => state.frame = Some(id),
                        Err(_) => state.writes.flush(),
                    }
                }
            })
        };

        debug!("Sticky header attached to `{}`", selector);
        Ok(Some(Self {
            window: window.clone(),
            state,
            _scroll: scroll,
            _on_frame: on_frame,
        }))
    }

    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for StickyHeader {
    fn drop(&mut self) {
        if let Some(id) = self.state.borrow_mut().frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

fn current_offset(window: &Window) -> f64 {
    window
        .scroll_y()
        .ok()
        .or_else(|| {
            window
                .document()
                .and_then(|document| document.document_element())
                .map(|root| f64::from(root.scroll_top()))
        })
        .unwrap_or(0.0)
}
