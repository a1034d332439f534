//! Page behaviors for the 3peak marketing site.
//!
//! Each behavior looks for its elements, attaches itself if they are there
//! and hands back a handle that detaches it again.

use std::cell::RefCell;

use gloo_events::EventListener;
use log::{debug, warn};
use web_sys::{Document, Window};

pub mod a11y;
pub mod anchors;
pub mod cards;
pub mod config;
pub mod dom;
pub mod error;
pub mod header;
pub mod reveal;
pub mod search;

use config::SiteConfig;
use dom::ListenerGroup;
use error::SetupError;
use header::StickyHeader;
use reveal::ScrollReveal;

/// Everything currently attached to the page.
#[derive(Default)]
pub struct PageBehaviors {
    header: Option<StickyHeader>,
    listeners: Vec<ListenerGroup>,
    reveal: Option<ScrollReveal>,
}

fn settle<T>(feature: &str, result: Result<Option<T>, SetupError>) -> Option<T> {
    match result {
        Ok(Some(handle)) => {
            debug!("{} installed", feature);
            Some(handle)
        }
        Ok(None) => {
            debug!("{} not present on this page", feature);
            None
        }
        Err(err) => {
            warn!("{} skipped: {}", feature, err);
            None
        }
    }
}

impl PageBehaviors {
    /// Header, links, cards, search and accessibility. Each one is
    /// independent of the others.
    pub fn install_core(&mut self, window: &Window, document: &Document, config: &SiteConfig) {
        self.header = settle(
            "sticky header",
            StickyHeader::install(window, document, &config.header),
        );

        let groups = [
            settle(
                "anchor scrolling",
                anchors::install(window, document, &config.anchor_links),
            ),
            settle("card hover", cards::install(document, &config.cards)),
            settle(
                "search",
                search::install(document, &config.search_input_id, &config.search_button_id),
            ),
            settle(
                "accessibility",
                a11y::install(document, &config.interactive, &config.focusable),
            ),
        ];
        self.listeners.extend(groups.into_iter().flatten());
    }

    pub fn install_reveal(&mut self, document: &Document, config: &SiteConfig) {
        self.reveal = settle(
            "scroll reveal",
            ScrollReveal::install(document, &config.reveal_targets),
        );
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.iter().map(ListenerGroup::len).sum()
    }

    pub fn reveal(&self) -> Option<&ScrollReveal> {
        self.reveal.as_ref()
    }

    /// Detaches every behavior. Dropping the value does the same.
    pub fn dispose(self) {
        drop(self);
    }
}

/// What can be attached right away for a given `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupPlan {
    pub core_now: bool,
    pub reveal_now: bool,
}

impl StartupPlan {
    pub fn for_ready_state(ready_state: &str) -> Self {
        Self {
            core_now: ready_state != "loading",
            reveal_now: ready_state == "complete",
        }
    }
}

thread_local! {
    static ACTIVE: RefCell<PageBehaviors> = RefCell::new(PageBehaviors::default());
    static STARTUP: RefCell<Vec<EventListener>> = RefCell::new(Vec::new());
}

/// Attaches everything once the page is ready: the core behaviors after the
/// DOM is parsed, the scroll reveal after the page has fully loaded.
pub fn start() -> Result<(), SetupError> {
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let config = SiteConfig::load(&document);
    let plan = StartupPlan::for_ready_state(&document.ready_state());

    if plan.core_now {
        ACTIVE.with(|active| active.borrow_mut().install_core(&window, &document, &config));
    } else {
        let (window, document, config) = (window.clone(), document.clone(), config.clone());
        let listener = EventListener::once(&document.clone(), "DOMContentLoaded", move |_| {
            ACTIVE.with(|active| active.borrow_mut().install_core(&window, &document, &config));
        });
        STARTUP.with(|startup| startup.borrow_mut().push(listener));
    }

    if plan.reveal_now {
        ACTIVE.with(|active| active.borrow_mut().install_reveal(&document, &config));
    } else {
        let listener = EventListener::once(&window, "load", move |_| {
            ACTIVE.with(|active| active.borrow_mut().install_reveal(&document, &config));
        });
        STARTUP.with(|startup| startup.borrow_mut().push(listener));
    }

    Ok(())
}

/// Read access to the behaviors `start()` attached.
pub fn with_active<R>(f: impl FnOnce(&PageBehaviors) -> R) -> R {
    ACTIVE.with(|active| f(&active.borrow()))
}

/// Detaches every behavior and any startup hook that has not fired yet.
pub fn teardown() {
    STARTUP.with(|startup| startup.borrow_mut().clear());
    let behaviors = ACTIVE.with(|active| active.take());
    behaviors.dispose();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_document_waits_for_everything() {
        assert_eq!(
            StartupPlan::for_ready_state("loading"),
            StartupPlan { core_now: false, reveal_now: false }
        );
    }

    #[test]
    fn parsed_document_waits_only_for_the_reveal() {
        assert_eq!(
            StartupPlan::for_ready_state("interactive"),
            StartupPlan { core_now: true, reveal_now: false }
        );
    }

    #[test]
    fn loaded_document_attaches_everything_at_once() {
        assert_eq!(
            StartupPlan::for_ready_state("complete"),
            StartupPlan { core_now: true, reveal_now: true }
        );
    }
}
