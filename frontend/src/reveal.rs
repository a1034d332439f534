//! One-shot "animated" class for elements scrolling into view.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom;
use crate::error::SetupError;

/// Fraction of an element's area that has to be on screen. The observer
/// applies it; entries arrive already flagged as intersecting or not.
pub const VISIBILITY_THRESHOLD: f64 = 0.1;
pub const ANIMATED_CLASS: &str = "animated";

pub trait RevealTarget: PartialEq {
    fn mark_animated(&self);
}

pub trait Observer<T> {
    fn observe(&self, target: &T);
    fn unobserve(&self, target: &T);
    fn disconnect(&self);
}

/// Elements still waiting for their animation, plus the observer watching
/// them. An element leaves the set the first time it is seen and is never
/// touched again.
pub struct VisibilityAnimationTrigger<T, O: Observer<T>> {
    pending: Vec<T>,
    observer: O,
}

impl<T: RevealTarget, O: Observer<T>> VisibilityAnimationTrigger<T, O> {
    /// `None` for an empty target list; there is nothing to watch.
    pub fn new(targets: Vec<T>, observer: O) -> Option<Self> {
        if targets.is_empty() {
            return None;
        }
        for target in &targets {
            observer.observe(target);
        }
        Some(Self {
            pending: targets,
            observer,
        })
    }

    pub fn pending(&self) -> &[T] {
        &self.pending
    }

    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Applies one batch of `(target, is_intersecting)` notifications and
    /// returns how many elements were animated by it.
    pub fn handle_batch<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (T, bool)>,
    {
        if self.is_complete() {
            return 0;
        }

        let mut animated = 0;
        for (target, intersecting) in entries {
            if !intersecting {
                continue;
            }
            let Some(index) = self.pending.iter().position(|pending| *pending == target) else {
                continue;
            };
            let target = self.pending.remove(index);
            target.mark_animated();
            self.observer.unobserve(&target);
            animated += 1;
        }

        if animated > 0 && self.is_complete() {
            self.observer.disconnect();
        }
        animated
    }

    pub fn dispose(self) {
        self.observer.disconnect();
    }
}

impl RevealTarget for Element {
    fn mark_animated(&self) {
        let _ = self.class_list().add_1(ANIMATED_CLASS);
    }
}

impl Observer<Element> for IntersectionObserver {
    fn observe(&self, target: &Element) {
        IntersectionObserver::observe(self, target);
    }

    fn unobserve(&self, target: &Element) {
        IntersectionObserver::unobserve(self, target);
    }

    fn disconnect(&self) {
        IntersectionObserver::disconnect(self);
    }
}

type Trigger = VisibilityAnimationTrigger<Element, IntersectionObserver>;

/// Installed scroll reveal. Dropping it disconnects the observer.
pub struct ScrollReveal {
    observer: IntersectionObserver,
    trigger: Rc<RefCell<Option<Trigger>>>,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl ScrollReveal {
    pub fn install(document: &Document, selector: &str) -> Result<Option<Self>, SetupError> {
        let targets = dom::query_all(document, selector)?;
        if targets.is_empty() {
            return Ok(None);
        }
        let count = targets.len();

        let trigger: Rc<RefCell<Option<Trigger>>> = Rc::new(RefCell::new(None));
        let callback = {
            let trigger = trigger.clone();
            Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
                let mut trigger = trigger.borrow_mut();
                let Some(trigger) = trigger.as_mut() else {
                    return;
                };
                let batch = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| (entry.target(), entry.is_intersecting()));
                let animated = trigger.handle_batch(batch);
                if animated > 0 {
                    debug!("Revealed {} element(s), {} left", animated, trigger.pending().len());
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };

        let options = IntersectionObserverInit::new();
        options.set_root_margin("0px");
        options.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(SetupError::js("IntersectionObserver"))?;

        *trigger.borrow_mut() = VisibilityAnimationTrigger::new(targets, observer.clone());

        debug!("Watching {} element(s) matching `{}`", count, selector);
        Ok(Some(Self {
            observer,
            trigger,
            _callback: callback,
        }))
    }

    pub fn pending(&self) -> usize {
        self.trigger
            .borrow()
            .as_ref()
            .map_or(0, |trigger| trigger.pending().len())
    }

    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for ScrollReveal {
    fn drop(&mut self) {
        self.trigger.borrow_mut().take();
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Clone)]
    struct Card {
        name: &'static str,
        marks: Rc<Cell<u32>>,
    }

    impl Card {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                marks: Rc::new(Cell::new(0)),
            }
        }
    }

    impl PartialEq for Card {
        fn eq(&self, other: &Self) -> bool {
            self.name == other.name
        }
    }

    impl RevealTarget for Card {
        fn mark_animated(&self) {
            self.marks.set(self.marks.get() + 1);
        }
    }

    #[derive(Default)]
    struct Recorder {
        observed: RefCell<Vec<&'static str>>,
        unobserved: RefCell<Vec<&'static str>>,
        disconnects: Cell<u32>,
    }

    impl Observer<Card> for Rc<Recorder> {
        fn observe(&self, target: &Card) {
            self.observed.borrow_mut().push(target.name);
        }

        fn unobserve(&self, target: &Card) {
            self.unobserved.borrow_mut().push(target.name);
        }

        fn disconnect(&self) {
            self.disconnects.set(self.disconnects.get() + 1);
        }
    }

    const SEEN: bool = true;
    const OFFSCREEN: bool = false;

    fn names(trigger: &VisibilityAnimationTrigger<Card, Rc<Recorder>>) -> Vec<&'static str> {
        trigger.pending().iter().map(|card| card.name).collect()
    }

    #[test]
    fn empty_target_list_is_inert() {
        let recorder = Rc::new(Recorder::default());
        assert!(VisibilityAnimationTrigger::<Card, _>::new(vec![], recorder.clone()).is_none());
        assert!(recorder.observed.borrow().is_empty());
    }

    #[test]
    fn every_target_is_observed_up_front() {
        let recorder = Rc::new(Recorder::default());
        let cards = vec![Card::new("a"), Card::new("b")];
        let trigger = VisibilityAnimationTrigger::new(cards, recorder.clone()).unwrap();
        assert_eq!(*recorder.observed.borrow(), vec!["a", "b"]);
        assert_eq!(names(&trigger), vec!["a", "b"]);
    }

    #[test]
    fn cards_animate_across_two_batches() {
        let (a, b, c) = (Card::new("a"), Card::new("b"), Card::new("c"));
        let recorder = Rc::new(Recorder::default());
        let mut trigger =
            VisibilityAnimationTrigger::new(vec![a.clone(), b.clone(), c.clone()], recorder.clone())
                .unwrap();

        let animated = trigger.handle_batch(vec![
            (a.clone(), OFFSCREEN),
            (b.clone(), SEEN),
            (c.clone(), OFFSCREEN),
        ]);
        assert_eq!(animated, 1);
        assert_eq!((a.marks.get(), b.marks.get(), c.marks.get()), (0, 1, 0));
        assert_eq!(names(&trigger), vec!["a", "c"]);
        assert_eq!(*recorder.unobserved.borrow(), vec!["b"]);
        assert_eq!(recorder.disconnects.get(), 0);

        let animated = trigger.handle_batch(vec![(a.clone(), SEEN), (c.clone(), SEEN)]);
        assert_eq!(animated, 2);
        assert_eq!((a.marks.get(), b.marks.get(), c.marks.get()), (1, 1, 1));
        assert!(trigger.is_complete());
        assert_eq!(*recorder.unobserved.borrow(), vec!["b", "a", "c"]);
        assert_eq!(recorder.disconnects.get(), 1);
    }

    #[test]
    fn animated_card_is_never_touched_again() {
        let (a, b) = (Card::new("a"), Card::new("b"));
        let recorder = Rc::new(Recorder::default());
        let mut trigger =
            VisibilityAnimationTrigger::new(vec![a.clone(), b.clone()], recorder.clone()).unwrap();

        assert_eq!(trigger.handle_batch(vec![(a.clone(), SEEN)]), 1);
        assert_eq!(trigger.handle_batch(vec![(a.clone(), SEEN)]), 0);
        // Same element twice inside one batch.
        assert_eq!(trigger.handle_batch(vec![(b.clone(), SEEN), (b.clone(), SEEN)]), 1);

        assert_eq!(a.marks.get(), 1);
        assert_eq!(b.marks.get(), 1);
        assert_eq!(*recorder.unobserved.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn leaving_the_viewport_does_not_undo_the_animation() {
        let a = Card::new("a");
        let recorder = Rc::new(Recorder::default());
        let mut trigger =
            VisibilityAnimationTrigger::new(vec![a.clone(), Card::new("b")], recorder).unwrap();

        trigger.handle_batch(vec![(a.clone(), SEEN)]);
        trigger.handle_batch(vec![(a.clone(), OFFSCREEN)]);
        assert_eq!(a.marks.get(), 1);
        assert_eq!(names(&trigger), vec!["b"]);
    }

    #[test]
    fn intersecting_entry_animates_whatever_its_ratio() {
        // The observer may report the crossing at a ratio just under the
        // threshold; the intersecting flag is what counts.
        let a = Card::new("a");
        let recorder = Rc::new(Recorder::default());
        let mut trigger = VisibilityAnimationTrigger::new(vec![a.clone()], recorder).unwrap();

        assert_eq!(trigger.handle_batch(vec![(a.clone(), true)]), 1);
        assert_eq!(a.marks.get(), 1);
        assert!(trigger.is_complete());
    }

    #[test]
    fn non_intersecting_entry_is_ignored() {
        let a = Card::new("a");
        let recorder = Rc::new(Recorder::default());
        let mut trigger = VisibilityAnimationTrigger::new(vec![a.clone()], recorder.clone()).unwrap();

        assert_eq!(trigger.handle_batch(vec![(a.clone(), false)]), 0);
        assert_eq!(a.marks.get(), 0);
        assert_eq!(names(&trigger), vec!["a"]);
        assert!(recorder.unobserved.borrow().is_empty());
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let recorder = Rc::new(Recorder::default());
        let mut trigger =
            VisibilityAnimationTrigger::new(vec![Card::new("a")], recorder.clone()).unwrap();
        let stray = Card::new("z");
        assert_eq!(trigger.handle_batch(vec![(stray.clone(), SEEN)]), 0);
        assert_eq!(stray.marks.get(), 0);
        assert!(recorder.unobserved.borrow().is_empty());
    }

    #[test]
    fn dispose_disconnects() {
        let recorder = Rc::new(Recorder::default());
        let trigger =
            VisibilityAnimationTrigger::new(vec![Card::new("a")], recorder.clone()).unwrap();
        trigger.dispose();
        assert_eq!(recorder.disconnects.get(), 1);
    }
}
