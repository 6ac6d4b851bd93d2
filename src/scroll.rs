//! Scroll position tracker for the board's scroll container.
//!
//! Follows the container through identity changes: each new element gets its
//! own native scroll listener and the previous one is released first. The
//! position is published as a [`Signal`] and only changes in response to
//! native scroll events.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use std::rc::Rc;

use crate::geometry::ScrollPosition;
use crate::signal::Signal;
use crate::surface::{ElementRef, EventHost, ListenOptions, ListenTarget, ListenerHandle, NativeEvent, NodeId};

#[derive(Debug, Default)]
pub struct ScrollTracker {
    element: Option<ElementRef>,
    listener: Option<ListenerHandle>,
    position: Signal<ScrollPosition>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow `element`. Returns whether the tracked element changed.
    ///
    /// The last known position is kept across element changes until the new
    /// element reports a scroll.
    pub fn attach(&mut self, host: &Rc<dyn EventHost>, element: Option<ElementRef>) -> bool {
        if self.element == element {
            return false;
        }
        // Release before registering so the old element never sees two listeners.
        self.listener = None;
        self.listener = element.as_ref().map(|el| {
            ListenerHandle::register(host, ListenTarget::Element(el.id()), NativeEvent::Scroll, ListenOptions::PASSIVE)
        });
        self.element = element;
        true
    }

    /// Handle a native scroll event from `source`.
    ///
    /// Returns the new position, or `None` when the event came from an
    /// element that is no longer tracked or the offsets did not move.
    pub fn on_scroll(&mut self, source: NodeId) -> Option<ScrollPosition> {
        let element = self.element.as_ref()?;
        if element.id() != source {
            return None;
        }
        let next = element.scroll_offset();
        self.position.set(next).then_some(next)
    }

    pub fn position(&self) -> ScrollPosition {
        self.position.get()
    }

    /// Shared handle for consumers.
    pub fn position_signal(&self) -> Signal<ScrollPosition> {
        self.position.clone()
    }

    pub fn element(&self) -> Option<&ElementRef> {
        self.element.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Release the listener and forget the element.
    pub fn detach(&mut self) {
        self.listener = None;
        self.element = None;
    }
}
