//! Rendering-surface abstractions: elements and native event listeners.
//!
//! ARCHITECTURE
//! ============
//! The controller never touches the DOM directly. The host hands it
//! [`ElementRef`]s for the board and scroll container and an [`EventHost`]
//! that registers native listeners. When a registered listener fires, the
//! host forwards it to the matching `ViewportController::on_*` entry point.
//! Every registration is owned by a [`ListenerHandle`] that unregisters on
//! drop, so no listener outlives the controller.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::geometry::{PixelRect, ScrollPosition};

/// Stable identity of a node on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// A mounted element as seen by the controller.
pub trait Element {
    fn node_id(&self) -> NodeId;

    /// Bounding box in viewport CSS pixels (`getBoundingClientRect`).
    fn bounding_client_rect(&self) -> PixelRect;

    /// Current `scrollLeft` / `scrollTop`.
    fn scroll_offset(&self) -> ScrollPosition;

    fn set_scroll_offset(&self, offset: ScrollPosition);

    /// Whether `target` is this element or one of its descendants.
    fn contains(&self, target: NodeId) -> bool;
}

/// Shared handle to an element. Equality is node identity.
#[derive(Clone)]
pub struct ElementRef(Rc<dyn Element>);

impl ElementRef {
    pub fn new(element: Rc<dyn Element>) -> Self {
        Self(element)
    }

    pub fn id(&self) -> NodeId {
        self.0.node_id()
    }
}

impl Deref for ElementRef {
    type Target = dyn Element;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementRef").field(&self.id()).finish()
    }
}

/// Where a native listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    Window,
    Element(NodeId),
}

/// Native events the controller listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEvent {
    Scroll,
    Resize,
    Wheel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenOptions {
    /// Passive listeners cannot cancel the default action.
    pub passive: bool,
}

impl ListenOptions {
    pub const PASSIVE: Self = Self { passive: true };
    pub const NON_PASSIVE: Self = Self { passive: false };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Native listener registry provided by the host.
pub trait EventHost {
    fn listen(&self, target: ListenTarget, event: NativeEvent, options: ListenOptions) -> ListenerId;
    fn unlisten(&self, id: ListenerId);
}

/// Owns one native listener registration; unregisters on drop.
#[must_use = "dropping a ListenerHandle removes the listener immediately"]
pub struct ListenerHandle {
    host: Rc<dyn EventHost>,
    id: ListenerId,
    target: ListenTarget,
}

impl ListenerHandle {
    pub fn register(host: &Rc<dyn EventHost>, target: ListenTarget, event: NativeEvent, options: ListenOptions) -> Self {
        let id = host.listen(target, event, options);
        Self { host: Rc::clone(host), id, target }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn target(&self) -> ListenTarget {
        self.target
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.host.unlisten(self.id);
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
