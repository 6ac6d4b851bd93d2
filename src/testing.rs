//! In-memory fakes for the rendering surface and its collaborators.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::coords::CoordinateHelper;
use crate::geometry::{PixelRect, Point, ScrollPosition};
use crate::storage::{KeyValueStore, StorageError};
use crate::surface::{Element, ElementRef, EventHost, ListenOptions, ListenTarget, ListenerId, NativeEvent, NodeId};
use crate::zoom::ZoomLevel;

pub const EPSILON: f64 = 1e-9;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Route `tracing` output through the test harness so it shows on failure.
pub fn init_test_logging() {
    if let Err(e) = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
    {
        tracing::trace!(error = %e, "test subscriber already installed");
    }
}

/// Element with settable geometry. When `scrolled_by` is set, the element
/// sits inside that scroll container and moves opposite to its scroll offset.
pub struct FakeElement {
    id: NodeId,
    rect: Cell<PixelRect>,
    scroll: Cell<ScrollPosition>,
    descendants: RefCell<Vec<NodeId>>,
    scrolled_by: Option<Rc<FakeElement>>,
}

impl FakeElement {
    pub fn new(id: u64, rect: PixelRect) -> Rc<Self> {
        Rc::new(Self {
            id: NodeId(id),
            rect: Cell::new(rect),
            scroll: Cell::new(ScrollPosition::default()),
            descendants: RefCell::new(Vec::new()),
            scrolled_by: None,
        })
    }

    pub fn inside(id: u64, rect: PixelRect, container: &Rc<FakeElement>) -> Rc<Self> {
        Rc::new(Self {
            id: NodeId(id),
            rect: Cell::new(rect),
            scroll: Cell::new(ScrollPosition::default()),
            descendants: RefCell::new(Vec::new()),
            scrolled_by: Some(Rc::clone(container)),
        })
    }

    pub fn element_ref(self: &Rc<Self>) -> ElementRef {
        ElementRef::new(Rc::clone(self) as Rc<dyn Element>)
    }

    pub fn set_rect(&self, rect: PixelRect) {
        self.rect.set(rect);
    }

    pub fn add_descendant(&self, id: u64) {
        self.descendants.borrow_mut().push(NodeId(id));
    }
}

impl Element for FakeElement {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn bounding_client_rect(&self) -> PixelRect {
        let rect = self.rect.get();
        match &self.scrolled_by {
            Some(container) => {
                let s = container.scroll_offset();
                PixelRect::new(rect.x - s.x, rect.y - s.y, rect.width, rect.height)
            }
            None => rect,
        }
    }

    fn scroll_offset(&self) -> ScrollPosition {
        self.scroll.get()
    }

    fn set_scroll_offset(&self, offset: ScrollPosition) {
        self.scroll.set(offset);
    }

    fn contains(&self, target: NodeId) -> bool {
        target == self.id || self.descendants.borrow().contains(&target)
    }
}

/// Listener registry that records what is currently attached.
#[derive(Default)]
pub struct FakeHost {
    next_id: Cell<u64>,
    active: RefCell<HashMap<ListenerId, (ListenTarget, NativeEvent, ListenOptions)>>,
}

impl FakeHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn active_count(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn options_for(&self, target: ListenTarget, event: NativeEvent) -> Option<ListenOptions> {
        self.active
            .borrow()
            .values()
            .find(|(t, e, _)| *t == target && *e == event)
            .map(|(_, _, o)| *o)
    }

    pub fn is_listening(&self, target: ListenTarget, event: NativeEvent) -> bool {
        self.options_for(target, event).is_some()
    }
}

impl EventHost for FakeHost {
    fn listen(&self, target: ListenTarget, event: NativeEvent, options: ListenOptions) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.active.borrow_mut().insert(id, (target, event, options));
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.active.borrow_mut().remove(&id);
    }
}

/// Zoom-aware conversion with a fixed number of pixels per document unit at zoom 1.
pub struct FakeCoords {
    zoom: ZoomLevel,
    scroll: Rc<FakeElement>,
    cursor_px: Cell<Point>,
    unit_px: f64,
}

impl FakeCoords {
    pub fn new(zoom: &ZoomLevel, scroll: &Rc<FakeElement>, unit_px: f64) -> Rc<Self> {
        Rc::new(Self {
            zoom: zoom.clone(),
            scroll: Rc::clone(scroll),
            cursor_px: Cell::new(Point::default()),
            unit_px,
        })
    }

    /// Pointer position relative to the scroll container's top-left, in pixels.
    pub fn set_cursor_px(&self, p: Point) {
        self.cursor_px.set(p);
    }

    fn scale(&self) -> f64 {
        self.unit_px * self.zoom.get()
    }
}

impl CoordinateHelper for FakeCoords {
    fn px_to_doc(&self, px: f64) -> f64 {
        px / self.scale()
    }

    fn cursor_doc_position(&self) -> Point {
        let s = self.scroll.scroll_offset();
        let c = self.cursor_px.get();
        Point::new(self.px_to_doc(s.x + c.x), self.px_to_doc(s.y + c.y))
    }

    fn scroll_cursor_to(&self, doc: Point) {
        let c = self.cursor_px.get();
        let scale = self.scale();
        self.scroll.set_scroll_offset(ScrollPosition::new(doc.x * scale - c.x, doc.y * scale - c.y));
    }
}

/// Store whose backend always fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend("disk on fire".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk on fire".into()))
    }
}
