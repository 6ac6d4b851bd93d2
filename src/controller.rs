//! Viewport controller: lifecycle object wiring tracker, persistence,
//! visible-rect derivation, and wheel handling together.
//!
//! ARCHITECTURE
//! ============
//! The controller subscribes to the shared cells it depends on (board id,
//! board element, scroll element, zoom) and registers window listeners for
//! resize and wheel. All mutable state lives in a `Core` behind a `RefCell`.
//!
//! Cell changes are queued in an inbox. If nothing is running, the change
//! is applied immediately; if an entry point (`on_scroll`, `on_wheel`, ...)
//! is running, the entry point drains the inbox before returning. Either way
//! every derived value has reached a fixed point before control returns to
//! the host, so no listener observes a half-updated viewport.
//!
//! LIFECYCLE
//! =========
//! `mount` registers everything; `dispose` (also run on drop) releases every
//! subscription and native listener in one step, after writing any pending
//! snapshot so the last position survives the unmount.
//!
//! TIMERS
//! ======
//! Restores and debounced writes are deadlines, not timers. The earliest one
//! is published through [`ViewportController::deadline`] after every settle,
//! including settles caused by writes from outside the controller. Hosts arm
//! a timer from it and call [`ViewportController::tick`] when it fires; the
//! `web` feature ships one built on `setTimeout`.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::config::ViewportConfig;
use crate::controls::ControlSettings;
use crate::coords::CoordinateHelper;
use crate::geometry::{Rect, ScrollPosition};
use crate::persist::PersistedViewport;
use crate::scroll::ScrollTracker;
use crate::signal::{Signal, Subscription};
use crate::snapshot::ViewportSnapshot;
use crate::storage::KeyValueStore;
use crate::surface::{ElementRef, EventHost, ListenOptions, ListenTarget, ListenerHandle, NativeEvent, NodeId};
use crate::visible::VisibleRect;
use crate::wheel::{WheelAction, WheelClassifier, WheelInput};
use crate::zoom::ZoomLevel;

/// Everything the controller consumes from the surrounding board view.
#[derive(Clone)]
pub struct ViewportDeps {
    /// Active board; selects the storage key.
    pub board_id: Signal<String>,
    /// The board surface, once mounted.
    pub board_element: Signal<Option<ElementRef>>,
    /// The scroll container around the board, once mounted.
    pub scroll_element: Signal<Option<ElementRef>>,
    pub zoom: ZoomLevel,
    pub controls: Signal<ControlSettings>,
    pub coords: Rc<dyn CoordinateHelper>,
    pub store: Rc<dyn KeyValueStore>,
    pub host: Rc<dyn EventHost>,
    pub clock: Rc<dyn Clock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    ScrollElement,
    BoardElement,
    Board,
    Zoom,
}

type Inbox = Rc<RefCell<VecDeque<Change>>>;

struct Core {
    deps: ViewportDeps,
    scroll: ScrollTracker,
    persisted: PersistedViewport,
    visible: VisibleRect,
    wheel: WheelClassifier,
    window_listeners: Vec<ListenerHandle>,
    deadline: Signal<Option<f64>>,
    disposed: bool,
}

impl Core {
    fn now(&self) -> f64 {
        self.deps.clock.now_ms()
    }

    fn settle(&mut self, inbox: &Inbox) {
        loop {
            let next = inbox.borrow_mut().pop_front();
            let Some(change) = next else {
                break;
            };
            self.apply(change);
        }
        self.deadline.set(self.persisted.deadline_ms());
    }

    fn apply(&mut self, change: Change) {
        if self.disposed {
            return;
        }
        match change {
            Change::ScrollElement => {
                self.follow_scroll_element();
                self.refresh_visible_rect();
            }
            Change::BoardElement => self.refresh_visible_rect(),
            Change::Board => self.switch_board(),
            Change::Zoom => {
                self.refresh_visible_rect();
                self.note_viewport_change();
            }
        }
    }

    fn follow_scroll_element(&mut self) {
        let element = self.deps.scroll_element.get();
        if self.scroll.attach(&self.deps.host, element) {
            self.schedule_restore();
        }
    }

    fn switch_board(&mut self) {
        let board_id = self.deps.board_id.get();
        if self.persisted.set_board(&board_id) {
            debug!(key = self.persisted.key(), "active board changed");
            self.schedule_restore();
        }
    }

    fn schedule_restore(&mut self) {
        let now = self.now();
        if let Some(element) = self.scroll.element() {
            self.persisted.schedule_restore(self.deps.store.as_ref(), element, now);
        }
    }

    fn refresh_visible_rect(&self) {
        let board = self.deps.board_element.get();
        let viewport = self.deps.scroll_element.get();
        self.visible.recompute(board.as_ref(), viewport.as_ref(), self.deps.coords.as_ref());
    }

    fn note_viewport_change(&mut self) {
        let snapshot = ViewportSnapshot::new(self.scroll.position(), self.deps.zoom.get());
        let now = self.now();
        self.persisted.note_change(snapshot, now);
    }

    fn on_scroll(&mut self, source: NodeId) {
        if self.scroll.on_scroll(source).is_some() {
            self.refresh_visible_rect();
            self.note_viewport_change();
        }
    }

    fn on_wheel(&self, input: &WheelInput) -> WheelAction {
        let board = self.deps.board_element.get();
        self.wheel.handle(input, board.as_ref(), &self.deps.zoom, &self.deps.controls, self.deps.coords.as_ref())
    }

    fn tick(&mut self) {
        let now = self.now();
        if let Some(restore) = self.persisted.take_due_restore(now, self.scroll.element()) {
            let snapshot = restore.snapshot;
            restore.element.set_scroll_offset(snapshot.scroll());
            // Read back now; the browser may clamp, and its scroll event comes later.
            self.on_scroll(restore.element.id());
            self.deps.zoom.set(snapshot.zoom);
            debug!(key = self.persisted.key(), x = snapshot.x, y = snapshot.y, zoom = snapshot.zoom, "viewport restored");
        }
        self.persisted.flush_due(self.deps.store.as_ref(), now);
    }

    fn shutdown(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.persisted.flush_now(self.deps.store.as_ref());
        self.persisted.cancel();
        self.scroll.detach();
        self.window_listeners.clear();
        self.deadline.set(None);
        debug!(key = self.persisted.key(), "viewport controller disposed");
    }
}

/// Scroll-and-zoom controller for one mounted board view.
pub struct ViewportController {
    core: Rc<RefCell<Core>>,
    inbox: Inbox,
    subscriptions: RefCell<Vec<Subscription>>,
    visible: Signal<Option<Rect>>,
    scroll_position: Signal<ScrollPosition>,
    deadline: Signal<Option<f64>>,
    disposed: Cell<bool>,
}

impl ViewportController {
    /// Subscribe to `deps`, register window listeners, and attach to whatever
    /// elements are already mounted (scheduling a restore if one is stored).
    pub fn mount(deps: ViewportDeps, config: &ViewportConfig) -> Self {
        let cell_bounds = deps.zoom.bounds();
        if cell_bounds != config.zoom_bounds() {
            warn!(
                cell_min = cell_bounds.min,
                cell_max = cell_bounds.max,
                config_min = config.zoom_min,
                config_max = config.zoom_max,
                "zoom cell bounds differ from config; wheel zoom keeps to both"
            );
        }
        let window_listeners = vec![
            ListenerHandle::register(&deps.host, ListenTarget::Window, NativeEvent::Resize, ListenOptions::PASSIVE),
            // Non-passive: ctrl+wheel must be able to cancel the browser's page zoom.
            ListenerHandle::register(&deps.host, ListenTarget::Window, NativeEvent::Wheel, ListenOptions::NON_PASSIVE),
        ];
        let scroll = ScrollTracker::new();
        let visible = VisibleRect::new();
        let visible_signal = visible.signal();
        let scroll_position = scroll.position_signal();
        let deadline = Signal::new(None);
        let core = Rc::new(RefCell::new(Core {
            persisted: PersistedViewport::new(&deps.board_id.get(), config.persist_debounce_ms),
            deps: deps.clone(),
            scroll,
            visible,
            wheel: WheelClassifier::new(config),
            window_listeners,
            deadline: deadline.clone(),
            disposed: false,
        }));
        let inbox: Inbox = Rc::default();

        let zoom_changed = notifier(&core, &inbox, Change::Zoom);
        let subscriptions = vec![
            watch(&deps.scroll_element, &core, &inbox, Change::ScrollElement),
            watch(&deps.board_element, &core, &inbox, Change::BoardElement),
            watch(&deps.board_id, &core, &inbox, Change::Board),
            deps.zoom.subscribe(move |_| zoom_changed()),
        ];

        let controller = Self {
            core,
            inbox,
            subscriptions: RefCell::new(subscriptions),
            visible: visible_signal,
            scroll_position,
            deadline,
            disposed: Cell::new(false),
        };
        controller.inbox.borrow_mut().push_back(Change::ScrollElement);
        controller.run(|core| debug!(key = core.persisted.key(), "viewport controller mounted"));
        controller
    }

    /// Native scroll event from the element `source`.
    pub fn on_scroll(&self, source: NodeId) {
        self.run(|core| core.on_scroll(source));
    }

    /// Window resize.
    pub fn on_resize(&self) {
        self.run(|core| core.refresh_visible_rect());
    }

    /// Global wheel event. Call `preventDefault()` on the native event when
    /// the returned action [prevents default](WheelAction::prevents_default).
    pub fn on_wheel(&self, input: &WheelInput) -> WheelAction {
        self.run(|core| core.on_wheel(input)).unwrap_or(WheelAction::Ignored)
    }

    /// Service timers: apply a due restore, then write a due snapshot.
    pub fn tick(&self) {
        self.run(Core::tick);
    }

    /// When the host should call [`ViewportController::tick`] next.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        if self.disposed.get() {
            return None;
        }
        self.deadline.get()
    }

    /// Observable form of [`ViewportController::next_deadline_ms`].
    ///
    /// Subscribers run while the controller is busy; they should arm a timer,
    /// not call `tick` directly.
    pub fn deadline(&self) -> Signal<Option<f64>> {
        self.deadline.clone()
    }

    /// The on-screen part of the board in document units, `None` until both
    /// elements are mounted.
    pub fn visible_rect(&self) -> Signal<Option<Rect>> {
        self.visible.clone()
    }

    pub fn scroll_position(&self) -> Signal<ScrollPosition> {
        self.scroll_position.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Release every subscription and listener. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        drop(subscriptions);
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.shutdown(),
            Err(_) => warn!("viewport controller disposed during a notification; listeners released on drop"),
        }
    }

    fn run<R>(&self, f: impl FnOnce(&mut Core) -> R) -> Option<R> {
        if self.disposed.get() {
            return None;
        }
        let Ok(mut core) = self.core.try_borrow_mut() else {
            warn!("viewport controller re-entered from a notification; event dropped");
            return None;
        };
        core.settle(&self.inbox);
        let result = f(&mut *core);
        core.settle(&self.inbox);
        Some(result)
    }
}

impl Drop for ViewportController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewportController")
            .field("visible_rect", &self.visible.get())
            .field("scroll_position", &self.scroll_position.get())
            .field("disposed", &self.disposed.get())
            .finish_non_exhaustive()
    }
}

/// Queue `change`, and apply it right away unless an entry point is running.
fn notifier(core: &Rc<RefCell<Core>>, inbox: &Inbox, change: Change) -> impl Fn() + 'static {
    let core = Rc::downgrade(core);
    let inbox = Rc::clone(inbox);
    move || {
        inbox.borrow_mut().push_back(change);
        let Some(core) = core.upgrade() else {
            return;
        };
        // Busy means an entry point holds the core; it drains the inbox itself.
        if let Ok(mut guard) = core.try_borrow_mut() {
            guard.settle(&inbox);
        }
    }
}

fn watch<T: Clone + PartialEq + 'static>(
    signal: &Signal<T>,
    core: &Rc<RefCell<Core>>,
    inbox: &Inbox,
    change: Change,
) -> Subscription {
    let notify = notifier(core, inbox, change);
    signal.subscribe(move |_| notify())
}
