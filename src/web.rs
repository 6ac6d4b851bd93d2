//! Browser glue: `localStorage`-backed store, wall clock, and the
//! `setTimeout` scheduler that services controller deadlines.
//!
//! Only compiled with the `web` feature, since it depends on `web_sys`,
//! `js_sys` and `gloo_timers` which only exist in the browser.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;

use crate::clock::Clock;
use crate::controller::ViewportController;
use crate::signal::Subscription;
use crate::storage::{KeyValueStore, StorageError};

/// [`KeyValueStore`] over `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = local_storage()?;
        storage.get_item(key).map_err(|e| StorageError::Backend(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = local_storage()?;
        storage.set_item(key, value).map_err(|e| StorageError::Backend(format!("{e:?}")))
    }
}

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window = web_sys::window().ok_or(StorageError::Unavailable)?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable),
        Err(e) => Err(StorageError::Backend(format!("{e:?}"))),
    }
}

/// Current wall-clock time in milliseconds via the JS `Date.now()` API.
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// [`Clock`] over `Date.now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        now_ms()
    }
}

type TimerSlot = RefCell<Option<Timeout>>;

/// Calls [`ViewportController::tick`] from `setTimeout` whenever a restore or
/// snapshot write comes due.
///
/// The timer is re-armed every time the controller publishes a new deadline,
/// so writes triggered from outside the controller (toolbar zoom buttons,
/// keyboard shortcuts) are persisted without the host polling. Dropping the
/// scheduler cancels the pending timer.
pub struct TickScheduler {
    timer: Rc<TimerSlot>,
    _deadline_watch: Subscription,
}

impl TickScheduler {
    pub fn start(controller: &Rc<ViewportController>) -> Self {
        let timer: Rc<TimerSlot> = Rc::default();
        let deadline = controller.deadline();
        let weak_controller = Rc::downgrade(controller);
        let weak_timer = Rc::downgrade(&timer);
        arm(&weak_controller, &weak_timer, deadline.get());
        let deadline_watch = deadline.subscribe(move |due| arm(&weak_controller, &weak_timer, *due));
        Self { timer, _deadline_watch: deadline_watch }
    }

    /// Whether a timer is currently pending.
    pub fn is_armed(&self) -> bool {
        self.timer.borrow().is_some()
    }
}

impl std::fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickScheduler").field("armed", &self.is_armed()).finish_non_exhaustive()
    }
}

/// Replace the pending timer with one for `due`, or cancel it for `None`.
fn arm(controller: &Weak<ViewportController>, slot: &Weak<TimerSlot>, due: Option<f64>) {
    let Some(timer) = slot.upgrade() else {
        return;
    };
    let next = due.map(|due| {
        let controller = controller.clone();
        let slot = slot.clone();
        Timeout::new(delay_until(due), move || {
            let Some(ctl) = controller.upgrade() else {
                return;
            };
            ctl.tick();
            // Re-arm even if the deadline did not move (timer fired a hair early).
            arm(&controller, &slot, ctl.next_deadline_ms());
        })
    });
    // Dropping the previous Timeout clears it.
    *timer.borrow_mut() = next;
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn delay_until(due_ms: f64) -> u32 {
    let delay = (due_ms - now_ms()).ceil();
    if delay.is_nan() || delay <= 0.0 {
        0
    } else if delay >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        delay as u32
    }
}
