//! Minimal single-threaded observer cells.
//!
//! ARCHITECTURE
//! ============
//! A `Signal<T>` is a shared mutable value with change notification. Clones
//! share the same cell, so the owner of a value (e.g. the zoom level) and the
//! components reading or writing it hold the same handle. Subscribers are
//! notified synchronously after every write that changes the value; writes
//! that produce an equal value are dropped, which doubles as memoization for
//! derived values.
//!
//! No borrow is held while subscriber callbacks run, so a callback may read or
//! write any signal (including the one that notified it).

#[cfg(test)]
#[path = "signal_test.rs"]
mod signal_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// Shared observable cell. Cheap to clone; clones observe the same value.
pub struct Signal<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Signal")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self { inner: Rc::new(RefCell::new(Inner { value, next_id: 0, subscribers: Vec::new() })) }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value. Returns whether it changed.
    pub fn set(&self, value: T) -> bool {
        self.modify(move |_| value)
    }

    /// Read-modify-write against the latest value. Returns whether it changed.
    ///
    /// The read and the write happen without yielding to other listeners, so
    /// concurrent writers in the same tick never lose each other's updates.
    pub fn modify(&self, f: impl FnOnce(&T) -> T) -> bool {
        let current = self.get();
        let next = f(&current);
        if next == current {
            return false;
        }
        self.inner.borrow_mut().value = next;
        self.notify();
        true
    }

    /// Register `f` to run after every change. Dropping the returned
    /// [`Subscription`] unregisters it.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::new(f)));
            id
        };
        let weak = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
            }
        })
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<Callback<T>> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for cb in callbacks {
            // Re-read per callback: an earlier subscriber may have written again.
            let value = self.get();
            cb(&value);
        }
    }
}

/// Handle for a registered subscriber. Unsubscribes on drop or [`Subscription::cancel`].
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// Unsubscribe now.
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
    }
}
