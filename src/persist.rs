//! Per-board viewport restore and debounced persistence.
//!
//! DESIGN
//! ======
//! Restores are read eagerly but applied on the next tick: when the scroll
//! container first mounts its content size is not final yet, so offsets set
//! right away would be clamped by the browser. This costs one frame of
//! flicker.
//!
//! Writes go through a trailing-edge [`Debounce`]. The storage key travels
//! with the pending value, so switching boards inside the quiet period still
//! writes the old board's viewport under the old board's key.
//!
//! ERROR HANDLING
//! ==============
//! Storage and decode failures are logged and swallowed. A broken snapshot
//! only costs the user their last scroll position.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use tracing::{debug, warn};

use crate::debounce::Debounce;
use crate::snapshot::{self, ViewportSnapshot, storage_key};
use crate::storage::KeyValueStore;
use crate::surface::ElementRef;

/// A stored snapshot waiting to be applied to the scroll container.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRestore {
    pub element: ElementRef,
    pub snapshot: ViewportSnapshot,
    pub due_ms: f64,
}

#[derive(Debug)]
pub struct PersistedViewport {
    key: String,
    writes: Debounce<(String, ViewportSnapshot)>,
    restore: Option<PendingRestore>,
}

impl PersistedViewport {
    pub fn new(board_id: &str, debounce_ms: f64) -> Self {
        Self { key: storage_key(board_id), writes: Debounce::new(debounce_ms), restore: None }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Switch to another board's key. Returns whether the key changed.
    pub fn set_board(&mut self, board_id: &str) -> bool {
        let key = storage_key(board_id);
        if key == self.key {
            return false;
        }
        self.key = key;
        true
    }

    /// Look up the current key and, if a snapshot exists, schedule it for
    /// `element` on the next tick. Returns whether a restore is now pending.
    ///
    /// Replaces any restore scheduled earlier.
    pub fn schedule_restore(&mut self, store: &dyn KeyValueStore, element: &ElementRef, now_ms: f64) -> bool {
        self.restore = None;
        match snapshot::load(store, &self.key) {
            Ok(Some(snapshot)) => {
                debug!(key = %self.key, x = snapshot.x, y = snapshot.y, zoom = snapshot.zoom, "viewport restore scheduled");
                self.restore = Some(PendingRestore { element: element.clone(), snapshot, due_ms: now_ms });
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, key = %self.key, "skipping viewport restore");
                false
            }
        }
    }

    pub fn has_pending_restore(&self) -> bool {
        self.restore.is_some()
    }

    /// Take the pending restore if it is due and still targets `current`.
    ///
    /// A restore aimed at an element that has since been replaced is dropped.
    pub fn take_due_restore(&mut self, now_ms: f64, current: Option<&ElementRef>) -> Option<PendingRestore> {
        if !self.restore.as_ref().is_some_and(|r| now_ms >= r.due_ms) {
            return None;
        }
        let restore = self.restore.take()?;
        if current != Some(&restore.element) {
            debug!(key = %self.key, "dropping restore for detached scroll element");
            return None;
        }
        Some(restore)
    }

    /// Record a viewport change; it is written once the quiet period passes.
    pub fn note_change(&mut self, snapshot: ViewportSnapshot, now_ms: f64) {
        self.writes.push((self.key.clone(), snapshot), now_ms);
    }

    /// Write the pending snapshot if its quiet period has elapsed.
    /// Returns whether a write succeeded.
    pub fn flush_due(&mut self, store: &dyn KeyValueStore, now_ms: f64) -> bool {
        match self.writes.take_due(now_ms) {
            Some((key, snapshot)) => write(store, &key, &snapshot),
            None => false,
        }
    }

    /// Write the pending snapshot immediately, if any.
    pub fn flush_now(&mut self, store: &dyn KeyValueStore) -> bool {
        match self.writes.flush() {
            Some((key, snapshot)) => write(store, &key, &snapshot),
            None => false,
        }
    }

    /// Earliest time something here needs servicing.
    pub fn deadline_ms(&self) -> Option<f64> {
        let restore = self.restore.as_ref().map(|r| r.due_ms);
        match (restore, self.writes.deadline_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Drop pending restores and writes.
    pub fn cancel(&mut self) {
        self.restore = None;
        self.writes.cancel();
    }
}

fn write(store: &dyn KeyValueStore, key: &str, snapshot: &ViewportSnapshot) -> bool {
    match snapshot::save(store, key, snapshot) {
        Ok(()) => {
            debug!(key, x = snapshot.x, y = snapshot.y, zoom = snapshot.zoom, "viewport snapshot stored");
            true
        }
        Err(e) => {
            warn!(error = %e, key, "viewport snapshot write failed");
            false
        }
    }
}
