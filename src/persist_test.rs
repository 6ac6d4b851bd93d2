#![allow(clippy::float_cmp)]

use super::*;
use crate::geometry::PixelRect;
use crate::storage::MemoryStore;
use crate::testing::{FailingStore, FakeElement, init_test_logging};

fn board_a() -> String {
    "6f1c7d2e-8a43-4c1b-9f0e-2d5a7b3c9e10".to_owned()
}

fn board_b() -> String {
    "b7e2c0a4-1d3f-4e59-8c6a-0f9d2b4e7a31".to_owned()
}

fn snap(x: f64, y: f64, zoom: f64) -> ViewportSnapshot {
    ViewportSnapshot { x, y, zoom }
}

// --- keys ---

#[test]
fn key_follows_board() {
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    assert_eq!(p.key(), storage_key(&board_a()));
    assert!(p.set_board(&board_b()));
    assert_eq!(p.key(), storage_key(&board_b()));
    assert!(!p.set_board(&board_b()));
}

// --- restore ---

#[test]
fn restore_is_scheduled_for_stored_snapshot() {
    let store = MemoryStore::new();
    snapshot::save(&store, &storage_key(&board_a()), &snap(10.0, 20.0, 2.0)).unwrap();
    let el = FakeElement::new(1, PixelRect::default()).element_ref();

    let mut p = PersistedViewport::new(&board_a(), 100.0);
    assert!(p.schedule_restore(&store, &el, 5.0));
    assert_eq!(p.deadline_ms(), Some(5.0));

    let restore = p.take_due_restore(5.0, Some(&el)).unwrap();
    assert_eq!(restore.snapshot, snap(10.0, 20.0, 2.0));
    assert_eq!(restore.element, el);
    assert!(!p.has_pending_restore());
}

#[test]
fn restore_waits_for_the_next_tick() {
    let store = MemoryStore::new();
    snapshot::save(&store, &storage_key(&board_a()), &snap(1.0, 1.0, 1.0)).unwrap();
    let el = FakeElement::new(1, PixelRect::default()).element_ref();

    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.schedule_restore(&store, &el, 50.0);
    assert!(p.take_due_restore(49.0, Some(&el)).is_none());
    assert!(p.has_pending_restore());
}

#[test]
fn nothing_stored_means_no_restore() {
    let store = MemoryStore::new();
    let el = FakeElement::new(1, PixelRect::default()).element_ref();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    assert!(!p.schedule_restore(&store, &el, 0.0));
    assert_eq!(p.deadline_ms(), None);
}

#[test]
fn malformed_snapshot_is_skipped() {
    init_test_logging();
    let store = MemoryStore::new();
    store.set(&storage_key(&board_a()), "{\"x\": oops").unwrap();
    let el = FakeElement::new(1, PixelRect::default()).element_ref();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    assert!(!p.schedule_restore(&store, &el, 0.0));
    assert!(!p.has_pending_restore());
}

#[test]
fn storage_failure_is_skipped() {
    init_test_logging();
    let el = FakeElement::new(1, PixelRect::default()).element_ref();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    assert!(!p.schedule_restore(&FailingStore, &el, 0.0));
}

#[test]
fn rescheduling_for_empty_board_clears_old_restore() {
    let store = MemoryStore::new();
    snapshot::save(&store, &storage_key(&board_a()), &snap(1.0, 2.0, 3.0)).unwrap();
    let el = FakeElement::new(1, PixelRect::default()).element_ref();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.schedule_restore(&store, &el, 0.0);
    p.set_board(&board_b());
    p.schedule_restore(&store, &el, 0.0);
    assert!(p.take_due_restore(0.0, Some(&el)).is_none());
}

#[test]
fn restore_for_replaced_element_is_dropped() {
    let store = MemoryStore::new();
    snapshot::save(&store, &storage_key(&board_a()), &snap(1.0, 2.0, 3.0)).unwrap();
    let old = FakeElement::new(1, PixelRect::default()).element_ref();
    let new = FakeElement::new(2, PixelRect::default()).element_ref();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.schedule_restore(&store, &old, 0.0);
    assert!(p.take_due_restore(0.0, Some(&new)).is_none());
    assert!(!p.has_pending_restore());
}

// --- persist ---

#[test]
fn change_is_written_after_quiet_period() {
    let store = MemoryStore::new();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.note_change(snap(5.0, 6.0, 1.0), 0.0);
    assert!(!p.flush_due(&store, 99.0));
    assert!(p.flush_due(&store, 100.0));
    assert_eq!(snapshot::load(&store, p.key()).unwrap(), Some(snap(5.0, 6.0, 1.0)));
}

#[test]
fn burst_of_changes_produces_one_write_of_last_state() {
    let store = MemoryStore::new();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    for i in 0..10 {
        let t = f64::from(i) * 9.0;
        p.note_change(snap(t, t, 1.0), t);
        p.flush_due(&store, t);
    }
    assert!(p.flush_due(&store, 81.0 + 100.0));
    assert_eq!(store.write_count(), 1);
    assert_eq!(snapshot::load(&store, p.key()).unwrap(), Some(snap(81.0, 81.0, 1.0)));
}

#[test]
fn pending_write_keeps_key_of_its_board() {
    let store = MemoryStore::new();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.note_change(snap(7.0, 7.0, 1.0), 0.0);
    p.set_board(&board_b());
    p.flush_due(&store, 100.0);
    assert_eq!(snapshot::load(&store, &storage_key(&board_a())).unwrap(), Some(snap(7.0, 7.0, 1.0)));
    assert_eq!(snapshot::load(&store, &storage_key(&board_b())).unwrap(), None);
}

#[test]
fn flush_now_ignores_quiet_period() {
    let store = MemoryStore::new();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.note_change(snap(1.0, 1.0, 1.0), 0.0);
    assert!(p.flush_now(&store));
    assert!(!p.flush_now(&store));
    assert_eq!(store.write_count(), 1);
}

#[test]
fn failed_write_is_reported_not_propagated() {
    init_test_logging();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.note_change(snap(1.0, 1.0, 1.0), 0.0);
    assert!(!p.flush_due(&FailingStore, 100.0));
    assert_eq!(p.deadline_ms(), None);
}

#[test]
fn deadline_is_earliest_of_restore_and_write() {
    let store = MemoryStore::new();
    snapshot::save(&store, &storage_key(&board_a()), &snap(1.0, 1.0, 1.0)).unwrap();
    let el = FakeElement::new(1, PixelRect::default()).element_ref();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.note_change(snap(2.0, 2.0, 1.0), 0.0);
    p.schedule_restore(&store, &el, 30.0);
    assert_eq!(p.deadline_ms(), Some(30.0));
}

#[test]
fn cancel_drops_everything() {
    let store = MemoryStore::new();
    let mut p = PersistedViewport::new(&board_a(), 100.0);
    p.note_change(snap(1.0, 1.0, 1.0), 0.0);
    p.cancel();
    assert!(!p.flush_due(&store, 1000.0));
    assert_eq!(store.write_count(), 0);
}
