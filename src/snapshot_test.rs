#![allow(clippy::float_cmp)]

use super::*;
use crate::storage::MemoryStore;

const BOARD: &str = "6f1c7d2e-8a43-4c1b-9f0e-2d5a7b3c9e10";

#[test]
fn storage_key_prefixes_board_id() {
    assert_eq!(storage_key(BOARD), "scrollAndZoom.6f1c7d2e-8a43-4c1b-9f0e-2d5a7b3c9e10");
}

#[test]
fn different_boards_get_different_keys() {
    assert_ne!(storage_key(BOARD), storage_key("b7e2c0a4-1d3f-4e59-8c6a-0f9d2b4e7a31"));
}

#[test]
fn snapshot_json_shape() {
    let snap = ViewportSnapshot { x: 120.5, y: 40.0, zoom: 1.1 };
    let json = serde_json::to_value(snap).unwrap();
    assert_eq!(json, serde_json::json!({ "x": 120.5, "y": 40.0, "zoom": 1.1 }));
}

#[test]
fn snapshot_round_trips_exactly() {
    let store = MemoryStore::new();
    let snap = ViewportSnapshot { x: 1234.567_891, y: 0.1 + 0.2, zoom: 1.1 * 1.1 * 1.1 };
    save(&store, "k", &snap).unwrap();
    assert_eq!(load(&store, "k").unwrap(), Some(snap));
}

#[test]
fn load_missing_key_is_none() {
    let store = MemoryStore::new();
    assert!(load(&store, "absent").unwrap().is_none());
}

#[test]
fn load_malformed_json_is_decode_error() {
    let store = MemoryStore::new();
    store.set("k", "{not json").unwrap();
    let err = load(&store, "k").unwrap_err();
    assert!(matches!(err, SnapshotError::Decode { ref key, .. } if key == "k"));
    assert!(err.to_string().contains("malformed viewport snapshot"));
}

#[test]
fn load_wrong_shape_is_decode_error() {
    let store = MemoryStore::new();
    store.set("k", r#"{"x": 1, "y": 2}"#).unwrap();
    assert!(matches!(load(&store, "k"), Err(SnapshotError::Decode { .. })));
}

#[test]
fn load_accepts_integer_fields_from_older_clients() {
    let store = MemoryStore::new();
    store.set("k", r#"{"x": 10, "y": 20, "zoom": 2}"#).unwrap();
    let snap = load(&store, "k").unwrap().unwrap();
    assert_eq!(snap, ViewportSnapshot { x: 10.0, y: 20.0, zoom: 2.0 });
}

#[test]
fn scroll_accessor_splits_offsets() {
    let snap = ViewportSnapshot::new(ScrollPosition::new(3.0, 4.0), 2.0);
    assert_eq!(snap.scroll(), ScrollPosition::new(3.0, 4.0));
    assert_eq!(snap.zoom, 2.0);
}

#[test]
fn any_board_id_string_is_keyed_verbatim() {
    assert_eq!(storage_key("welcome-board"), "scrollAndZoom.welcome-board");
}
