//! Stored viewport record: scroll offset plus zoom, one per board.
//!
//! Stored as JSON `{"x": .., "y": .., "zoom": ..}` under
//! `"scrollAndZoom." + board_id`. The format is shared with older web
//! clients, so field names and the key prefix must not change.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use serde::{Deserialize, Serialize};

use crate::consts::STORAGE_KEY_PREFIX;
use crate::geometry::ScrollPosition;
use crate::storage::{KeyValueStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("malformed viewport snapshot under {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode viewport snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl ViewportSnapshot {
    #[must_use]
    pub fn new(scroll: ScrollPosition, zoom: f64) -> Self {
        Self { x: scroll.x, y: scroll.y, zoom }
    }

    #[must_use]
    pub fn scroll(&self) -> ScrollPosition {
        ScrollPosition::new(self.x, self.y)
    }
}

/// Storage key for a board's viewport.
#[must_use]
pub fn storage_key(board_id: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{board_id}")
}

/// Read and decode the snapshot under `key`. A missing key is `Ok(None)`.
pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Option<ViewportSnapshot>, SnapshotError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let snapshot = serde_json::from_str(&raw).map_err(|source| SnapshotError::Decode { key: key.to_owned(), source })?;
    Ok(Some(snapshot))
}

/// Encode and write `snapshot` under `key`.
pub fn save(store: &dyn KeyValueStore, key: &str, snapshot: &ViewportSnapshot) -> Result<(), SnapshotError> {
    let raw = serde_json::to_string(snapshot).map_err(SnapshotError::Encode)?;
    store.set(key, &raw)?;
    Ok(())
}
