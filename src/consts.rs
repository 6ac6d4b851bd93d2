//! Shared numeric constants for the viewport crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest zoom factor the board can be shown at.
pub const ZOOM_MIN: f64 = 0.2;

/// Largest zoom factor the board can be shown at.
pub const ZOOM_MAX: f64 = 10.0;

/// Multiplicative step applied per ctrl/cmd+wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Zoom used before any stored snapshot is restored.
pub const DEFAULT_ZOOM: f64 = 1.0;

// ── Persistence ─────────────────────────────────────────────────

/// Quiet period before a viewport change is written to storage.
pub const PERSIST_DEBOUNCE_MS: f64 = 100.0;

/// Storage key prefix; the board id is appended verbatim.
pub const STORAGE_KEY_PREFIX: &str = "scrollAndZoom.";

// ── Wheel heuristic ─────────────────────────────────────────────

/// Largest absolute pixel delta still attributed to a trackpad.
///
/// Mouse wheels report coarse steps (typically 100px or a line count).
pub const TRACKPAD_MAX_DELTA: f64 = 3.0;
