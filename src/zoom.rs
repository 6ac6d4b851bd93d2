//! Clamped zoom level cell.
//!
//! The zoom level is owned by the board view and shared with every component
//! that renders or changes it. Every write goes through [`ZoomBounds::clamp`],
//! so no writer can push the board outside the supported range.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use tracing::warn;

use crate::consts::{DEFAULT_ZOOM, ZOOM_MAX, ZOOM_MIN};
use crate::signal::{Signal, Subscription};

/// Inclusive zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self { min: ZOOM_MIN, max: ZOOM_MAX }
    }
}

impl ZoomBounds {
    /// Clamp `zoom` into `[min, max]`. Infinite values land on the nearest bound.
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min).min(self.max)
    }

    #[must_use]
    pub fn contains(&self, zoom: f64) -> bool {
        zoom >= self.min && zoom <= self.max
    }
}

/// Shared zoom factor (1.0 = 100%).
#[derive(Debug, Clone)]
pub struct ZoomLevel {
    signal: Signal<f64>,
    bounds: ZoomBounds,
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM, ZoomBounds::default())
    }
}

impl ZoomLevel {
    pub fn new(initial: f64, bounds: ZoomBounds) -> Self {
        let initial = if initial.is_nan() { DEFAULT_ZOOM } else { initial };
        Self { signal: Signal::new(bounds.clamp(initial)), bounds }
    }

    pub fn get(&self) -> f64 {
        self.signal.get()
    }

    pub fn bounds(&self) -> ZoomBounds {
        self.bounds
    }

    /// Set the zoom, clamped. Returns whether the stored value changed.
    pub fn set(&self, zoom: f64) -> bool {
        self.modify(move |_| zoom)
    }

    /// Read-modify-write against the latest zoom; the result is clamped.
    ///
    /// A NaN result leaves the zoom untouched.
    pub fn modify(&self, f: impl FnOnce(f64) -> f64) -> bool {
        let bounds = self.bounds;
        self.signal.modify(move |current| {
            let next = f(*current);
            if next.is_nan() {
                warn!(current = *current, "ignoring NaN zoom write");
                return *current;
            }
            bounds.clamp(next)
        })
    }

    /// Run `f` after every zoom change.
    pub fn subscribe(&self, f: impl Fn(f64) + 'static) -> Subscription {
        self.signal.subscribe(move |z| f(*z))
    }

    pub fn subscriber_count(&self) -> usize {
        self.signal.subscriber_count()
    }
}

/// Apply one wheel notch to `zoom`: negative `delta_y` zooms in, positive zooms out.
#[must_use]
pub fn step_zoom(zoom: f64, delta_y: f64, step: f64) -> f64 {
    if delta_y < 0.0 { zoom * step } else { zoom / step }
}
