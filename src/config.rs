//! Viewport tunables with environment overrides.

use crate::consts::{PERSIST_DEBOUNCE_MS, TRACKPAD_MAX_DELTA, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::zoom::ZoomBounds;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("zoom bounds must satisfy 0 < min <= max: min={min} max={max}")]
    ZoomBounds { min: f64, max: f64 },
    #[error("zoom step must be greater than 1: {0}")]
    ZoomStep(f64),
    #[error("persist debounce must be a non-negative number of milliseconds: {0}")]
    Debounce(f64),
    #[error("trackpad delta threshold must be non-negative: {0}")]
    TrackpadDelta(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    pub persist_debounce_ms: f64,
    pub trackpad_max_delta: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
            persist_debounce_ms: PERSIST_DEBOUNCE_MS,
            trackpad_max_delta: TRACKPAD_MAX_DELTA,
        }
    }
}

impl ViewportConfig {
    /// Build config from environment variables, falling back to defaults per key.
    ///
    /// Optional:
    /// - `VIEWPORT_ZOOM_MIN`: default 0.2
    /// - `VIEWPORT_ZOOM_MAX`: default 10
    /// - `VIEWPORT_ZOOM_STEP`: default 1.1
    /// - `VIEWPORT_PERSIST_DEBOUNCE_MS`: default 100
    /// - `VIEWPORT_TRACKPAD_MAX_DELTA`: default 3
    ///
    /// Unparseable values fall back to the default; out-of-range values are
    /// rejected by [`ViewportConfig::validate`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            zoom_min: env_parse("VIEWPORT_ZOOM_MIN", ZOOM_MIN),
            zoom_max: env_parse("VIEWPORT_ZOOM_MAX", ZOOM_MAX),
            zoom_step: env_parse("VIEWPORT_ZOOM_STEP", ZOOM_STEP),
            persist_debounce_ms: env_parse("VIEWPORT_PERSIST_DEBOUNCE_MS", PERSIST_DEBOUNCE_MS),
            trackpad_max_delta: env_parse("VIEWPORT_TRACKPAD_MAX_DELTA", TRACKPAD_MAX_DELTA),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive_finite(self.zoom_min) || !positive_finite(self.zoom_max) || self.zoom_min > self.zoom_max {
            return Err(ConfigError::ZoomBounds { min: self.zoom_min, max: self.zoom_max });
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ConfigError::ZoomStep(self.zoom_step));
        }
        if !self.persist_debounce_ms.is_finite() || self.persist_debounce_ms < 0.0 {
            return Err(ConfigError::Debounce(self.persist_debounce_ms));
        }
        if self.trackpad_max_delta.is_nan() || self.trackpad_max_delta < 0.0 {
            return Err(ConfigError::TrackpadDelta(self.trackpad_max_delta));
        }
        Ok(())
    }

    #[must_use]
    pub fn zoom_bounds(&self) -> ZoomBounds {
        ZoomBounds { min: self.zoom_min, max: self.zoom_max }
    }
}

fn positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
