//! Wheel-gesture classifier: cursor-anchored zoom and trackpad detection.
//!
//! Browsers report a trackpad pinch as a wheel event with ctrl held, so
//! ctrl/cmd+wheel is always treated as zoom. Any other wheel event over the
//! board is used as a hint about the input device: Firefox reports
//! `deltaMode == 0` for trackpads and `1` for mouse wheels (other browsers
//! always report 0), and trackpads produce much finer deltas than wheel
//! notches. Small pixel deltas therefore switch the control mode to trackpad,
//! unless the user has picked a mode themselves.

#[cfg(test)]
#[path = "wheel_test.rs"]
mod wheel_test;

use tracing::{info, trace};

use crate::config::ViewportConfig;
use crate::controls::{ControlMode, ControlSettings};
use crate::coords::CoordinateHelper;
use crate::signal::Signal;
use crate::surface::{ElementRef, NodeId};
use crate::zoom::{ZoomBounds, ZoomLevel, step_zoom};

/// Unit of a wheel event's deltas (`WheelEvent.deltaMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

impl DeltaMode {
    /// Map the DOM `deltaMode` constant.
    #[must_use]
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            0 => Self::Pixel,
            1 => Self::Line,
            _ => Self::Page,
        }
    }
}

/// Keyboard modifier keys held during a wheel event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Meta / Command key is held.
    pub meta: bool,
    /// Shift key is held.
    pub shift: bool,
    /// Alt / Option key is held.
    pub alt: bool,
}

/// A global wheel event as forwarded by the host.
#[derive(Debug, Clone, Copy)]
pub struct WheelInput {
    /// Node the event was dispatched to.
    pub target: NodeId,
    pub delta_x: f64,
    /// Vertical delta (positive = down / zoom out).
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
    pub modifiers: Modifiers,
}

/// What the classifier did with an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    /// Target outside the board, or no board mounted.
    Ignored,
    /// Cursor-anchored zoom. The host must cancel the browser default.
    Zoomed { from: f64, to: f64 },
    /// Plain wheel input identified as a trackpad; control mode switched.
    TrackpadDetected,
    /// Plain wheel input left to the browser.
    Passthrough,
}

impl WheelAction {
    /// Whether the host must call `preventDefault()` on the native event.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Zoomed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WheelClassifier {
    zoom_step: f64,
    zoom_bounds: ZoomBounds,
    trackpad_max_delta: f64,
}

impl Default for WheelClassifier {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}

impl WheelClassifier {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            zoom_step: config.zoom_step,
            zoom_bounds: config.zoom_bounds(),
            trackpad_max_delta: config.trackpad_max_delta,
        }
    }

    /// ctrl/cmd + vertical wheel, or a trackpad pinch.
    #[must_use]
    pub fn is_zoom_gesture(input: &WheelInput) -> bool {
        (input.modifiers.ctrl || input.modifiers.meta) && input.delta_y != 0.0
    }

    #[must_use]
    pub fn looks_like_trackpad(&self, input: &WheelInput) -> bool {
        input.delta_mode == DeltaMode::Pixel && input.delta_x.abs().max(input.delta_y.abs()) <= self.trackpad_max_delta
    }

    pub fn handle(
        &self,
        input: &WheelInput,
        board: Option<&ElementRef>,
        zoom: &ZoomLevel,
        controls: &Signal<ControlSettings>,
        coords: &dyn CoordinateHelper,
    ) -> WheelAction {
        let Some(board) = board else {
            return WheelAction::Ignored;
        };
        if !board.contains(input.target) {
            return WheelAction::Ignored;
        }

        if Self::is_zoom_gesture(input) {
            // Anchor must be read at the old zoom.
            let anchor = coords.cursor_doc_position();
            let from = zoom.get();
            // The cell clamps to its own bounds too; the tighter pair wins.
            zoom.modify(|z| self.zoom_bounds.clamp(step_zoom(z, input.delta_y, self.zoom_step)));
            let to = zoom.get();
            coords.scroll_cursor_to(anchor);
            trace!(from, to, anchor_x = anchor.x, anchor_y = anchor.y, "wheel zoom");
            return WheelAction::Zoomed { from, to };
        }

        let switched = controls.modify(|settings| {
            if settings.accepts_auto_detection() && self.looks_like_trackpad(input) {
                ControlSettings { mode: ControlMode::Trackpad, ..*settings }
            } else {
                *settings
            }
        });
        if switched {
            info!(delta_x = input.delta_x, delta_y = input.delta_y, "trackpad detected, switching control mode");
            return WheelAction::TrackpadDetected;
        }
        WheelAction::Passthrough
    }
}
