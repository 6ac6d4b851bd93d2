//! Mouse/trackpad control settings shared with the board toolbar.

#[cfg(test)]
#[path = "controls_test.rs"]
mod controls_test;

use serde::{Deserialize, Serialize};

/// How plain wheel/drag input is interpreted on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Wheel zooms and drag selects (default).
    #[default]
    Mouse,
    /// Two-finger scroll pans and pinch zooms.
    Trackpad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSettings {
    pub mode: ControlMode,
    /// Set once the user picks a mode explicitly; auto-detection stops after that.
    pub has_user_manually_set_mode: bool,
}

impl ControlSettings {
    /// Settings for an explicit user choice.
    #[must_use]
    pub fn manual(mode: ControlMode) -> Self {
        Self { mode, has_user_manually_set_mode: true }
    }

    /// Whether the wheel heuristic is still allowed to change the mode.
    #[must_use]
    pub fn accepts_auto_detection(&self) -> bool {
        !self.has_user_manually_set_mode && self.mode != ControlMode::Trackpad
    }
}
