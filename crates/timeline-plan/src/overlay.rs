//! Date stamp overlay shown at the start of a composition.

use serde::{Deserialize, Serialize};

/// When the date stamp is shown, in composition seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayTiming {
    pub visible_from: f64,
    pub visible_until: f64,
    pub fade_out: f64,
}

impl Default for OverlayTiming {
    fn default() -> Self {
        Self {
            visible_from: 0.0,
            visible_until: 2.0,
            fade_out: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub text: String,
    pub visible_from: f64,
    pub visible_until: f64,
    pub fade_out_duration: f64,
}

impl Overlay {
    pub fn new(text: String, timing: OverlayTiming) -> Self {
        Self {
            text,
            visible_from: timing.visible_from,
            visible_until: timing.visible_until,
            fade_out_duration: timing.fade_out,
        }
    }

    /// Time at which the overlay has fully faded out
    pub fn hidden_from(&self) -> f64 {
        self.visible_until + self.fade_out_duration.max(0.0)
    }

    /// Opacity at composition time `t`: fully opaque inside the visible
    /// window, then a linear fade to zero over `fade_out_duration`.
    pub fn opacity_at(&self, t: f64) -> f64 {
        if t < self.visible_from {
            0.0
        } else if t <= self.visible_until {
            1.0
        } else if t < self.hidden_from() {
            1.0 - (t - self.visible_until) / self.fade_out_duration
        } else {
            0.0
        }
    }
}
