// src/controls.rs
//
// Boundary types for the physical control surface. The caller owns
// debouncing and ADC conversion; readings arrive here already clamped
// to [0, 1] and edges already detected.

pub const KNOB_COUNT: usize = 8;
pub const PAD_COUNT: usize = 16;
pub const BUTTON_COUNT: usize = 2;

/// The first four knobs are voice-scoped and write into the currently
/// selected voice's parameter set.
pub const VOICE_KNOB_COUNT: usize = 4;

pub mod knobs {
    pub const PITCH: usize = 0;
    pub const DECAY: usize = 1;
    pub const FX: usize = 2;
    pub const AMP: usize = 3;
    pub const TEMPO: usize = 6;
    pub const MODE: usize = 7;
}

pub mod buttons {
    /// One-shot trigger of the currently selected voice.
    pub const TRIGGER: usize = 0;
    /// Transport start/stop toggle.
    pub const TRANSPORT: usize = 1;
}

/// One block's worth of control readings.
///
/// Buttons and pads carry rising-edge flags for this block; knobs carry
/// normalized [0, 1] readings.
#[derive(Debug, Clone, Copy)]
pub struct ControlFrame {
    pub buttons: [bool; BUTTON_COUNT],
    pub pads: [bool; PAD_COUNT],
    pub knobs: [f32; KNOB_COUNT],
}

impl ControlFrame {
    /// A frame with no edges and all knobs at their previous rest value.
    pub fn idle(knobs: [f32; KNOB_COUNT]) -> Self {
        Self {
            buttons: [false; BUTTON_COUNT],
            pads: [false; PAD_COUNT],
            knobs,
        }
    }

    pub fn with_button(mut self, button: usize) -> Self {
        self.buttons[button] = true;
        self
    }

    pub fn with_pad(mut self, pad: usize) -> Self {
        self.pads[pad] = true;
        self
    }

    pub fn with_knob(mut self, knob: usize, value: f32) -> Self {
        self.knobs[knob] = value;
        self
    }
}

impl Default for ControlFrame {
    fn default() -> Self {
        Self::idle([0.0; KNOB_COUNT])
    }
}
