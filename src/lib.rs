// src/lib.rs
//
// Fixed-function drum/percussion synthesizer driven by a step
// sequencer, rendered inside a periodic audio callback.

mod clock;
mod controls;
mod engine;
mod mapper;
mod output;
mod pattern;
mod voice;

pub mod dsp;

// Re-export key types for consumers
pub use clock::Clock;
pub use controls::{buttons, knobs, ControlFrame, BUTTON_COUNT, KNOB_COUNT, PAD_COUNT};
pub use engine::{Engine, PAD_LEVEL_ACTIVE, PAD_LEVEL_PLAYING, STEP_COUNT};
pub use mapper::{ParamMapper, DEBOUNCE_THRESHOLD};
pub use output::OutputStage;
pub use pattern::{Pattern, MAX_STEPS};
pub use voice::{Calibration, CurveKind, Voice, VoiceCalibration, VoiceKind, VOICE_COUNT};
