// src/dsp/mod.rs
//
// Signal-generation and shaping building blocks for the voices.

mod envelope;
mod filters;
mod noise;
mod oscillators;
mod resonator;

pub use envelope::AdEnvelope;
pub use filters::{DcBlocker, FilterTap, SvfFilter};
pub use noise::WhiteNoise;
pub use oscillators::{Oscillator, Waveform};
pub use resonator::PingResonator;
