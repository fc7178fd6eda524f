// src/pattern.rs

use crate::voice::VOICE_COUNT;

/// Maximum step capacity of the grid; a build uses 16 or 32 of them.
pub const MAX_STEPS: usize = 32;

/// Per-voice on/off grid over the step axis.
///
/// Written only by the control phase (pad toggles), read only by the
/// sequencer. Step order is temporal order.
pub struct Pattern {
    cells: [[bool; MAX_STEPS]; VOICE_COUNT],
    len: usize,
}

impl Pattern {
    pub fn new(len: usize) -> Self {
        Self {
            cells: [[false; MAX_STEPS]; VOICE_COUNT],
            len: len.clamp(1, MAX_STEPS),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells[..]
            .iter()
            .all(|row| row[..self.len].iter().all(|cell| !cell))
    }

    #[inline]
    pub fn is_active(&self, voice: usize, step: usize) -> bool {
        self.cells[voice][step]
    }

    pub fn set(&mut self, voice: usize, step: usize, active: bool) {
        self.cells[voice][step] = active;
    }

    /// Flip one cell. Toggling twice restores the prior value.
    pub fn toggle(&mut self, voice: usize, step: usize) {
        self.cells[voice][step] = !self.cells[voice][step];
    }

    pub fn clear(&mut self) {
        self.cells = [[false; MAX_STEPS]; VOICE_COUNT];
    }
}
