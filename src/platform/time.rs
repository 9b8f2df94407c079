//! Frame pacing
//!
//! The simulation only knows fixed ticks. The driver measures wall-clock
//! time between display refreshes and asks the pacer how many ticks are due.

use crate::consts::SIM_DT;

/// Maximum ticks per refresh (avoids a spiral of death after a stall)
pub const MAX_SUBSTEPS: u32 = 4;
/// Longest frame delta taken into account, in seconds
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed-timestep accumulator
#[derive(Debug, Default, Clone)]
pub struct FramePacer {
    accumulator: f32,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt` seconds of wall time and return the number of ticks to run
    pub fn push(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        // Drop whatever could not be caught up
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        ticks
    }

    /// Forget pending time (after a pause or reset)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Rolling frames-per-second estimate over the last 60 refreshes
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a refresh at `time_ms`
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one about to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (59_000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
