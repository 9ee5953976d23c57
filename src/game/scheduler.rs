use std::time::Duration;

use super::config::MIN_TICK_RATE;

/// Logical frame units per second; tick thresholds are expressed
/// against this reference so simulation speed never depends on how
/// often the host delivers render callbacks.
pub const REFERENCE_RATE: f64 = 60.0;

/// Elapsed time beyond this is discarded so a stalled host does not
/// trigger an avalanche of catch-up ticks.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Accumulator-based fixed-timestep scheduler
///
/// The scheduler holds no clock of its own; each render callback
/// reports the wall time elapsed since the previous one. Whole ticks
/// are drained from the accumulator, and the leftover fraction drives
/// sub-cell interpolation.
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    accumulator: f64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear any accumulated time (used on start and restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Report elapsed wall time and drain the ticks now due
    ///
    /// Returns the number of ticks the caller should run. A delayed
    /// callback yields several ticks at once, up to the catch-up bound.
    pub fn advance(&mut self, elapsed: Duration, tick_rate: u32) -> u32 {
        let elapsed = elapsed.min(MAX_FRAME_DELTA);
        self.accumulator += elapsed.as_secs_f64() * REFERENCE_RATE;

        let threshold = Self::threshold(tick_rate);
        let mut ticks = 0;
        while self.accumulator >= threshold {
            self.accumulator -= threshold;
            ticks += 1;
        }
        ticks
    }

    /// Progress toward the next tick, in [0, 1)
    pub fn fraction(&self, tick_rate: u32) -> f32 {
        (self.accumulator / Self::threshold(tick_rate)).min(0.999_999) as f32
    }

    /// Frame units between consecutive ticks at the given rate
    fn threshold(tick_rate: u32) -> f64 {
        REFERENCE_RATE / f64::from(tick_rate.max(MIN_TICK_RATE))
    }
}
