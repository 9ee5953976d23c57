use serde::{Deserialize, Serialize};

use super::grid::{MAX_DIMENSION, MIN_DIMENSION};

/// Snake segments at the start of every run
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Slowest supported simulation rate, in ticks per second
pub const MIN_TICK_RATE: u32 = 1;
/// Fastest supported simulation rate; the speed-up curve tops out here
pub const MAX_TICK_RATE: u32 = 15;

pub const MIN_APPLES: usize = 1;
pub const MAX_APPLES: usize = 10;

/// The tick rate rises by one step each time the score crosses a
/// multiple of this value.
pub const SPEED_UP_EVERY: u32 = 5;

/// Configuration for one run of the game
///
/// Supplied at each start command and immutable for the duration of the
/// run. Out-of-range values are clamped by [`GameConfig::sanitize`]
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_dimension: usize,
    /// Simulation rate at the start of a run, in ticks per second
    pub tick_rate: u32,
    /// Number of apples kept on the board (1-10)
    pub apple_count: usize,
    /// Apples drift continuously instead of sitting still
    pub moving_apples: bool,
    /// Drifting apples steer toward the snake's head
    pub attract_apples: bool,
    /// Disable wall and self collisions; walls wrap toroidally
    pub invincible: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_dimension: 20,
            tick_rate: 7,
            apple_count: 1,
            moving_apples: false,
            attract_apples: false,
            invincible: false,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid dimension
    pub fn new(grid_dimension: usize) -> Self {
        Self {
            grid_dimension,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Clamp every field into its valid range
    pub fn sanitize(mut self) -> Self {
        self.grid_dimension = self.grid_dimension.clamp(MIN_DIMENSION, MAX_DIMENSION);
        self.tick_rate = self.tick_rate.clamp(MIN_TICK_RATE, MAX_TICK_RATE);
        self.apple_count = self.apple_count.clamp(MIN_APPLES, MAX_APPLES);
        self
    }
}
