//! Core simulation module
//!
//! Everything in here is free of I/O and rendering dependencies: the
//! grid, the snake and apples, the rules engine, the fixed-timestep
//! scheduler, and the session controller that ties them together. The
//! whole module runs headless, which is how the tests drive it.

pub mod config;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod motion;
pub mod scheduler;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use grid::Grid;
pub use scheduler::TickScheduler;
pub use session::{GameEvent, GameSession, Snapshot, COLLISION_DELAY};
pub use state::{Cell, CollisionType, FoodItem, GameState, Phase, Snake};
