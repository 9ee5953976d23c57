use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::{GameConfig, INITIAL_SNAKE_LENGTH, MAX_TICK_RATE, SPEED_UP_EVERY};
use super::direction::Direction;
use super::grid::Grid;
use super::motion::FOOD_SPEED;
use super::state::{Cell, CollisionType, FoodItem, GameState, Phase, Snake};

/// What happened during a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// Whether the snake advanced by a cell
    pub moved: bool,
    /// Whether the snake ate an apple this tick
    pub ate_food: bool,
    /// The fault that ended the run, if one occurred
    pub fault: Option<CollisionType>,
}

/// The rules engine: advances the simulation by exactly one tick
///
/// Collisions are reported as data in the [`TickOutcome`] and in the
/// state's phase, never as errors.
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    rng: StdRng,
}

impl GameEngine {
    /// Create an engine with the given configuration, clamping any
    /// out-of-range fields
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed for deterministic placement
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let config = config.sanitize();
        let grid = Grid::new(config.grid_dimension);
        Self { config, grid, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Build the canonical starting state: a straight snake at the grid
    /// center facing right, idle until started, with a full apple set
    pub fn reset(&mut self) -> GameState {
        let center = (self.grid.dimension() / 2) as i32;
        let snake = Snake::new(
            Cell::new(center, center),
            Direction::Right,
            INITIAL_SNAKE_LENGTH,
        );

        let mut state = GameState::new(snake, self.config.tick_rate);
        self.populate_food(&mut state);
        state
    }

    /// Execute one tick of the simulation
    pub fn step(&mut self, state: &mut GameState) -> TickOutcome {
        if !state.phase.is_running() {
            return TickOutcome::default();
        }

        // A reversal request keeps the previous velocity instead.
        let active = if state.requested.is_opposite(state.applied) {
            state.applied
        } else {
            state.requested
        };
        state.applied = active;

        if active.is_idle() {
            return TickOutcome::default();
        }

        let mut candidate = state.snake.head().step(active);

        if !self.grid.contains(candidate) {
            if self.config.invincible {
                candidate = self.grid.wrap(candidate);
            } else {
                state.phase = Phase::Dying {
                    fault: CollisionType::Wall,
                    at: candidate,
                };
                return TickOutcome {
                    moved: false,
                    ate_food: false,
                    fault: Some(CollisionType::Wall),
                };
            }
        }

        let eaten = state.food_at(candidate);
        let tail_pops = eaten.is_none();

        if !self.config.invincible && state.snake.would_hit(candidate, tail_pops) {
            state.phase = Phase::Dying {
                fault: CollisionType::SelfCollision,
                at: candidate,
            };
            return TickOutcome {
                moved: false,
                ate_food: false,
                fault: Some(CollisionType::SelfCollision),
            };
        }

        state.snake.advance(candidate, eaten.is_some());
        state.steps += 1;

        if let Some(index) = eaten {
            state.food.swap_remove(index);
            state.score += 1;

            if state.score % SPEED_UP_EVERY == 0 && state.tick_rate < MAX_TICK_RATE {
                state.tick_rate += 1;
            }

            self.populate_food(state);
        }

        TickOutcome {
            moved: true,
            ate_food: eaten.is_some(),
            fault: None,
        }
    }

    /// Top the apple set back up to the configured count
    ///
    /// Stops early if the board has no free cell left; a short apple set
    /// is preferable to spinning on a full grid.
    pub fn populate_food(&mut self, state: &mut GameState) {
        while state.food.len() < self.config.apple_count {
            match self.place_one(state) {
                Some(item) => state.food.push(item),
                None => break,
            }
        }
    }

    /// Pick a free cell for a new apple
    ///
    /// Rejection-samples random cells first; if the board is dense
    /// enough that sampling keeps missing, falls back to an exhaustive
    /// scan of the free cells so placement always terminates.
    fn place_one(&mut self, state: &GameState) -> Option<FoodItem> {
        let dim = self.grid.dimension() as i32;
        let attempts = self.grid.cell_count() * 4;

        for _ in 0..attempts {
            let cell = Cell::new(self.rng.gen_range(0..dim), self.rng.gen_range(0..dim));
            if self.is_free(state, cell) {
                return Some(self.spawn_at(cell));
            }
        }

        let free: Vec<Cell> = (0..dim)
            .flat_map(|y| (0..dim).map(move |x| Cell::new(x, y)))
            .filter(|cell| self.is_free(state, *cell))
            .collect();

        if free.is_empty() {
            None
        } else {
            let cell = free[self.rng.gen_range(0..free.len())];
            Some(self.spawn_at(cell))
        }
    }

    fn is_free(&self, state: &GameState, cell: Cell) -> bool {
        !state.snake.occupies(cell) && state.food_at(cell).is_none()
    }

    fn spawn_at(&mut self, cell: Cell) -> FoodItem {
        if self.config.moving_apples || self.config.attract_apples {
            let heading = self.rng.gen_range(0.0..std::f32::consts::TAU);
            FoodItem::moving(cell, heading.cos() * FOOD_SPEED, heading.sin() * FOOD_SPEED)
        } else {
            FoodItem::fixed(cell)
        }
    }
}
