use std::collections::VecDeque;
use std::time::Duration;

use super::config::GameConfig;
use super::direction::Direction;
use super::engine::GameEngine;
use super::motion;
use super::scheduler::TickScheduler;
use super::state::{CollisionType, GameState, Phase, Snake};
use crate::storage::HighScoreStore;

/// How long the board keeps showing the collision before the run ends
pub const COLLISION_DELAY: Duration = Duration::from_millis(900);

/// Notifications emitted by the session for collaborator adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    HighScoreChanged(u32),
    Collided(CollisionType),
    GameOver,
}

/// Read-only view of the simulation for one rendered frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub grid_dimension: usize,
    /// Snake segments at interpolated positions, head first, in cell units
    pub segments: Vec<(f32, f32)>,
    pub head_direction: Direction,
    /// Apple positions in cell units
    pub food: Vec<(f32, f32)>,
    pub score: u32,
    pub high_score: u32,
    pub phase: Phase,
    pub tick_rate: u32,
}

/// The controller owning one game
///
/// Everything runs on a single logical thread: input writes the
/// requested direction, the host calls [`GameSession::on_frame`] once
/// per render callback, and the renderer reads [`GameSession::snapshot`].
/// The session owns all mutable state; stopping is idempotent because
/// every frame checks the phase before advancing anything.
pub struct GameSession {
    engine: GameEngine,
    state: GameState,
    scheduler: TickScheduler,
    store: Box<dyn HighScoreStore>,
    events: VecDeque<GameEvent>,
    high_score: u32,
    dying_for: Duration,
}

impl GameSession {
    /// Create a session; the high score is loaded from the store once,
    /// at construction
    pub fn new(config: GameConfig, mut store: Box<dyn HighScoreStore>) -> Self {
        let high_score = store.load().unwrap_or(0);
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            scheduler: TickScheduler::new(),
            store,
            events: VecDeque::new(),
            high_score,
            dying_for: Duration::ZERO,
        }
    }

    /// Start a run with a new configuration, discarding any previous one
    ///
    /// Calling this twice in a row is a full reset: score to zero, the
    /// snake back to its canonical start, and a fresh apple set.
    pub fn start(&mut self, config: GameConfig) {
        self.engine = GameEngine::new(config);
        self.state = self.engine.reset();
        self.state.phase = Phase::Running;
        self.state.requested = Direction::Right;
        self.scheduler.reset();
        self.dying_for = Duration::ZERO;
        self.events.push_back(GameEvent::ScoreChanged(0));
    }

    /// Restart with the configuration of the current run
    pub fn restart(&mut self) {
        self.start(self.engine.config().clone());
    }

    /// Record a direction change; last write before a tick wins
    ///
    /// Reversals are filtered at the tick, against the direction that
    /// was actually applied, not here.
    pub fn set_requested_direction(&mut self, direction: Direction) {
        if direction.is_idle() {
            return;
        }
        self.state.requested = direction;
    }

    /// Advance the session by one render callback's worth of wall time
    pub fn on_frame(&mut self, elapsed: Duration) {
        match self.state.phase {
            Phase::NotStarted | Phase::GameOver => {}
            Phase::Dying { .. } => {
                // The snake is frozen but apples keep drifting.
                self.drift_food(elapsed);
                self.dying_for += elapsed;
                if self.dying_for >= COLLISION_DELAY {
                    self.state.phase = Phase::GameOver;
                    self.events.push_back(GameEvent::GameOver);
                }
            }
            Phase::Running => {
                self.drift_food(elapsed);
                let ticks = self.scheduler.advance(elapsed, self.state.tick_rate);
                for _ in 0..ticks {
                    let outcome = self.engine.step(&mut self.state);

                    if outcome.ate_food {
                        self.events.push_back(GameEvent::ScoreChanged(self.state.score));
                        self.raise_high_score(self.state.score);
                    }
                    if let Some(kind) = outcome.fault {
                        self.events.push_back(GameEvent::Collided(kind));
                        break;
                    }
                }
            }
        }
    }

    /// Drain pending notifications
    pub fn poll_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    /// Build the render view for the current frame
    pub fn snapshot(&self) -> Snapshot {
        let fraction = self.scheduler.fraction(self.state.tick_rate);

        Snapshot {
            grid_dimension: self.engine.grid().dimension(),
            segments: interpolate_segments(&self.state.snake, fraction),
            head_direction: self.state.applied,
            food: self.state.food.iter().map(|item| (item.x, item.y)).collect(),
            score: self.state.score,
            high_score: self.high_score,
            phase: self.state.phase,
            tick_rate: self.state.tick_rate,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    fn drift_food(&mut self, elapsed: Duration) {
        motion::drift_food(
            &self.state.snake,
            &mut self.state.food,
            self.engine.grid(),
            self.engine.config().attract_apples,
            elapsed.as_secs_f32(),
        );
    }

    fn raise_high_score(&mut self, score: u32) {
        if score <= self.high_score {
            return;
        }
        self.high_score = score;
        self.events.push_back(GameEvent::HighScoreChanged(score));
        // The in-memory value stays authoritative if the store is
        // unavailable; the next update tries again.
        let _ = self.store.save(score);
    }
}

/// Blend each segment from its previous to its current cell
///
/// A segment that jumped more than one cell crossed the torus seam, so
/// it snaps instead of sliding across the whole board.
fn interpolate_segments(snake: &Snake, fraction: f32) -> Vec<(f32, f32)> {
    snake
        .body
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let prev = snake.prev_body.get(i).copied().unwrap_or(*cell);
            let (dx, dy) = (cell.x - prev.x, cell.y - prev.y);
            if dx.abs() > 1 || dy.abs() > 1 {
                (cell.x as f32, cell.y as f32)
            } else {
                (
                    prev.x as f32 + dx as f32 * fraction,
                    prev.y as f32 + dy as f32 * fraction,
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Cell, FoodItem};
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store that records every save for assertions
    struct RecordingStore {
        saved: Rc<RefCell<Vec<u32>>>,
        initial: u32,
    }

    impl HighScoreStore for RecordingStore {
        fn load(&mut self) -> anyhow::Result<u32> {
            Ok(self.initial)
        }

        fn save(&mut self, high_score: u32) -> anyhow::Result<()> {
            self.saved.borrow_mut().push(high_score);
            Ok(())
        }
    }

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), Box::<MemoryStore>::default())
    }

    /// One frame long enough to run exactly one tick at the default
    /// 7 ticks/sec (threshold 60/7 of a frame unit).
    fn one_tick() -> Duration {
        Duration::from_millis(150)
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = session();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_frames_before_start_do_nothing() {
        let mut session = session();
        let before = session.snapshot();

        session.on_frame(Duration::from_secs(1));

        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_start_begins_moving_right() {
        let mut session = session();
        session.start(GameConfig::default());
        assert_eq!(session.phase(), Phase::Running);

        let head_before = session.state.snake.head();
        session.on_frame(one_tick());

        assert_eq!(session.state.snake.head(), head_before.offset(1, 0));
        assert_eq!(session.state.applied, Direction::Right);
    }

    #[test]
    fn test_restart_is_a_full_reset() {
        let mut session = session();
        session.start(GameConfig::default());
        session.state.score = 9;
        session.state.tick_rate = 12;
        session.on_frame(one_tick());

        session.restart();

        assert_eq!(session.score(), 0);
        assert_eq!(session.state.tick_rate, 7);
        assert_eq!(session.state.snake.len(), 3);
        assert_eq!(session.state.snake.head(), Cell::new(10, 10));
        assert_eq!(session.state.food.len(), 1);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_reversal_request_is_ignored() {
        let mut session = session();
        session.start(GameConfig::default());
        session.on_frame(one_tick());
        let head = session.state.snake.head();

        session.set_requested_direction(Direction::Left);
        session.on_frame(one_tick());

        // Still heading right.
        assert_eq!(session.state.snake.head(), head.offset(1, 0));
    }

    #[test]
    fn test_last_direction_write_wins() {
        let mut session = session();
        session.start(GameConfig::default());
        session.on_frame(one_tick());

        session.set_requested_direction(Direction::Up);
        session.set_requested_direction(Direction::Down);
        let head = session.state.snake.head();
        session.on_frame(one_tick());

        assert_eq!(session.state.snake.head(), head.offset(0, 1));
    }

    #[test]
    fn test_eating_emits_score_and_high_score_events() {
        let saved = Rc::new(RefCell::new(Vec::new()));
        let store = RecordingStore {
            saved: Rc::clone(&saved),
            initial: 0,
        };
        let mut session = GameSession::new(GameConfig::default(), Box::new(store));
        session.start(GameConfig::default());
        session.poll_events();

        let target = session.state.snake.head().offset(1, 0);
        session.state.food = vec![FoodItem::fixed(target)];
        session.on_frame(one_tick());

        let events = session.poll_events();
        assert!(events.contains(&GameEvent::ScoreChanged(1)));
        assert!(events.contains(&GameEvent::HighScoreChanged(1)));
        assert_eq!(*saved.borrow(), vec![1]);
        assert_eq!(session.high_score(), 1);
    }

    #[test]
    fn test_high_score_is_monotonic() {
        let saved = Rc::new(RefCell::new(Vec::new()));
        let store = RecordingStore {
            saved: Rc::clone(&saved),
            initial: 5,
        };
        let mut session = GameSession::new(GameConfig::default(), Box::new(store));
        session.start(GameConfig::default());
        session.poll_events();

        let target = session.state.snake.head().offset(1, 0);
        session.state.food = vec![FoodItem::fixed(target)];
        session.on_frame(one_tick());

        // Score 1 does not beat the stored 5.
        let events = session.poll_events();
        assert!(events.contains(&GameEvent::ScoreChanged(1)));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::HighScoreChanged(_))));
        assert!(saved.borrow().is_empty());
        assert_eq!(session.high_score(), 5);
    }

    #[test]
    fn test_collision_delays_game_over() {
        let mut session = session();
        session.start(GameConfig::default());
        session.poll_events();

        // Drive the snake into the right wall.
        for _ in 0..20 {
            session.on_frame(one_tick());
            if !session.phase().is_running() {
                break;
            }
        }
        assert!(matches!(
            session.phase(),
            Phase::Dying {
                fault: CollisionType::Wall,
                at: Cell { x: 20, y: 10 },
            }
        ));
        assert!(session
            .poll_events()
            .contains(&GameEvent::Collided(CollisionType::Wall)));

        // The snake stays frozen through the delay window.
        let frozen = session.state.snake.clone();
        session.on_frame(Duration::from_millis(450));
        assert!(!session.phase().is_over());
        assert_eq!(session.state.snake, frozen);

        session.on_frame(Duration::from_millis(500));
        assert!(session.phase().is_over());
        assert!(session.poll_events().contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_finished_session_ignores_frames() {
        let mut session = session();
        session.start(GameConfig::default());
        session.state.phase = Phase::GameOver;

        let before = session.state.clone();
        session.on_frame(Duration::from_secs(2));

        assert_eq!(session.state, before);
        assert!(session.poll_events().iter().all(|e| *e != GameEvent::GameOver));
    }

    #[test]
    fn test_snapshot_interpolates_between_cells() {
        let mut session = session();
        session.start(GameConfig::default());

        // One full tick, then partway toward the next.
        session.on_frame(one_tick());
        let head = session.state.snake.head();
        session.on_frame(Duration::from_millis(52));

        let snapshot = session.snapshot();
        let (hx, hy) = snapshot.segments[0];
        assert!(hx > (head.x - 1) as f32 && hx < head.x as f32 + 1.0);
        assert_eq!(hy, head.y as f32);
        assert!(hx.fract() != 0.0);
    }

    #[test]
    fn test_snapshot_reflects_scores_and_food() {
        let mut session = session();
        session.start(GameConfig::default());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.grid_dimension, 20);
        assert_eq!(snapshot.segments.len(), 3);
        assert_eq!(snapshot.food.len(), 1);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.tick_rate, 7);
    }

    #[test]
    fn test_interpolation_snaps_across_the_torus_seam() {
        let mut snake = Snake::new(Cell::new(19, 10), Direction::Right, 3);
        snake.advance(Cell::new(0, 10), false);

        let positions = interpolate_segments(&snake, 0.5);

        // The wrapped head snaps to its new cell rather than sliding
        // across the board.
        assert_eq!(positions[0], (0.0, 10.0));
        // Trailing segments still slide normally.
        assert_eq!(positions[1], (18.5, 10.0));
    }

    #[test]
    fn test_out_of_range_config_is_clamped_not_rejected() {
        let mut session = session();
        session.start(GameConfig {
            grid_dimension: 500,
            tick_rate: 99,
            apple_count: 0,
            ..Default::default()
        });

        assert_eq!(session.config().grid_dimension, 64);
        assert_eq!(session.config().tick_rate, 15);
        assert_eq!(session.state.food.len(), 1);
        assert_eq!(session.phase(), Phase::Running);
    }
}
