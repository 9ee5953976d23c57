use super::direction::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset the cell by a delta
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The neighboring cell one step in a direction
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }
}

/// The snake: an ordered sequence of cells, head at index 0
///
/// `prev_body` holds the segment positions as of the previous tick so
/// the renderer can blend between the two for sub-cell motion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub body: Vec<Cell>,
    pub prev_body: Vec<Cell>,
}

impl Snake {
    /// Create a straight snake with the given head, extending opposite
    /// to the direction of travel
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let mut body = vec![head];
        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.offset(-dx, -dy));
        }

        Self {
            prev_body: body.clone(),
            body,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    /// Body segments excluding the head
    pub fn body_segments(&self) -> &[Cell] {
        &self.body[1..]
    }

    /// Check whether any segment occupies the cell
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Check whether moving the head to `cell` would collide with the body
    ///
    /// When the tail pops this tick its cell is vacated before the head
    /// arrives, so it is excluded from the check.
    pub fn would_hit(&self, cell: Cell, tail_pops: bool) -> bool {
        let checked = if tail_pops {
            &self.body[..self.body.len() - 1]
        } else {
            &self.body[..]
        };
        checked.contains(&cell)
    }

    /// Advance the snake: prepend the new head and, unless growing, pop
    /// the tail. The old positions are kept for interpolation.
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.prev_body = self.body.clone();
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// One apple on the board
///
/// Position is continuous, in cell units, so apples can drift between
/// cells when motion is enabled. A resting apple sits exactly on its
/// cell with zero velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodItem {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl FoodItem {
    /// A stationary apple centered on a cell
    pub fn fixed(cell: Cell) -> Self {
        Self {
            x: cell.x as f32,
            y: cell.y as f32,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// A drifting apple starting on a cell with the given velocity,
    /// in cells per second
    pub fn moving(cell: Cell, vx: f32, vy: f32) -> Self {
        Self {
            x: cell.x as f32,
            y: cell.y as f32,
            vx,
            vy,
        }
    }

    /// The grid cell this apple currently occupies
    pub fn cell(&self) -> Cell {
        Cell::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn is_drifting(&self) -> bool {
        self.vx != 0.0 || self.vy != 0.0
    }
}

/// Kind of collision fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Lifecycle phase of a game
///
/// `Dying` is the window between a collision and the final game-over,
/// giving the renderer time to show the death before the board freezes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Dying { fault: CollisionType, at: Cell },
    GameOver,
}

impl Phase {
    pub fn is_running(&self) -> bool {
        matches!(self, Phase::Running)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, Phase::GameOver)
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Vec<FoodItem>,
    pub phase: Phase,
    pub score: u32,
    pub steps: u32,
    /// Direction asked for by input, consumed at the next tick
    pub requested: Direction,
    /// Direction actually used on the most recent tick
    pub applied: Direction,
    /// Current simulation rate; rises with the score
    pub tick_rate: u32,
}

impl GameState {
    pub fn new(snake: Snake, tick_rate: u32) -> Self {
        Self {
            snake,
            food: Vec::new(),
            phase: Phase::NotStarted,
            score: 0,
            steps: 0,
            requested: Direction::Idle,
            applied: Direction::Idle,
            tick_rate,
        }
    }

    /// Check whether a cell holds an apple, returning its index
    pub fn food_at(&self, cell: Cell) -> Option<usize> {
        self.food.iter().position(|item| item.cell() == cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_offsets() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.offset(1, 0), Cell::new(6, 5));
        assert_eq!(cell.offset(-1, 0), Cell::new(4, 5));
        assert_eq!(cell.step(Direction::Up), Cell::new(5, 4));
        assert_eq!(cell.step(Direction::Down), Cell::new(5, 6));
        assert_eq!(cell.step(Direction::Idle), cell);
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(5, 5));
        assert_eq!(snake.body[1], Cell::new(4, 5));
        assert_eq!(snake.body[2], Cell::new(3, 5));
        assert_eq!(snake.prev_body, snake.body);
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        let before = snake.body.clone();

        snake.advance(Cell::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Cell::new(6, 5));
        assert_eq!(snake.tail(), Cell::new(4, 5));
        assert_eq!(snake.prev_body, before);

        snake.advance(Cell::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Cell::new(7, 5));
        assert_eq!(snake.tail(), Cell::new(4, 5));
    }

    #[test]
    fn test_collision_checks() {
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);

        assert!(snake.occupies(Cell::new(5, 5)));
        assert!(snake.occupies(Cell::new(3, 5)));
        assert!(!snake.occupies(Cell::new(9, 9)));

        // Tail cell (3, 5) is vacated when the tail pops.
        assert!(!snake.would_hit(Cell::new(3, 5), true));
        assert!(snake.would_hit(Cell::new(3, 5), false));
        assert!(snake.would_hit(Cell::new(4, 5), true));
    }

    #[test]
    fn test_food_cell_rounding() {
        let mut item = FoodItem::fixed(Cell::new(3, 7));
        assert_eq!(item.cell(), Cell::new(3, 7));
        assert!(!item.is_drifting());

        item.x = 3.4;
        item.y = 6.6;
        assert_eq!(item.cell(), Cell::new(3, 7));

        let drifting = FoodItem::moving(Cell::new(1, 1), 2.0, 0.0);
        assert!(drifting.is_drifting());
    }

    #[test]
    fn test_food_lookup() {
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 3);
        let mut state = GameState::new(snake, 7);
        state.food.push(FoodItem::fixed(Cell::new(8, 2)));

        assert_eq!(state.food_at(Cell::new(8, 2)), Some(0));
        assert_eq!(state.food_at(Cell::new(0, 0)), None);
    }
}
