use log::{debug, info, trace};

use crate::food::FoodGenerator;
use Direction::*;

/// A board coordinate. `y` grows upwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, direction: Direction) -> Cell {
        match direction {
            Up => Cell::new(self.x, self.y + 1),
            Down => Cell::new(self.x, self.y - 1),
            Left => Cell::new(self.x - 1, self.y),
            Right => Cell::new(self.x + 1, self.y),
        }
    }

    pub fn in_bounds(self, grid_size: i32) -> bool {
        (0..grid_size).contains(&self.x) && (0..grid_size).contains(&self.y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    OutOfBounds,
    SelfCollision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Grew,
    GameOver(GameOverReason),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Alive,
    GameOver(GameOverReason),
}

#[derive(Clone, Debug)]
pub struct GameState {
    body: Vec<Cell>,
    food: Cell,
    direction: Direction,
    pending_direction: Direction,
    status: Status,
}

impl GameState {
    /// Head first, tail last. Never empty.
    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }
}

/// Owns the game state and advances it one tick at a time.
pub struct GridSimulation {
    grid_size: i32,
    state: GameState,
    food: FoodGenerator,
}

impl GridSimulation {
    pub fn new(grid_size: i32, mut food: FoodGenerator) -> Self {
        let state = Self::initial_state(grid_size, &mut food);
        GridSimulation { grid_size, state, food }
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Throws the current game away and starts a fresh one.
    pub fn reset(&mut self) {
        self.state = Self::initial_state(self.grid_size, &mut self.food);
        debug!("New game, food at ({}, {})", self.state.food.x, self.state.food.y);
    }

    /// Buffers the direction for the next tick. Reversing into the neck is ignored.
    pub fn set_pending_direction(&mut self, direction: Direction) {
        if direction != self.state.direction.opposite() {
            self.state.pending_direction = direction;
        }
    }

    pub fn step(&mut self) -> StepOutcome {
        if let Status::GameOver(reason) = self.state.status {
            return StepOutcome::GameOver(reason);
        }

        let state = &mut self.state;
        state.direction = state.pending_direction;

        let new_head = state.head().offset(state.direction);
        state.body.insert(0, new_head);
        trace!("Head at ({}, {})", new_head.x, new_head.y);

        let reason = if !new_head.in_bounds(self.grid_size) {
            Some(GameOverReason::OutOfBounds)
        } else if state.body[1..].contains(&new_head) {
            Some(GameOverReason::SelfCollision)
        } else {
            None
        };

        if let Some(reason) = reason {
            // The fatal head stays in the body, matching what was drawn on the last frame.
            state.status = Status::GameOver(reason);
            info!("Game over ({:?}) at length {}", reason, state.body.len() - 1);
            return StepOutcome::GameOver(reason);
        }

        if new_head == state.food {
            state.food = self.food.place(self.grid_size, &state.body, Some(new_head));
            debug!(
                "Ate food, length {}, next food at ({}, {})",
                state.body.len(),
                state.food.x,
                state.food.y
            );
            return StepOutcome::Grew;
        }

        state.body.pop();
        StepOutcome::Moved
    }

    fn initial_state(grid_size: i32, food: &mut FoodGenerator) -> GameState {
        let center = Cell::new(grid_size / 2, grid_size / 2);
        let body = vec![center];
        let food_cell = food.place(grid_size, &body, None);

        GameState {
            body,
            food: food_cell,
            direction: Right,
            pending_direction: Right,
            status: Status::Alive,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_state(
        grid_size: i32,
        body: Vec<Cell>,
        direction: Direction,
        food_cell: Cell,
        food: FoodGenerator,
    ) -> Self {
        assert!(!body.is_empty());
        let state = GameState {
            body,
            food: food_cell,
            direction,
            pending_direction: direction,
            status: Status::Alive,
        };
        GridSimulation { grid_size, state, food }
    }
}
