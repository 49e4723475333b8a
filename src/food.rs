use clap::ValueEnum;
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::snake::Cell;

/// Where new food is allowed to appear.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FoodPlacement {
    /// Uniform over the whole board. Food may land on the snake.
    Anywhere,
    /// Uniform over the cells the snake does not occupy.
    AvoidSnake,
}

pub struct FoodGenerator {
    rng: StdRng,
    seed: u64,
    placement: FoodPlacement,
}

impl FoodGenerator {
    pub fn new(seed: u64, placement: FoodPlacement) -> Self {
        FoodGenerator { rng: StdRng::seed_from_u64(seed), seed, placement }
    }

    pub fn from_entropy(placement: FoodPlacement) -> Self {
        Self::new(rand::random(), placement)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn placement(&self) -> FoodPlacement {
        self.placement
    }

    /// Picks the next food cell on a `grid_size` x `grid_size` board.
    ///
    /// `eaten` is the cell the snake just consumed; it is never handed out
    /// again by the same call. Requires `grid_size >= 2`.
    pub fn place(&mut self, grid_size: i32, body: &[Cell], eaten: Option<Cell>) -> Cell {
        if self.placement == FoodPlacement::AvoidSnake {
            let free: Vec<Cell> = (0..grid_size)
                .flat_map(|y| (0..grid_size).map(move |x| Cell::new(x, y)))
                .filter(|cell| !body.contains(cell))
                .collect();

            if let Some(cell) = free.choose(&mut self.rng) {
                return *cell;
            }

            debug!("No free cell left for food, placing anywhere");
        }

        loop {
            let cell = Cell::new(self.rng.gen_range(0..grid_size), self.rng.gen_range(0..grid_size));
            if Some(cell) != eaten {
                return cell;
            }
        }
    }
}
