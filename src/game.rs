use std::time::Instant;

use log::{debug, info};

use crate::snake::{Cell, Direction, GameOverReason, GridSimulation, Status, StepOutcome};

/// Monotonic time in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

pub trait InputSource {
    /// The direction the player asked for since the last poll, if any.
    fn poll_direction_intent(&mut self) -> Option<Direction>;

    fn should_close(&self) -> bool;
}

/// Receives a snapshot of the board once per loop iteration.
pub trait Renderer {
    type Error;

    fn draw(&mut self, snake_cells: &[Cell], food_cell: Cell, grid_size: i32) -> Result<(), Self::Error>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Closed,
    GameOver(GameOverReason),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop(SessionEnd),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub ticks: u64,
    pub final_length: usize,
}

/// Polls input and redraws every iteration, but steps the simulation at most
/// once per `tick_rate` seconds. Missed ticks are not caught up.
pub struct GameLoop<C> {
    simulation: GridSimulation,
    clock: C,
    tick_rate: f64,
    last_tick_time: f64,
    ticks: u64,
}

impl<C: Clock> GameLoop<C> {
    pub fn new(simulation: GridSimulation, clock: C, tick_rate: f64) -> Self {
        let last_tick_time = clock.now();
        GameLoop { simulation, clock, tick_rate, last_tick_time, ticks: 0 }
    }

    pub fn simulation(&self) -> &GridSimulation {
        &self.simulation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn iterate<I, R>(&mut self, input: &mut I, renderer: &mut R) -> Result<LoopControl, R::Error>
    where
        I: InputSource,
        R: Renderer,
    {
        let now = self.clock.now();

        if let Some(direction) = input.poll_direction_intent() {
            self.simulation.set_pending_direction(direction);
        }

        if now - self.last_tick_time > self.tick_rate {
            self.last_tick_time = now;
            self.ticks += 1;
            if let StepOutcome::Grew = self.simulation.step() {
                debug!("Tick {}: grew to {}", self.ticks, self.simulation.state().len());
            }
        }

        let state = self.simulation.state();
        renderer.draw(state.body(), state.food(), self.simulation.grid_size())?;

        if let Status::GameOver(reason) = state.status() {
            return Ok(LoopControl::Stop(SessionEnd::GameOver(reason)));
        }
        if input.should_close() {
            return Ok(LoopControl::Stop(SessionEnd::Closed));
        }

        Ok(LoopControl::Continue)
    }

    pub fn run<I, R>(&mut self, input: &mut I, renderer: &mut R) -> Result<SessionSummary, R::Error>
    where
        I: InputSource,
        R: Renderer,
    {
        loop {
            if let LoopControl::Stop(end) = self.iterate(input, renderer)? {
                let summary = SessionSummary {
                    end,
                    ticks: self.ticks,
                    final_length: self.simulation.state().len(),
                };
                info!("Session ended: {:?} after {} ticks", end, self.ticks);
                return Ok(summary);
            }
        }
    }
}
