mod config;
mod food;
mod game;
mod snake;
mod term;

use std::convert::TryFrom;
use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use simplelog::WriteLogger;

use crate::config::{Args, Settings};
use crate::food::FoodGenerator;
use crate::game::{GameLoop, SessionEnd, SystemClock};
use crate::snake::GridSimulation;
use crate::term::{KeyboardInput, TermManager};

pub type TermInt = u16;
pub type Coords = (u16, u16);

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::try_from(&args)?;
    init_logging(&args)?;

    let food = match settings.seed {
        Some(seed) => FoodGenerator::new(seed, settings.food),
        None => FoodGenerator::from_entropy(settings.food),
    };
    info!(
        "Starting {0}x{0} game, tick {1}s, food {2:?} with seed {3}",
        settings.grid_size,
        settings.tick_rate,
        food.placement(),
        food.seed()
    );

    let simulation = GridSimulation::new(settings.grid_size, food);

    // The terminal is restored when `renderer` goes out of scope, before anything is printed.
    let summary = {
        let mut renderer = TermManager::new(settings.grid_size).context("Failed to set up the terminal")?;
        let mut input = KeyboardInput::new(settings.frame_interval);
        let mut game = GameLoop::new(simulation, SystemClock::new(), settings.tick_rate);
        game.run(&mut input, &mut renderer).context("Failed to draw the board")?
    };

    match summary.end {
        SessionEnd::GameOver(reason) => {
            println!("Game over ({:?}) at length {} after {} ticks", reason, summary.final_length - 1, summary.ticks)
        }
        SessionEnd::Closed => println!("Closed at length {} after {} ticks", summary.final_length, summary.ticks),
    }

    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    // The game owns the terminal, so logs only ever go to a file.
    if let Some(path) = &args.log_file {
        let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
        WriteLogger::init(args.log_level, simplelog::Config::default(), file).context("Failed to start logging")?;
    }

    Ok(())
}
