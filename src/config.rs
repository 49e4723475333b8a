use std::convert::TryFrom;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use thiserror::Error;

use crate::food::FoodPlacement;

pub const DEFAULT_GRID_SIZE: i32 = 16;
pub const DEFAULT_TICK_RATE: f64 = 0.1;
pub const DEFAULT_FPS: u32 = 60;

const MIN_GRID_SIZE: i32 = 2;
const MAX_GRID_SIZE: i32 = 64;
const MAX_FPS: u32 = 240;

#[derive(Parser, Debug)]
#[command(name = "snake", about = "Grid snake in the terminal")]
pub struct Args {
    /// Width and height of the board in cells
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    pub grid_size: i32,

    /// Seconds per simulation step
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    pub tick_rate: f64,

    /// Upper bound on input polls and redraws per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    #[arg(long, value_enum, default_value_t = FoodPlacement::Anywhere)]
    pub food: FoodPlacement,

    /// Seed for food placement; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value_t = LevelFilter::Info, value_parser = parse_level)]
    pub log_level: LevelFilter,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level '{}'", s))
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid size must be between 2 and 64, got {0}")]
    GridSize(i32),
    #[error("tick rate must be a positive number of seconds, got {0}")]
    TickRate(f64),
    #[error("fps must be between 1 and 240, got {0}")]
    Fps(u32),
}

/// Startup settings. Fixed for the lifetime of the process.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub grid_size: i32,
    pub tick_rate: f64,
    pub frame_interval: Duration,
    pub food: FoodPlacement,
    pub seed: Option<u64>,
}

impl TryFrom<&Args> for Settings {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&args.grid_size) {
            return Err(ConfigError::GridSize(args.grid_size));
        }
        if !args.tick_rate.is_finite() || args.tick_rate <= 0.0 {
            return Err(ConfigError::TickRate(args.tick_rate));
        }
        if !(1..=MAX_FPS).contains(&args.fps) {
            return Err(ConfigError::Fps(args.fps));
        }

        Ok(Settings {
            grid_size: args.grid_size,
            tick_rate: args.tick_rate,
            frame_interval: Duration::from_secs_f64(1.0 / args.fps as f64),
            food: args.food,
            seed: args.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("snake").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.log_level, LevelFilter::Info);
        assert!(args.log_file.is_none());

        let settings = Settings::try_from(&args).unwrap();
        assert_eq!(settings.grid_size, 16);
        assert_eq!(settings.tick_rate, 0.1);
        assert_eq!(settings.food, FoodPlacement::Anywhere);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.frame_interval, Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--grid-size", "20",
            "--tick-rate", "0.25",
            "--fps", "30",
            "--food", "avoid-snake",
            "--seed", "99",
            "--log-file", "snake.log",
            "--log-level", "debug",
        ]);
        assert_eq!(args.log_level, LevelFilter::Debug);
        assert_eq!(args.log_file, Some(PathBuf::from("snake.log")));

        let settings = Settings::try_from(&args).unwrap();
        assert_eq!(settings.grid_size, 20);
        assert_eq!(settings.tick_rate, 0.25);
        assert_eq!(settings.food, FoodPlacement::AvoidSnake);
        assert_eq!(settings.seed, Some(99));
    }

    #[test]
    fn test_rejects_bad_grid_size() {
        assert_eq!(Settings::try_from(&parse(&["--grid-size", "1"])), Err(ConfigError::GridSize(1)));
        assert_eq!(Settings::try_from(&parse(&["--grid-size", "65"])), Err(ConfigError::GridSize(65)));
    }

    #[test]
    fn test_rejects_bad_tick_rate() {
        assert_eq!(Settings::try_from(&parse(&["--tick-rate", "0"])), Err(ConfigError::TickRate(0.0)));
        assert!(Settings::try_from(&parse(&["--tick-rate", "inf"])).is_err());
    }

    #[test]
    fn test_rejects_bad_fps() {
        assert_eq!(Settings::try_from(&parse(&["--fps", "0"])), Err(ConfigError::Fps(0)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(Args::try_parse_from(["snake", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_food_placement() {
        assert!(Args::try_parse_from(["snake", "--food", "nowhere"]).is_err());
    }
}
