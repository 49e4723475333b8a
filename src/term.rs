use std::convert::TryFrom;
use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};
use log::{error, warn};
use thiserror::Error;

use crate::game::{InputSource, Renderer};
use crate::snake::{Cell, Direction};
use crate::{Coords, TermInt};

const SNAKE_BODY: &str = "██";
const SNAKE_HEAD: &str = "▓▓";
const FOOD: &str = "()";
const EMPTY: &str = "  ";

// Each board cell takes two terminal columns so it looks square.
const CELL_WIDTH: TermInt = 2;

#[derive(Debug, Error)]
pub enum TermError {
    #[error("terminal is {width}x{height} but the board needs {needed_width}x{needed_height}")]
    TooSmall { width: TermInt, height: TermInt, needed_width: TermInt, needed_height: TermInt },
    #[error("board of size {0} cannot be drawn in a terminal")]
    BoardTooLarge(i32),
    #[error(transparent)]
    Terminal(#[from] crossterm::ErrorKind),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Tile {
    Empty,
    Body,
    Head,
    Food,
}

impl Tile {
    fn glyph(self) -> &'static str {
        match self {
            Tile::Empty => EMPTY,
            Tile::Body => SNAKE_BODY,
            Tile::Head => SNAKE_HEAD,
            Tile::Food => FOOD,
        }
    }
}

/// Draws the board on an alternate screen. The terminal is put back the way it
/// was when this is dropped.
pub struct TermManager {
    stdout: Stdout,
    grid_size: TermInt,
    origin: Coords,
    screen: Vec<Tile>,
    frame: Vec<Tile>,
}

impl TermManager {
    pub fn new(grid_size: i32) -> Result<Self, TermError> {
        let (width, height) = terminal::size()?;
        let grid = board_size(grid_size)?;
        let (needed_width, needed_height) = (grid * CELL_WIDTH + 2, grid + 2);

        if width < needed_width || height < needed_height {
            return Err(TermError::TooSmall { width, height, needed_width, needed_height });
        }

        let tiles = grid as usize * grid as usize;
        let mut term = TermManager {
            stdout: stdout(),
            grid_size: grid,
            origin: ((width - needed_width) / 2 + 1, (height - needed_height) / 2 + 1),
            screen: vec![Tile::Empty; tiles],
            frame: vec![Tile::Empty; tiles],
        };

        // From here on, Drop restores the terminal even if setup fails half way.
        term.setup()?;
        term.clear()?;
        term.draw_borders()?;

        Ok(term)
    }

    fn setup(&mut self) -> Result<(), TermError> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), TermError> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), TermError> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen.iter_mut().for_each(|tile| *tile = Tile::Empty);
        Ok(())
    }

    fn draw_borders(&mut self) -> Result<(), TermError> {
        let left = self.origin.0 - 1;
        let top = self.origin.1 - 1;
        let right = self.origin.0 + self.grid_size * CELL_WIDTH;
        let bottom = self.origin.1 + self.grid_size;

        for x in left..=right {
            let ch = if x == left || x == right { '+' } else { '-' };
            self.print_at((x, top), ch)?;
            self.print_at((x, bottom), ch)?;
        }

        for y in top + 1..bottom {
            self.print_at((left, y), '|')?;
            self.print_at((right, y), '|')?;
        }

        self.flush()
    }

    fn print_at(&mut self, pos: Coords, ch: char) -> Result<(), TermError> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TermError> {
        self.stdout.flush()?;
        Ok(())
    }
}

impl Renderer for TermManager {
    type Error = TermError;

    fn draw(&mut self, snake_cells: &[Cell], food_cell: Cell, grid_size: i32) -> Result<(), TermError> {
        debug_assert_eq!(grid_size, self.grid_size as i32);

        self.frame.iter_mut().for_each(|tile| *tile = Tile::Empty);
        if let Some(i) = tile_index(food_cell, grid_size) {
            self.frame[i] = Tile::Food;
        }
        for (n, cell) in snake_cells.iter().enumerate() {
            if let Some(i) = tile_index(*cell, grid_size) {
                self.frame[i] = if n == 0 { Tile::Head } else { Tile::Body };
            }
        }

        for i in 0..self.frame.len() {
            let tile = self.frame[i];
            if tile != self.screen[i] {
                let pos = screen_position(i, self.grid_size, self.origin);
                queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(tile.glyph()))?;
            }
        }

        std::mem::swap(&mut self.screen, &mut self.frame);
        self.flush()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            error!("Failed to restore terminal: {}", err);
        }
    }
}

/// Keyboard input read through crossterm. Each poll waits up to one frame for a key.
pub struct KeyboardInput {
    frame_interval: Duration,
    close_requested: bool,
}

impl KeyboardInput {
    pub fn new(frame_interval: Duration) -> Self {
        KeyboardInput { frame_interval, close_requested: false }
    }

    fn read_key_events_queue(&self) -> crossterm::Result<Vec<KeyEvent>> {
        let mut events = vec![];
        let mut timeout = self.frame_interval;

        while poll(timeout)? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
            timeout = Duration::from_millis(0);
        }

        Ok(events)
    }
}

impl InputSource for KeyboardInput {
    fn poll_direction_intent(&mut self) -> Option<Direction> {
        let events = match self.read_key_events_queue() {
            Ok(events) => events,
            Err(err) => {
                warn!("Failed to read input, closing: {}", err);
                self.close_requested = true;
                return None;
            }
        };

        let mut intent = None;
        for ev in &events {
            if is_close_request(ev) {
                self.close_requested = true;
            } else if let Some(direction) = key_direction(ev) {
                intent = Some(direction);
            }
        }
        intent
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }
}

fn key_direction(ev: &KeyEvent) -> Option<Direction> {
    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn is_close_request(ev: &KeyEvent) -> bool {
    match ev {
        KeyEvent { code: KeyCode::Char('c'), modifiers } => modifiers.contains(KeyModifiers::CONTROL),
        KeyEvent { code: KeyCode::Esc, .. } | KeyEvent { code: KeyCode::Char('q'), .. } => true,
        _ => false,
    }
}

fn board_size(grid_size: i32) -> Result<TermInt, TermError> {
    match TermInt::try_from(grid_size) {
        Ok(size) if size > 0 && size < TermInt::MAX / (CELL_WIDTH * 2) => Ok(size),
        _ => Err(TermError::BoardTooLarge(grid_size)),
    }
}

fn tile_index(cell: Cell, grid_size: i32) -> Option<usize> {
    if cell.in_bounds(grid_size) {
        Some(cell.y as usize * grid_size as usize + cell.x as usize)
    } else {
        None
    }
}

// Row 0 of the screen is the top of the board, i.e. the highest y.
fn screen_position(index: usize, grid_size: TermInt, origin: Coords) -> Coords {
    let x = (index % grid_size as usize) as TermInt;
    let y = (index / grid_size as usize) as TermInt;
    (origin.0 + x * CELL_WIDTH, origin.1 + (grid_size - 1 - y))
}
