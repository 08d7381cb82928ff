use std::io;

use rand::Rng;

use crate::board::{Coord, MineMap};
use crate::config::GameConfig;
use crate::engine::{self, RevealOutcome};
use crate::state::{BoardState, CellVisibility};

pub const UNDISCOVERED_GLYPH: char = '·';
pub const FLAG_GLYPH: char = 'F';
pub const MINE_GLYPH: char = '*';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Where an action applies: the cursor, or a cell picked by the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Cursor,
    At(Coord),
}

/// Input vocabulary the controller understands, decoded by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbstractEvent {
    MoveCursor(Direction),
    Reveal(Target),
    ToggleFlag(Target),
    Quit,
    Interrupt,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    /// Carries the detonated mine.
    Lost(Coord),
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorClass {
    /// Discovered cell with this many neighboring mines.
    Count(u8),
    Flag,
    Undiscovered,
    Mine,
    WinBanner,
    LossBanner,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    Won,
    Lost,
}

impl Banner {
    pub fn text(self) -> &'static str {
        match self {
            Banner::Won => "You won!",
            Banner::Lost => "Game over!",
        }
    }

    pub fn color_class(self) -> ColorClass {
        match self {
            Banner::Won => ColorClass::WinBanner,
            Banner::Lost => ColorClass::LossBanner,
        }
    }
}

/// Drawing side of the terminal adapter. Calls are buffered until `present`.
pub trait Screen {
    fn render_cell(&mut self, coord: Coord, glyph: char, color: ColorClass);
    fn render_banner(&mut self, banner: Banner, at: Option<Coord>);
    fn render_status(&mut self, flags_placed: usize, nb_bombs: usize);
    fn move_cursor(&mut self, coord: Coord);
    fn read_cursor(&self) -> Coord;
    fn present(&mut self) -> io::Result<()>;
}

/// Input side of the terminal adapter. Blocks until an event is available.
pub trait InputSource {
    fn next_input_event(&mut self) -> io::Result<AbstractEvent>;
}

pub fn count_glyph(count: u8) -> char {
    if count == 0 { ' ' } else { char::from_digit(count as u32, 10).unwrap_or('?') }
}

/// One session: the mine layout, the visibility state and the outcome.
pub struct Game {
    mines: MineMap,
    board: BoardState,
    outcome: Outcome,
}

impl Game {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        Self::from_mines(MineMap::from_config(config, rng))
    }

    pub fn from_mines(mines: MineMap) -> Self {
        let board = BoardState::new(&mines);
        Self { mines, board, outcome: Outcome::InProgress }
    }

    pub fn outcome(&self) -> Outcome { self.outcome }
    pub fn mines(&self) -> &MineMap { &self.mines }
    pub fn board(&self) -> &BoardState { &self.board }

    /// Draws the covered board and centers the cursor.
    pub fn start<S: Screen + ?Sized>(&self, screen: &mut S) {
        for row in 0..self.board.height() {
            for col in 0..self.board.width() {
                screen.render_cell((row, col), UNDISCOVERED_GLYPH, ColorClass::Undiscovered);
            }
        }
        screen.render_status(self.board.flags_placed(), self.board.nb_bombs());
        screen.move_cursor((self.board.height() / 2, self.board.width() / 2));
    }

    /// Applies one event. Once the session is over every event is ignored.
    pub fn handle<S: Screen + ?Sized>(&mut self, event: AbstractEvent, screen: &mut S) -> Outcome {
        if self.outcome.is_terminal() { return self.outcome; }
        match event {
            AbstractEvent::MoveCursor(dir) => {
                let next = self.step(screen.read_cursor(), dir);
                screen.move_cursor(next);
            }
            AbstractEvent::Reveal(target) => {
                if let Some(coord) = self.aim(target, screen) { self.reveal_at(coord, screen); }
            }
            AbstractEvent::ToggleFlag(target) => {
                if let Some(coord) = self.aim(target, screen) { self.toggle_flag_at(coord, screen); }
            }
            AbstractEvent::Quit | AbstractEvent::Interrupt | AbstractEvent::Unknown => {}
        }
        self.outcome
    }

    fn step(&self, (row, col): Coord, dir: Direction) -> Coord {
        let last_row = self.board.height() - 1;
        let last_col = self.board.width() - 1;
        match dir {
            Direction::Up => (row.saturating_sub(1), col.min(last_col)),
            Direction::Down => ((row + 1).min(last_row), col.min(last_col)),
            Direction::Left => (row.min(last_row), col.saturating_sub(1)),
            Direction::Right => (row.min(last_row), (col + 1).min(last_col)),
        }
    }

    /// Pointer targets move the cursor onto the clicked cell.
    fn aim<S: Screen + ?Sized>(&self, target: Target, screen: &mut S) -> Option<Coord> {
        match target {
            Target::Cursor => Some(screen.read_cursor()),
            Target::At(coord) if self.board.contains(coord) => {
                screen.move_cursor(coord);
                Some(coord)
            }
            Target::At(_) => None,
        }
    }

    fn reveal_at<S: Screen + ?Sized>(&mut self, coord: Coord, screen: &mut S) {
        if self.board.visibility(coord) != CellVisibility::Undiscovered { return; }
        match engine::reveal(coord, &self.mines, &mut self.board) {
            RevealOutcome::HitMine(at) => {
                self.outcome = Outcome::Lost(at);
                tracing::info!(?at, "session lost");
                for mine in self.mines.mines() {
                    screen.render_cell(mine, MINE_GLYPH, ColorClass::Mine);
                }
                screen.render_banner(Banner::Lost, Some(at));
            }
            RevealOutcome::Revealed(cells) => {
                for (cell, count) in cells {
                    screen.render_cell(cell, count_glyph(count), ColorClass::Count(count));
                }
            }
        }
    }

    fn toggle_flag_at<S: Screen + ?Sized>(&mut self, coord: Coord, screen: &mut S) {
        if self.board.visibility(coord) == CellVisibility::Discovered { return; }
        if !self.board.toggle_flag(coord, &self.mines).changed() { return; }
        match self.board.visibility(coord) {
            CellVisibility::Flagged => screen.render_cell(coord, FLAG_GLYPH, ColorClass::Flag),
            _ => screen.render_cell(coord, UNDISCOVERED_GLYPH, ColorClass::Undiscovered),
        }
        screen.render_status(self.board.flags_placed(), self.board.nb_bombs());
        if self.board.is_win() {
            self.outcome = Outcome::Won;
            tracing::info!(flags = self.board.flags_placed(), "session won");
            screen.render_banner(Banner::Won, None);
        }
    }
}

/// How a session loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Finished(Outcome),
    Quit,
    Interrupted,
}

/// Drives `game` until it ends or the player leaves.
///
/// After a win or loss the final screen stays up until the next key press or
/// click; unknown input does not dismiss it.
pub fn run<F: Screen + InputSource + ?Sized>(game: &mut Game, frontend: &mut F) -> io::Result<SessionEnd> {
    tracing::info!(
        width = game.board().width(),
        height = game.board().height(),
        nb_bombs = game.mines().nb_bombs(),
        "session started"
    );
    game.start(frontend);
    loop {
        frontend.present()?;
        match frontend.next_input_event()? {
            AbstractEvent::Quit => return Ok(SessionEnd::Quit),
            AbstractEvent::Interrupt => {
                tracing::info!("session interrupted");
                return Ok(SessionEnd::Interrupted);
            }
            event => {
                tracing::trace!(?event, "input");
                if game.handle(event, frontend).is_terminal() { break; }
            }
        }
    }

    frontend.present()?;
    loop {
        match frontend.next_input_event()? {
            AbstractEvent::Unknown => continue,
            AbstractEvent::Interrupt => return Ok(SessionEnd::Interrupted),
            _ => return Ok(SessionEnd::Finished(game.outcome())),
        }
    }
}
