pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod state;
pub mod tui;

pub use board::{Coord, MineMap};
pub use config::GameConfig;
pub use engine::{reveal, RevealOutcome};
pub use error::{GameError, Result};
pub use game::{AbstractEvent, Game, Outcome};
pub use state::{BoardState, CellVisibility, FlagTransition};
