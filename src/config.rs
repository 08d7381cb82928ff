use crate::error::{GameError, Result};

/// Share of cells holding a mine.
pub const MINE_DENSITY: f64 = 0.11;

/// Rows/columns kept free around the board for its border.
pub const SCREEN_MARGIN: usize = 2;

/// Longest side a board may have; the terminal addresses cells with `u16`.
pub const MAX_SIDE: usize = u16::MAX as usize;

/// Cell count of a `width`x`height` board, rejecting empty or oversized ones.
pub fn board_capacity(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(GameError::EmptyBoard { width, height });
    }
    if width > MAX_SIDE || height > MAX_SIDE {
        return Err(GameError::BoardTooLarge { width, height, max: MAX_SIDE });
    }
    width.checked_mul(height).ok_or(GameError::BoardTooLarge { width, height, max: MAX_SIDE })
}

/// Dimensions and mine count for one session, fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    width: usize,
    height: usize,
    nb_bombs: usize,
}

impl GameConfig {
    pub fn new(width: usize, height: usize, nb_bombs: usize) -> Result<Self> {
        let capacity = board_capacity(width, height)?;
        if nb_bombs > capacity {
            return Err(GameError::TooManyMines { nb_bombs, capacity });
        }
        Ok(Self { width, height, nb_bombs })
    }

    /// Board with the default mine density, rounded down.
    pub fn with_density(width: usize, height: usize) -> Result<Self> {
        let capacity = board_capacity(width, height)?;
        let nb_bombs = (MINE_DENSITY * capacity as f64).floor() as usize;
        Self::new(width, height, nb_bombs)
    }

    /// Fills in dimensions missing from the command line from the terminal size
    /// `(columns, rows)`.
    pub fn resolve(lines: Option<usize>, cols: Option<usize>, terminal: (u16, u16)) -> Result<Self> {
        let (term_cols, term_rows) = terminal;
        let height = lines.unwrap_or_else(|| usize::from(term_rows).saturating_sub(SCREEN_MARGIN));
        let width = cols.unwrap_or_else(|| usize::from(term_cols).saturating_sub(SCREEN_MARGIN));
        Self::with_density(width, height)
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn nb_bombs(&self) -> usize { self.nb_bombs }
    pub fn cells(&self) -> usize { self.width * self.height }
}
