use crate::board::{idx, Coord, MineMap};

/// Player-visible state of one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellVisibility {
    #[default]
    Undiscovered,
    Discovered,
    Flagged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagTransition {
    PlacedCorrect,
    PlacedIncorrect,
    RemovedCorrect,
    RemovedIncorrect,
    /// Discovered or out-of-range cell; nothing changed.
    Rejected,
}

impl FlagTransition {
    pub fn changed(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Visibility grid plus flag counters for one session.
///
/// Counters move only on flag transitions, so `is_win` never scans the grid.
#[derive(Clone, Debug)]
pub struct BoardState {
    width: usize,
    height: usize,
    nb_bombs: usize,
    cells: Vec<CellVisibility>,
    flags_placed: usize,
    correct_flags: usize,
}

impl BoardState {
    pub fn new(mines: &MineMap) -> Self {
        Self {
            width: mines.width(),
            height: mines.height(),
            nb_bombs: mines.nb_bombs(),
            cells: vec![CellVisibility::Undiscovered; mines.width() * mines.height()],
            flags_placed: 0,
            correct_flags: 0,
        }
    }

    /// Undiscovered ↔ Flagged. `mines` must be the layout this state was built from.
    pub fn toggle_flag(&mut self, coord: Coord, mines: &MineMap) -> FlagTransition {
        if !self.contains(coord) { return FlagTransition::Rejected; }
        let i = idx(self.width, coord);
        let is_mine = mines.is_mine(coord);
        let transition = match self.cells[i] {
            CellVisibility::Discovered => return FlagTransition::Rejected,
            CellVisibility::Undiscovered => {
                self.cells[i] = CellVisibility::Flagged;
                self.flags_placed += 1;
                if is_mine {
                    self.correct_flags += 1;
                    FlagTransition::PlacedCorrect
                } else {
                    FlagTransition::PlacedIncorrect
                }
            }
            CellVisibility::Flagged => {
                self.cells[i] = CellVisibility::Undiscovered;
                self.flags_placed -= 1;
                if is_mine {
                    self.correct_flags -= 1;
                    FlagTransition::RemovedCorrect
                } else {
                    FlagTransition::RemovedIncorrect
                }
            }
        };
        tracing::debug!(?coord, ?transition, flags = self.flags_placed, "flag toggled");
        transition
    }

    /// Every mine flagged and nothing else.
    pub fn is_win(&self) -> bool {
        self.flags_placed == self.nb_bombs && self.correct_flags == self.nb_bombs
    }

    /// Out-of-range coordinates read as `Discovered` so callers treat them as inert.
    pub fn visibility(&self, coord: Coord) -> CellVisibility {
        if self.contains(coord) { self.cells[idx(self.width, coord)] } else { CellVisibility::Discovered }
    }

    /// Only the reveal engine discovers cells. Returns false if the cell was
    /// not undiscovered.
    pub(crate) fn discover(&mut self, coord: Coord) -> bool {
        let i = idx(self.width, coord);
        if self.cells[i] != CellVisibility::Undiscovered { return false; }
        self.cells[i] = CellVisibility::Discovered;
        true
    }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row < self.height && col < self.width
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn nb_bombs(&self) -> usize { self.nb_bombs }
    pub fn flags_placed(&self) -> usize { self.flags_placed }
    pub fn correct_flags(&self) -> usize { self.correct_flags }
}
