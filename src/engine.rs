use crate::board::{Coord, MineMap};
use crate::state::{BoardState, CellVisibility};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The start cell holds a mine. Visibility is left untouched.
    HitMine(Coord),
    /// Cells newly discovered by this call, each with its neighbor-mine count.
    Revealed(Vec<(Coord, u8)>),
}

/// Number of mines among the in-bounds neighbors of `coord`.
pub fn neighbor_mine_count(mines: &MineMap, coord: Coord) -> u8 {
    mines.neighbors(coord).filter(|&n| mines.is_mine(n)).count() as u8
}

/// Reveals `start` and flood-fills through zero-count cells.
///
/// The caller guarantees `start` is undiscovered. Numbered cells bordering a
/// zero region are revealed but do not spread further. Flagged cells are
/// never uncovered by the fill.
pub fn reveal(start: Coord, mines: &MineMap, state: &mut BoardState) -> RevealOutcome {
    if !state.contains(start) {
        return RevealOutcome::Revealed(Vec::new());
    }
    if mines.is_mine(start) {
        tracing::info!(?start, "mine hit");
        return RevealOutcome::HitMine(start);
    }

    let mut revealed = Vec::new();
    let mut stack = vec![start];
    while let Some(coord) = stack.pop() {
        // Duplicates on the stack are skipped here.
        if !state.discover(coord) { continue; }
        let count = neighbor_mine_count(mines, coord);
        revealed.push((coord, count));
        if count == 0 {
            stack.extend(mines.neighbors(coord).filter(|&n| {
                state.visibility(n) == CellVisibility::Undiscovered && !mines.is_mine(n)
            }));
        }
    }

    tracing::debug!(?start, cells = revealed.len(), "revealed");
    RevealOutcome::Revealed(revealed)
}
