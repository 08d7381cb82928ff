use rand::Rng;

use crate::config::{board_capacity, GameConfig};
use crate::error::{GameError, Result};

/// Grid position as `(row, col)`, 0-based.
pub type Coord = (usize, usize);

/// Immutable mine layout of one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MineMap {
    width: usize,
    height: usize,
    nb_bombs: usize,
    mines: Vec<bool>,
}

impl MineMap {
    /// Places `nb_bombs` mines uniformly at random without replacement.
    ///
    /// Sparse boards use reject-and-resample: draw a cell, redraw if it already
    /// holds a mine. The expected number of redraws grows without bound as the
    /// board fills up, so past half density the positions are sampled directly
    /// from the set of all cells instead. Both give a uniform distribution over
    /// all `nb_bombs`-sized subsets.
    pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, nb_bombs: usize, rng: &mut R) -> Result<Self> {
        let config = GameConfig::new(width, height, nb_bombs)?;
        Ok(Self::from_config(&config, rng))
    }

    pub fn from_config<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let (width, height) = (config.width(), config.height());
        let total = config.cells();
        let mut mines = vec![false; total];

        if config.nb_bombs() * 2 > total {
            tracing::debug!(nb_bombs = config.nb_bombs(), total, "dense board, sampling positions");
            for pos in rand::seq::index::sample(rng, total, config.nb_bombs()) {
                mines[pos] = true;
            }
        } else {
            let mut remaining = config.nb_bombs();
            let mut redraws = 0usize;
            while remaining > 0 {
                let pos = idx(width, (rng.gen_range(0..height), rng.gen_range(0..width)));
                if mines[pos] { redraws += 1; continue; }
                mines[pos] = true;
                remaining -= 1;
            }
            tracing::debug!(nb_bombs = config.nb_bombs(), redraws, "placed mines by rejection sampling");
        }

        Self { width, height, nb_bombs: config.nb_bombs(), mines }
    }

    /// Builds a layout with mines exactly at `coords`. Duplicates count once.
    pub fn from_mines(width: usize, height: usize, coords: &[Coord]) -> Result<Self> {
        let mut mines = vec![false; board_capacity(width, height)?];
        for &(row, col) in coords {
            if row >= height || col >= width {
                return Err(GameError::MineOutOfBounds { row, col, width, height });
            }
            mines[idx(width, (row, col))] = true;
        }
        let nb_bombs = mines.iter().filter(|&&m| m).count();
        Ok(Self { width, height, nb_bombs, mines })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn nb_bombs(&self) -> usize { self.nb_bombs }

    pub fn contains(&self, (row, col): Coord) -> bool {
        row < self.height && col < self.width
    }

    /// `false` outside the grid.
    pub fn is_mine(&self, coord: Coord) -> bool {
        self.contains(coord) && self.mines[idx(self.width, coord)]
    }

    /// Coordinates of every mine, row-major.
    pub fn mines(&self) -> impl Iterator<Item = Coord> + '_ {
        self.mines
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(|(i, _)| (i / self.width, i % self.width))
    }

    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        neighbors(self.width, self.height, coord)
    }
}

pub(crate) fn idx(width: usize, (row, col): Coord) -> usize { row * width + col }

/// Up to eight adjacent cells, clamped to the grid.
pub fn neighbors(width: usize, height: usize, (row, col): Coord) -> impl Iterator<Item = Coord> {
    let rows = row.saturating_sub(1)..=(row + 1).min(height.saturating_sub(1));
    rows.flat_map(move |r| {
        let cols = col.saturating_sub(1)..=(col + 1).min(width.saturating_sub(1));
        cols.map(move |c| (r, c))
    })
    .filter(move |&n| n != (row, col))
}
