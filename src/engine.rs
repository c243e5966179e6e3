use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of cells on the board (4 rows x 4 columns, row-major).
pub const CELLS: usize = 16;
/// Length of one row or column.
pub const LINE: usize = 4;

/// Errors raised by the engine. Legal no-op slides never error; callers that
/// need to distinguish "nothing happened" use [`Board::can_slide`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("cell index {0} out of range 0..16")]
    IndexOutOfRange(usize),
    #[error("spawn onto occupied cell {index}")]
    OccupiedCellSpawn { index: usize },
    #[error("invalid direction index {0}, expected 0..4")]
    InvalidDirection(u8),
}

/// A direction to slide/merge tiles.
///
/// The discriminants (Up = 0, Right = 1, Down = 2, Left = 3) are the action
/// indices seen by an agent, and index into 4-wide legality masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in action-index order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Linear index offset of one step toward this direction's edge.
    #[inline]
    pub const fn delta(self) -> isize {
        match self {
            Direction::Up => -4,
            Direction::Right => 1,
            Direction::Down => 4,
            Direction::Left => -1,
        }
    }

    /// The four cells on this direction's far edge, one per line. Scans
    /// originate here and walk inward against `delta`.
    #[inline]
    pub const fn starting_indices(self) -> [usize; 4] {
        match self {
            Direction::Up => [0, 1, 2, 3],
            Direction::Right => [3, 7, 11, 15],
            Direction::Down => [12, 13, 14, 15],
            Direction::Left => [0, 4, 8, 12],
        }
    }

    /// Action index of this direction (position in 4-wide masks).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, GameError> {
        match value {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Right),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Left),
            other => Err(GameError::InvalidDirection(other)),
        }
    }
}

/// 4x4 2048 board storing tile exponents: cell value `n` is the displayed
/// tile `2^n`, 0 is empty.
///
/// The board is the single owned resource of an episode; it is reset in
/// place, never reallocated.
///
/// ```
/// use rl_2048::engine::{Board, Direction};
///
/// let mut b = Board::from_cells([
///     1, 1, 0, 0,
///     0, 0, 0, 0,
///     0, 0, 0, 0,
///     0, 0, 0, 0,
/// ]);
/// b.slide(Direction::Left);
/// assert_eq!(b.get(0), Ok(2)); // 2 + 2 merged into 4
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [u8; CELLS],
}

impl Board {
    /// A constant empty board.
    pub const EMPTY: Board = Board { cells: [0; CELLS] };

    /// Construct a board from explicit exponents, row-major.
    #[inline]
    pub const fn from_cells(cells: [u8; CELLS]) -> Self {
        Board { cells }
    }

    /// Copy out the exponents, row-major.
    #[inline]
    pub const fn cells(&self) -> [u8; CELLS] {
        self.cells
    }

    /// Reset every cell to empty without reallocating.
    #[inline]
    pub fn clear(&mut self) {
        self.cells = [0; CELLS];
    }

    /// Read the exponent at a linear index.
    #[inline]
    pub fn get(&self, idx: usize) -> Result<u8, GameError> {
        self.cells
            .get(idx)
            .copied()
            .ok_or(GameError::IndexOutOfRange(idx))
    }

    /// Write the exponent at a linear index.
    #[inline]
    pub fn set(&mut self, idx: usize, exponent: u8) -> Result<(), GameError> {
        match self.cells.get_mut(idx) {
            Some(cell) => {
                *cell = exponent;
                Ok(())
            }
            None => Err(GameError::IndexOutOfRange(idx)),
        }
    }

    /// Count the number of empty cells.
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 0).count()
    }

    /// Highest displayed tile value on the board (0 for an empty board).
    pub fn highest_tile(&self) -> u32 {
        match self.cells.iter().max() {
            Some(0) | None => 0,
            Some(&exp) => 1u32 << exp,
        }
    }

    /// Slide and merge all tiles one move toward `dir`, mutating in place.
    ///
    /// Each line is scanned from its far-edge starting cell inward; every
    /// tile advances toward the edge until blocked, merging at most once per
    /// call (three equal tiles yield one merged pair plus one survivor).
    /// Sliding an immovable configuration is a silent no-op.
    pub fn slide(&mut self, dir: Direction) {
        let delta = dir.delta();
        for &start in dir.starting_indices().iter() {
            // Merge markers are scoped to one line of one slide call,
            // indexed by distance from the starting cell.
            let mut merged = [false; LINE];
            for offset in 1..LINE {
                let mut idx = (start as isize - delta * offset as isize) as usize;
                if self.cells[idx] == 0 {
                    continue;
                }
                let mut pos = offset;
                for _ in 0..offset {
                    let next = (idx as isize + delta) as usize;
                    if self.cells[next] == 0 {
                        self.cells[next] = self.cells[idx];
                        self.cells[idx] = 0;
                        idx = next;
                        pos -= 1;
                    } else if self.cells[next] == self.cells[idx] && !merged[pos - 1] {
                        self.cells[next] += 1;
                        self.cells[idx] = 0;
                        merged[pos - 1] = true;
                        break;
                    } else {
                        break;
                    }
                }
            }
        }
    }

    /// True if sliding toward `dir` would change the board. Read-only.
    pub fn can_slide(&self, dir: Direction) -> bool {
        let delta = dir.delta();
        for &start in dir.starting_indices().iter() {
            for offset in 1..LINE {
                let idx = (start as isize - delta * offset as isize) as usize;
                if self.cells[idx] == 0 {
                    continue;
                }
                let next = (idx as isize + delta) as usize;
                if self.cells[next] == 0 || self.cells[next] == self.cells[idx] {
                    return true;
                }
            }
        }
        false
    }

    /// Per-direction legality, indexed by [`Direction::index`].
    pub fn legal_mask(&self) -> [bool; 4] {
        let mut mask = [false; 4];
        for dir in Direction::ALL {
            mask[dir.index()] = self.can_slide(dir);
        }
        mask
    }

    /// True if no direction can slide.
    pub fn is_game_over(&self) -> bool {
        Direction::ALL.iter().all(|&dir| !self.can_slide(dir))
    }

    /// Place a tile of `exponent` on the empty cell `idx`.
    ///
    /// Fails with [`GameError::OccupiedCellSpawn`] if the cell already holds
    /// a tile; the board is untouched on any error.
    pub fn place(&mut self, idx: usize, exponent: u8) -> Result<(), GameError> {
        match self.cells.get_mut(idx) {
            Some(cell) if *cell == 0 => {
                *cell = exponent;
                Ok(())
            }
            Some(_) => Err(GameError::OccupiedCellSpawn { index: idx }),
            None => Err(GameError::IndexOutOfRange(idx)),
        }
    }

    /// Draw a spawn: a uniformly random empty cell and exponent 1 (90%) or
    /// 2 (10%). Returns `None` on a full board. Does not mutate; pair with
    /// [`Board::place`].
    pub fn random_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, u8)> {
        let empty = self.count_empty();
        if empty == 0 {
            return None;
        }
        let mut pick = rng.gen_range(0..empty);
        let mut cell = 0;
        for (idx, &c) in self.cells.iter().enumerate() {
            if c == 0 {
                if pick == 0 {
                    cell = idx;
                    break;
                }
                pick -= 1;
            }
        }
        let exponent = if rng.gen_range(0..10) < 9 { 1 } else { 2 };
        Some((cell, exponent))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.cells)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..LINE {
            for column in 0..LINE {
                if column > 0 {
                    write!(f, " ")?;
                }
                match self.cells[row * LINE + column] {
                    0 => write!(f, "{:>6}", "_")?,
                    exp => write!(f, "{:>6}", 1u32 << exp)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
