//! Sparse board storage with copy-on-write updates.
//!
//! The board is a map from a packed 64-bit coordinate key to a cell state.
//! Absence of a key means the cell is empty; an explicit `Empty` is never
//! stored. All updates return a new `Board` handle; unchanged boards share
//! the same underlying allocation, which callers can observe with
//! [`Board::ptr_eq`].

use std::collections::HashMap;
use std::sync::Arc;

/// One of the two players in a match.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player arrays (score, colors).
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Player number as shown to users (1 or 2).
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// State of a single intersection.
///
/// A captured point keeps its original owner and records who enclosed it.
/// Captured points stay on the board permanently and never revert.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,
    /// A placed point. `captured_by: None` means the point is still active;
    /// `Some(p)` means it was enclosed by `p` and no longer blocks anything.
    Point {
        owner: Player,
        captured_by: Option<Player>,
    },
    /// A formerly empty cell enclosed and owned by `owner`.
    Territory { owner: Player },
}

impl CellState {
    pub fn is_empty(self) -> bool {
        matches!(self, CellState::Empty)
    }

    /// Any point, active or captured. Points are never placeable.
    pub fn is_point(self) -> bool {
        matches!(self, CellState::Point { .. })
    }

    /// An active (uncaptured) point owned by `player`.
    pub fn is_active_point_of(self, player: Player) -> bool {
        matches!(
            self,
            CellState::Point { owner, captured_by: None } if owner == player
        )
    }
}

/// Packed board key: x in the high 32 bits, y in the low 32 bits.
///
/// The pack is total over any pair of `i32` components, negatives included,
/// so every stored key decodes back to a valid coordinate. The string-keyed
/// error class ("malformed key") does not exist in this representation.
pub type Key = u64;

/// Encode a coordinate pair into a board key.
#[inline]
pub fn to_key(x: i32, y: i32) -> Key {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

/// Decode a board key back into its coordinate pair.
#[inline]
pub fn from_key(key: Key) -> (i32, i32) {
    ((key >> 32) as u32 as i32, key as u32 as i32)
}

/// Sparse, immutable board. Cloning is cheap (shared storage); updates
/// copy the map once and return a new handle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: Arc<HashMap<Key, CellState>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at (x, y); missing keys read as empty. No bounds checking:
    /// out-of-range coordinates also read as empty, bounds are the
    /// caller's responsibility.
    pub fn get(&self, x: i32, y: i32) -> CellState {
        self.cells
            .get(&to_key(x, y))
            .copied()
            .unwrap_or(CellState::Empty)
    }

    /// Return a new board with the cell at (x, y) set. Setting `Empty`
    /// removes the key. Writes that change nothing (removing an absent key,
    /// rewriting the stored value) return a handle to the same storage.
    pub fn set(&self, x: i32, y: i32, state: CellState) -> Board {
        let key = to_key(x, y);
        match state {
            CellState::Empty => {
                if !self.cells.contains_key(&key) {
                    return self.clone();
                }
                let mut next = (*self.cells).clone();
                next.remove(&key);
                Board { cells: Arc::new(next) }
            }
            _ => {
                if self.cells.get(&key) == Some(&state) {
                    return self.clone();
                }
                let mut next = (*self.cells).clone();
                next.insert(key, state);
                Board { cells: Arc::new(next) }
            }
        }
    }

    /// Apply a batch of updates in one copy. Equivalent to sequential
    /// [`Board::set`] calls in list order (last write wins for duplicate
    /// coordinates); an empty batch returns the same storage.
    pub fn set_many(&self, updates: &[(i32, i32, CellState)]) -> Board {
        if updates.is_empty() {
            return self.clone();
        }
        let mut next = (*self.cells).clone();
        for &(x, y, state) in updates {
            let key = to_key(x, y);
            match state {
                CellState::Empty => {
                    next.remove(&key);
                }
                _ => {
                    next.insert(key, state);
                }
            }
        }
        Board { cells: Arc::new(next) }
    }

    /// True when both handles share the same underlying storage, i.e. one
    /// was produced from the other by a no-op update.
    pub fn ptr_eq(a: &Board, b: &Board) -> bool {
        Arc::ptr_eq(&a.cells, &b.cells)
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all non-empty cells in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), CellState)> + '_ {
        self.cells.iter().map(|(&k, &v)| (from_key(k), v))
    }

    /// Coordinates of all active points owned by `player`.
    pub fn active_points(&self, player: Player) -> Vec<(i32, i32)> {
        self.iter()
            .filter(|&(_, cell)| cell.is_active_point_of(player))
            .map(|(pt, _)| pt)
            .collect()
    }

    /// True when any active point of either player is on the board.
    pub fn has_active_points(&self) -> bool {
        self.iter()
            .any(|(_, cell)| matches!(cell, CellState::Point { captured_by: None, .. }))
    }
}
