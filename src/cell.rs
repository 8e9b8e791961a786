use serde::{Deserialize, Serialize};

use crate::types::{CellIndex, Coord, NEIGHBOR_SLOTS, neighbor_matrix};

/// Player-visible state of a single cell. `Exploded` marks only the one
/// mine that ended a lost round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    Hidden,
    Flagged,
    Question,
    Revealed,
    Exploded,
}

impl CellStatus {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::Question)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed | Self::Exploded)
    }

    /// Next marker in the flag cycle. Revealed cells do not cycle.
    pub const fn cycled(self) -> Self {
        match self {
            Self::Hidden => Self::Flagged,
            Self::Flagged => Self::Question,
            Self::Question => Self::Hidden,
            Self::Revealed => Self::Revealed,
            Self::Exploded => Self::Exploded,
        }
    }
}

impl Default for CellStatus {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One grid position as an immutable value: its identity, its fixed
/// compass-ordered neighbor matrix, the mine-adjacency count derived from
/// the round's mine set, and the current status. Changes go through the
/// `with_*` constructors so prior snapshots stay valid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    index: CellIndex,
    adjacent_mines: u8,
    neighbors: [Option<CellIndex>; NEIGHBOR_SLOTS],
    status: CellStatus,
}

impl Cell {
    /// Fresh hidden cell with its neighbor matrix computed and no mines
    /// counted yet.
    pub fn new(index: CellIndex, rows: Coord, columns: Coord) -> Self {
        Self {
            index,
            adjacent_mines: 0,
            neighbors: neighbor_matrix(index, rows, columns),
            status: CellStatus::Hidden,
        }
    }

    pub const fn index(&self) -> CellIndex {
        self.index
    }

    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn status(&self) -> CellStatus {
        self.status
    }

    pub const fn neighbors(&self) -> &[Option<CellIndex>; NEIGHBOR_SLOTS] {
        &self.neighbors
    }

    /// In-bounds neighbor indices in compass order.
    pub fn neighbor_indices(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.neighbors.iter().copied().flatten()
    }

    #[must_use]
    pub const fn with_status(mut self, status: CellStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub const fn with_adjacent_mines(mut self, adjacent_mines: u8) -> Self {
        self.adjacent_mines = adjacent_mines;
        self
    }
}
