#![no_std]

extern crate alloc;

use core::ops::BitOr;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use placement::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod placement;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: Coord,
    pub columns: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub const fn new_unchecked(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self {
            rows,
            columns,
            mines,
        }
    }

    /// Clamps dimensions to at least one cell; the mine budget is checked
    /// separately by [`BoardConfig::validate`].
    pub fn new(rows: Coord, columns: Coord, mines: CellCount) -> Self {
        Self::new_unchecked(rows.max(1), columns.max(1), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.columns)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// At least one cell must stay safe so the first move can always land
    /// on a non-mine.
    pub fn validate(&self) -> Result<()> {
        let cells = self.total_cells();
        if cells == 0 || self.mines > cells - 1 {
            return Err(GameError::TooManyMines {
                mines: self.mines,
                cells,
            });
        }
        Ok(())
    }
}

/// Mine positions of one round. Only membership matters; the set is fixed
/// for the lifetime of the round once placed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineSet {
    indices: HashSet<CellIndex>,
}

impl MineSet {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_set(indices: HashSet<CellIndex>) -> Self {
        Self { indices }
    }

    /// Builds a layout from explicit indices, rejecting any outside the
    /// board. Duplicates collapse.
    pub fn from_indices<I>(config: BoardConfig, indices: I) -> Result<Self>
    where
        I: IntoIterator<Item = CellIndex>,
    {
        let cells = config.total_cells();
        let mut set = HashSet::new();
        for index in indices {
            if index >= cells {
                return Err(GameError::InvalidIndex { index, cells });
            }
            set.insert(index);
        }
        Ok(Self::from_set(set))
    }

    pub fn len(&self) -> CellCount {
        self.indices.len().try_into().unwrap()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        self.indices.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.indices.iter().copied()
    }
}

/// Outcome of a flag-cycling command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of a reveal command, single-cell or chorded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Exploded,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Exploded => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when a chord reveals several neighbors.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (Exploded, _) => Exploded,
            (_, Exploded) => Exploded,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
