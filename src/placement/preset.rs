use alloc::vec::Vec;

use super::*;

/// Replays a fixed layout, for tests and recorded rounds. The layout is
/// used as-is: the excluded index is deliberately ignored, so the
/// first-click guarantee rests with whoever recorded the layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresetMinePlacer {
    indices: Vec<CellIndex>,
}

impl PresetMinePlacer {
    pub fn new<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = CellIndex>,
    {
        Self {
            indices: indices.into_iter().collect(),
        }
    }
}

impl MinePlacer for PresetMinePlacer {
    fn place(&mut self, config: BoardConfig, _excluded: CellIndex) -> Result<MineSet> {
        config.validate()?;
        let mines = MineSet::from_indices(config, self.indices.iter().copied())?;
        debug_assert_eq!(mines.len(), config.mines, "layout does not match the config");
        Ok(mines)
    }
}
