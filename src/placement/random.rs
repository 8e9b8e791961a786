use hashbrown::HashSet;
use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};

use super::*;

/// Uniform placement by rejection sampling without replacement: draw from
/// `[0, total_cells)`, skip the excluded index, repeat until the target
/// count is reached. The config is validated up front so the loop always
/// terminates.
///
/// The placer owns its rng, so consecutive rounds produce different
/// layouts while the whole sequence stays reproducible from the seed.
#[derive(Clone, Debug)]
pub struct RandomMinePlacer {
    rng: SmallRng,
}

impl RandomMinePlacer {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place(&mut self, config: BoardConfig, excluded: CellIndex) -> Result<MineSet> {
        config.validate()?;

        let cells = config.total_cells();
        if excluded >= cells {
            return Err(GameError::InvalidIndex {
                index: excluded,
                cells,
            });
        }

        let mut indices = HashSet::with_capacity(config.mines.into());
        while indices.len() < usize::from(config.mines) {
            let candidate = self.rng.random_range(0..cells);
            if candidate == excluded {
                continue;
            }
            indices.insert(candidate);
        }

        log::debug!(
            "placed {} mines on {} cells, kept {} safe",
            config.mines,
            cells,
            excluded
        );
        Ok(MineSet::from_set(indices))
    }
}
