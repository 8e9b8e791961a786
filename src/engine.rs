use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    Active,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Player commands accepted by [`Game::apply`]. `MarkRemainingMines` is
/// issued internally in the same command application that wins the round;
/// as an explicit command it only acts while the phase is `Won`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Reset,
    Reveal(CellIndex),
    RevealAdjacent(CellIndex),
    ToggleFlag(CellIndex),
    MarkRemainingMines,
}

/// Full state of one round. Commands never mutate a snapshot in place:
/// the state machine builds the next snapshot from a copy and swaps it in
/// wholesale, so a renderer may keep a stale snapshot without locking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    config: BoardConfig,
    phase: GamePhase,
    cells: Vec<Cell>,
    mines: MineSet,
    mines_placed: bool,
    revealed_count: CellCount,
    flagged_count: CellCount,
}

impl GameSnapshot {
    pub(crate) fn new(config: BoardConfig) -> Self {
        let cells = (0..config.total_cells())
            .map(|index| Cell::new(index, config.rows, config.columns))
            .collect();
        Self {
            config,
            phase: GamePhase::Idle,
            cells,
            mines: MineSet::empty(),
            mines_placed: false,
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    pub const fn config(&self) -> BoardConfig {
        self.config
    }

    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell_at(&self, index: CellIndex) -> Result<Cell> {
        let slot = self.validate_index(index)?;
        Ok(self.cells[slot])
    }

    pub const fn mines(&self) -> &MineSet {
        &self.mines
    }

    pub const fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub const fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub const fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// How many mines have not been flagged yet; negative when the board
    /// is over-flagged. Display clamping is the caller's decision.
    pub const fn mines_left(&self) -> isize {
        self.config.mines as isize - self.flagged_count as isize
    }

    /// Completion predicate: every non-mine cell revealed, independent of
    /// flag state.
    pub fn is_cleared(&self) -> bool {
        self.revealed_count == self.config.safe_cells()
    }

    fn validate_index(&self, index: CellIndex) -> Result<usize> {
        let slot = usize::from(index);
        if slot < self.cells.len() {
            Ok(slot)
        } else {
            Err(GameError::InvalidIndex {
                index,
                cells: self.config.total_cells(),
            })
        }
    }

    /// Installs the round's mine set and recomputes every cell's adjacency
    /// count from it. Statuses (e.g. flags placed before the first reveal)
    /// carry over.
    pub(crate) fn install_mines(&mut self, mines: MineSet) {
        debug_assert!(!self.mines_placed, "mine set is fixed for the round");

        for slot in 0..self.cells.len() {
            let cell = self.cells[slot];
            let count = cell
                .neighbor_indices()
                .filter(|&neighbor| mines.contains(neighbor))
                .count() as u8;
            self.cells[slot] = cell.with_adjacent_mines(count);
        }
        self.mines = mines;
        self.mines_placed = true;
    }

    pub(crate) fn reveal(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let slot = self.validate_index(index)?;
        if self.phase.is_over() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = self.reveal_cell(slot);
        Ok(self.settle(outcome))
    }

    pub(crate) fn reveal_adjacent(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let slot = self.validate_index(index)?;
        if self.phase.is_over() {
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.cells[slot];
        if cell.adjacent_mines() == 0 {
            return Ok(RevealOutcome::NoChange);
        }

        let mut flagged = 0u8;
        let mut hidden: SmallVec<[CellIndex; NEIGHBOR_SLOTS]> = SmallVec::new();
        for neighbor in cell.neighbor_indices() {
            match self.cells[usize::from(neighbor)].status() {
                CellStatus::Flagged => flagged += 1,
                CellStatus::Hidden => hidden.push(neighbor),
                _ => {}
            }
        }

        if flagged < cell.adjacent_mines() {
            return Ok(RevealOutcome::NoChange);
        }

        let mut outcome = RevealOutcome::NoChange;
        for neighbor in hidden {
            outcome = outcome | self.reveal_cell(usize::from(neighbor));
            if outcome == RevealOutcome::Exploded {
                // the loss stands; remaining neighbors stay untouched
                break;
            }
        }
        Ok(self.settle(outcome))
    }

    pub(crate) fn toggle_flag(&mut self, index: CellIndex) -> Result<FlagOutcome> {
        use CellStatus::*;

        let slot = self.validate_index(index)?;
        if self.phase.is_over() {
            return Ok(FlagOutcome::NoChange);
        }

        let cell = self.cells[slot];
        match cell.status() {
            Hidden => self.flagged_count += 1,
            Flagged => self.flagged_count -= 1,
            Question => {}
            Revealed | Exploded => return Ok(FlagOutcome::NoChange),
        }
        self.cells[slot] = cell.with_status(cell.status().cycled());
        self.mark_started();
        Ok(FlagOutcome::Changed)
    }

    /// Post-win completion step: flag whatever is still hidden or
    /// question-marked. Idempotent.
    pub(crate) fn mark_remaining_mines(&mut self) -> FlagOutcome {
        let mut outcome = FlagOutcome::NoChange;
        for slot in 0..self.cells.len() {
            let cell = self.cells[slot];
            if matches!(cell.status(), CellStatus::Hidden | CellStatus::Question) {
                self.cells[slot] = cell.with_status(CellStatus::Flagged);
                self.flagged_count += 1;
                outcome = FlagOutcome::Changed;
            }
        }
        outcome
    }

    /// Reveals one cell and cascades if it has no adjacent mines. Only
    /// `Revealed`/`Exploded` targets are exempt; a flagged or questioned
    /// cell is laid open like any other, consuming its marker.
    fn reveal_cell(&mut self, slot: usize) -> RevealOutcome {
        let cell = self.cells[slot];
        if cell.status().is_revealed() {
            return RevealOutcome::NoChange;
        }

        if self.mines.contains(cell.index()) {
            self.detonate(slot);
            return RevealOutcome::Exploded;
        }

        self.uncover(slot);
        self.mark_started();

        if cell.adjacent_mines() == 0 {
            self.cascade_from(slot);
        }
        RevealOutcome::Revealed
    }

    /// Completion check, run once per top-level reveal after any cascade
    /// has settled. Winning triggers the auto-flag step in the same
    /// command application.
    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        if outcome == RevealOutcome::Revealed && self.is_cleared() {
            self.phase = GamePhase::Won;
            log::debug!("all {} safe cells revealed, round won", self.revealed_count);
            self.mark_remaining_mines();
            RevealOutcome::Won
        } else {
            outcome
        }
    }

    /// Work-queue flood fill over the zero-adjacency region; stack depth
    /// stays flat no matter the board size.
    fn cascade_from(&mut self, origin: usize) {
        let origin_cell = self.cells[origin];

        let mut visited = HashSet::new();
        visited.insert(origin_cell.index());
        let mut to_visit: VecDeque<CellIndex> = origin_cell
            .neighbor_indices()
            .filter(|&pos| self.cells[usize::from(pos)].status().is_unrevealed())
            .collect();
        log::trace!(
            "cascade from {}, seed queue {:?}",
            origin_cell.index(),
            to_visit
        );

        while let Some(index) = to_visit.pop_front() {
            if !visited.insert(index) {
                continue;
            }

            let slot = usize::from(index);
            if self.cells[slot].status().is_revealed() {
                continue;
            }

            self.uncover(slot);
            let uncovered = self.cells[slot];
            log::trace!(
                "cascade revealed {}, adjacent mines {}",
                index,
                uncovered.adjacent_mines()
            );

            if uncovered.adjacent_mines() == 0 {
                to_visit.extend(
                    uncovered
                        .neighbor_indices()
                        .filter(|&pos| self.cells[usize::from(pos)].status().is_unrevealed())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    /// Marks one non-mine cell revealed, keeping the cached counters exact.
    fn uncover(&mut self, slot: usize) {
        let cell = self.cells[slot];
        if cell.status() == CellStatus::Flagged {
            self.flagged_count -= 1;
        }
        self.cells[slot] = cell.with_status(CellStatus::Revealed);
        self.revealed_count += 1;
    }

    /// Loss path: the clicked mine explodes, every other mine is laid
    /// open, and the phase turns terminal.
    fn detonate(&mut self, slot: usize) {
        let clicked = self.cells[slot].index();
        log::debug!("mine hit at {}, round lost", clicked);

        for index in self.mines.iter() {
            let mine_slot = usize::from(index);
            let cell = self.cells[mine_slot];
            if cell.status() == CellStatus::Flagged {
                self.flagged_count -= 1;
            }
            if index == clicked {
                self.cells[mine_slot] = cell.with_status(CellStatus::Exploded);
            } else {
                self.cells[mine_slot] = cell.with_status(CellStatus::Revealed);
                self.revealed_count += 1;
            }
        }
        self.phase = GamePhase::Lost;
    }

    fn mark_started(&mut self) {
        if self.phase.is_idle() {
            self.phase = GamePhase::Active;
        }
    }
}

/// The round-level state machine and single owner of the current snapshot.
/// Each command builds the next snapshot from a copy and installs it only
/// on success, so a failed command leaves the previous snapshot intact and
/// snapshots already handed out are never mutated.
#[derive(Clone, Debug)]
pub struct Game<P> {
    placer: P,
    snapshot: GameSnapshot,
}

impl<P: MinePlacer> Game<P> {
    pub fn new(config: BoardConfig, placer: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            placer,
            snapshot: GameSnapshot::new(config),
        })
    }

    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }

    pub fn config(&self) -> BoardConfig {
        self.snapshot.config()
    }

    /// Single command entry point. The per-command methods below expose
    /// the finer-grained outcomes.
    pub fn apply(&mut self, command: Command) -> Result<&GameSnapshot> {
        match command {
            Command::Reset => self.reset(),
            Command::Reveal(index) => {
                self.reveal(index)?;
            }
            Command::RevealAdjacent(index) => {
                self.reveal_adjacent(index)?;
            }
            Command::ToggleFlag(index) => {
                self.toggle_flag(index)?;
            }
            Command::MarkRemainingMines => {
                self.mark_remaining_mines();
            }
        }
        Ok(&self.snapshot)
    }

    /// Rebuilds a fresh snapshot for the current board; accepted from any
    /// phase.
    pub fn reset(&mut self) {
        self.snapshot = GameSnapshot::new(self.snapshot.config());
    }

    /// Switches to a new board layout, which is always a reset.
    pub fn set_config(&mut self, config: BoardConfig) -> Result<()> {
        config.validate()?;
        self.snapshot = GameSnapshot::new(config);
        Ok(())
    }

    pub fn reveal(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let mut next = self.snapshot.clone();
        if !next.mines_placed() {
            // reject a bad index before any randomness is consumed
            next.validate_index(index)?;
            let mines = self.placer.place(next.config(), index)?;
            next.install_mines(mines);
        }
        let outcome = next.reveal(index)?;
        self.snapshot = next;
        Ok(outcome)
    }

    pub fn reveal_adjacent(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        let mut next = self.snapshot.clone();
        let outcome = next.reveal_adjacent(index)?;
        self.snapshot = next;
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<FlagOutcome> {
        let mut next = self.snapshot.clone();
        let outcome = next.toggle_flag(index)?;
        self.snapshot = next;
        Ok(outcome)
    }

    /// Explicit re-issue of the post-win auto-flag step; a no-op in every
    /// other phase.
    pub fn mark_remaining_mines(&mut self) -> FlagOutcome {
        if self.snapshot.phase() != GamePhase::Won {
            return FlagOutcome::NoChange;
        }
        let mut next = self.snapshot.clone();
        let outcome = next.mark_remaining_mines();
        self.snapshot = next;
        outcome
    }
}
