use sapper_core::{
    BoardConfig, CellStatus, Command, FlagOutcome, Game, GameError, GamePhase, MinePlacer,
    PresetMinePlacer, RandomMinePlacer, RevealOutcome,
};

fn preset_game(config: BoardConfig, mines: &[u16]) -> Game<PresetMinePlacer> {
    Game::new(config, PresetMinePlacer::new(mines.iter().copied())).unwrap()
}

#[test]
fn first_reveal_is_never_a_mine_across_seeds() {
    let config = BoardConfig::new(9, 9, 10);

    for seed in 0..50 {
        let mut game = Game::new(config, RandomMinePlacer::from_seed(seed)).unwrap();
        game.apply(Command::Reveal(40)).unwrap();

        let snapshot = game.snapshot();
        assert_ne!(snapshot.phase(), GamePhase::Lost, "seed {seed}");
        assert!(!snapshot.mines().contains(40), "seed {seed}");
        assert_eq!(snapshot.mines().len(), 10, "seed {seed}");
    }
}

#[test]
fn first_reveal_is_safe_even_when_only_one_cell_can_be() {
    // 8 mines on 9 cells: the single safe cell is the one clicked, so the
    // first move wins outright
    let config = BoardConfig::new(3, 3, 8);

    for seed in 0..20 {
        let mut game = Game::new(config, RandomMinePlacer::from_seed(seed)).unwrap();
        game.apply(Command::Reveal(4)).unwrap();

        assert_eq!(game.snapshot().phase(), GamePhase::Won, "seed {seed}");
    }
}

#[test]
fn mine_set_never_changes_after_placement() {
    let config = BoardConfig::new(9, 9, 10);
    let mut game = Game::new(config, RandomMinePlacer::from_seed(7)).unwrap();

    game.apply(Command::Reveal(0)).unwrap();
    let placed = game.snapshot().mines().clone();

    game.apply(Command::ToggleFlag(80)).unwrap();
    game.apply(Command::Reveal(72)).unwrap();
    game.apply(Command::RevealAdjacent(0)).unwrap();

    assert_eq!(*game.snapshot().mines(), placed);
    assert_eq!(placed.len(), 10);
}

#[test]
fn revealing_an_already_revealed_cell_changes_nothing() {
    let mut game = preset_game(BoardConfig::new(3, 3, 2), &[0, 8]);

    game.apply(Command::Reveal(2)).unwrap();
    let once = game.snapshot().clone();

    let outcome = game.reveal(2).unwrap();

    assert_eq!(outcome, RevealOutcome::NoChange);
    assert_eq!(*game.snapshot(), once);
}

#[test]
fn cascade_opens_the_zero_region_and_its_numbered_border() {
    // mines along the east edge of a 5x5 board; the west side is one big
    // zero region whose border carries the numbers
    let config = BoardConfig::new(5, 5, 5);
    let mines = [4, 9, 14, 19, 24];
    let mut game = preset_game(config, &mines);

    let outcome = game.reveal(0).unwrap();

    assert_eq!(outcome, RevealOutcome::Won);
    let snapshot = game.snapshot();
    for cell in snapshot.cells() {
        if mines.contains(&cell.index()) {
            // no mine was opened by the cascade; the win flagged them
            assert_eq!(cell.status(), CellStatus::Flagged);
        } else {
            assert_eq!(cell.status(), CellStatus::Revealed);
            let row = cell.index() / 5;
            let column = cell.index() % 5;
            let expected = match column {
                3 if row == 0 || row == 4 => 2,
                3 => 3,
                _ => 0,
            };
            assert_eq!(cell.adjacent_mines(), expected, "cell {}", cell.index());
        }
    }
}

#[test]
fn win_requires_every_safe_cell_even_the_flagged_ones() {
    // 2x2 with one mine: three safe cells
    let mut game = preset_game(BoardConfig::new(2, 2, 1), &[3]);

    game.reveal(0).unwrap();
    game.reveal(1).unwrap();
    assert_eq!(game.snapshot().phase(), GamePhase::Active);

    // flagging the last safe cell does not win; revealing it does, flag
    // or not
    game.toggle_flag(2).unwrap();
    assert_eq!(game.snapshot().phase(), GamePhase::Active);

    let outcome = game.reveal(2).unwrap();
    assert_eq!(outcome, RevealOutcome::Won);
    assert!(game.snapshot().is_cleared());
    assert_eq!(game.snapshot().flagged_count(), 1);
    assert_eq!(
        game.snapshot().cell_at(3).unwrap().status(),
        CellStatus::Flagged
    );
}

#[test]
fn loss_marks_the_clicked_mine_apart_from_the_rest() {
    let mut game = preset_game(BoardConfig::new(4, 4, 3), &[0, 5, 15]);

    game.reveal(3).unwrap();
    game.reveal(5).unwrap();

    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase(), GamePhase::Lost);
    assert_eq!(snapshot.cell_at(5).unwrap().status(), CellStatus::Exploded);
    assert_eq!(snapshot.cell_at(0).unwrap().status(), CellStatus::Revealed);
    assert_eq!(snapshot.cell_at(15).unwrap().status(), CellStatus::Revealed);
}

#[test]
fn replayed_layout_can_lose_on_the_first_reveal() {
    // the preset placer replays layouts verbatim, so a recorded round may
    // open straight onto a mine
    let mut game = preset_game(BoardConfig::new(3, 3, 1), &[8]);

    game.apply(Command::Reveal(8)).unwrap();

    let snapshot = game.snapshot();
    assert_eq!(snapshot.phase(), GamePhase::Lost);
    assert_eq!(snapshot.cell_at(8).unwrap().status(), CellStatus::Exploded);
    assert_eq!(snapshot.revealed_count(), 0);
}

#[test]
fn terminal_loss_accepts_only_reset() {
    let mut game = preset_game(BoardConfig::new(2, 2, 1), &[3]);
    game.reveal(0).unwrap();
    game.reveal(3).unwrap();
    let lost = game.snapshot().clone();

    for command in [
        Command::Reveal(1),
        Command::RevealAdjacent(0),
        Command::ToggleFlag(1),
        Command::MarkRemainingMines,
    ] {
        game.apply(command).unwrap();
        assert_eq!(*game.snapshot(), lost);
    }

    game.apply(Command::Reset).unwrap();
    assert_eq!(game.snapshot().phase(), GamePhase::Idle);
    assert_eq!(game.snapshot().revealed_count(), 0);
}

#[test]
fn three_flag_toggles_close_the_cycle() {
    let mut game = preset_game(BoardConfig::new(3, 3, 1), &[8]);
    let statuses = |game: &Game<PresetMinePlacer>| game.snapshot().cell_at(2).unwrap().status();

    game.apply(Command::ToggleFlag(2)).unwrap();
    assert_eq!(statuses(&game), CellStatus::Flagged);
    assert_eq!(game.snapshot().mines_left(), 0);

    game.apply(Command::ToggleFlag(2)).unwrap();
    assert_eq!(statuses(&game), CellStatus::Question);
    assert_eq!(game.snapshot().mines_left(), 1);

    game.apply(Command::ToggleFlag(2)).unwrap();
    assert_eq!(statuses(&game), CellStatus::Hidden);
    assert_eq!(game.snapshot().flagged_count(), 0);
}

#[test]
fn over_flagging_drives_the_mine_counter_negative() {
    let mut game = preset_game(BoardConfig::new(3, 3, 1), &[8]);

    game.toggle_flag(0).unwrap();
    game.toggle_flag(1).unwrap();

    assert_eq!(game.snapshot().mines_left(), -1);
}

#[test]
fn chord_is_a_no_op_below_the_flag_threshold_and_on_zero_cells() {
    let mut game = preset_game(BoardConfig::new(3, 3, 2), &[3, 5]);
    game.reveal(4).unwrap();
    game.toggle_flag(3).unwrap();

    // one flag against a count of two
    assert_eq!(game.reveal_adjacent(4).unwrap(), RevealOutcome::NoChange);

    // zero-count cells never chord, placed or not
    let mut fresh = preset_game(BoardConfig::new(3, 3, 2), &[3, 5]);
    assert_eq!(fresh.reveal_adjacent(4).unwrap(), RevealOutcome::NoChange);
    assert_eq!(fresh.snapshot().phase(), GamePhase::Idle);
}

#[test]
fn oversized_mine_budget_is_a_config_error() {
    let config = BoardConfig::new(3, 3, 9);

    let result = Game::new(config, RandomMinePlacer::from_seed(0));

    assert_eq!(
        result.err(),
        Some(GameError::TooManyMines { mines: 9, cells: 9 })
    );

    // one less is the densest legal board
    assert!(Game::new(BoardConfig::new(3, 3, 8), RandomMinePlacer::from_seed(0)).is_ok());
}

#[test]
fn stale_index_fails_without_touching_the_round() {
    let mut game = preset_game(BoardConfig::new(3, 3, 1), &[8]);
    game.reveal(0).unwrap();
    let before = game.snapshot().clone();

    assert_eq!(
        game.reveal(9),
        Err(GameError::InvalidIndex { index: 9, cells: 9 })
    );
    assert_eq!(
        game.toggle_flag(200),
        Err(GameError::InvalidIndex {
            index: 200,
            cells: 9
        })
    );
    assert_eq!(*game.snapshot(), before);
}

#[test]
fn snapshots_handed_out_earlier_are_never_mutated() {
    let mut game = preset_game(BoardConfig::new(3, 3, 2), &[0, 8]);
    let idle = game.snapshot().clone();

    game.apply(Command::Reveal(2)).unwrap();

    assert_eq!(idle.phase(), GamePhase::Idle);
    assert!(idle.cells().iter().all(|cell| cell.status() == CellStatus::Hidden));
    assert_ne!(*game.snapshot(), idle);
}

#[test]
fn explicit_mark_remaining_mines_only_acts_after_a_win() {
    let mut game = preset_game(BoardConfig::new(2, 2, 1), &[3]);

    // not won yet: nothing happens
    game.apply(Command::MarkRemainingMines).unwrap();
    assert_eq!(game.snapshot().flagged_count(), 0);

    game.reveal(0).unwrap();
    game.reveal(1).unwrap();
    game.reveal(2).unwrap();
    assert_eq!(game.snapshot().phase(), GamePhase::Won);
    assert_eq!(
        game.snapshot().cell_at(3).unwrap().status(),
        CellStatus::Flagged
    );

    // re-issuing is a defined no-op
    assert_eq!(game.mark_remaining_mines(), FlagOutcome::NoChange);
}

#[test]
fn cell_counts_match_a_recount_of_the_mine_set() {
    let config = BoardConfig::new(8, 8, 10);
    let mut game = Game::new(config, RandomMinePlacer::from_seed(999)).unwrap();
    game.apply(Command::Reveal(0)).unwrap();

    let snapshot = game.snapshot();
    for cell in snapshot.cells() {
        let recount = cell
            .neighbor_indices()
            .filter(|&neighbor| snapshot.mines().contains(neighbor))
            .count();
        assert_eq!(
            usize::from(cell.adjacent_mines()),
            recount,
            "cell {}",
            cell.index()
        );
    }
}

#[test]
fn snapshot_round_trips_through_serde() {
    let mut game = preset_game(BoardConfig::new(3, 3, 2), &[3, 5]);
    game.reveal(4).unwrap();
    game.toggle_flag(3).unwrap();

    let encoded = serde_json::to_string(game.snapshot()).unwrap();
    let decoded: sapper_core::GameSnapshot = serde_json::from_str(&encoded).unwrap();

    assert_eq!(decoded, *game.snapshot());
}

#[test]
fn custom_placers_plug_into_the_state_machine() {
    // a placer that always fills the last row, regardless of the click
    struct LastRow;

    impl MinePlacer for LastRow {
        fn place(
            &mut self,
            config: BoardConfig,
            _excluded: u16,
        ) -> Result<sapper_core::MineSet, GameError> {
            let cells = config.total_cells();
            let columns = u16::from(config.columns);
            sapper_core::MineSet::from_indices(config, (cells - columns)..cells)
        }
    }

    let mut game = Game::new(BoardConfig::new(3, 3, 3), LastRow).unwrap();
    game.apply(Command::Reveal(0)).unwrap();

    assert!(game.snapshot().mines().contains(6));
    assert!(game.snapshot().mines().contains(7));
    assert!(game.snapshot().mines().contains(8));
}
