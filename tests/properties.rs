//! Property-based tests for the slide/merge engine and episode protocol.

use proptest::prelude::*;
use rl_2048::engine::{Board, Direction, GameError, CELLS};
use rl_2048::episode::{Episode, TurnKind};

fn arb_board() -> impl Strategy<Value = Board> {
    proptest::array::uniform16(0u8..=11).prop_map(Board::from_cells)
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Right),
        Just(Direction::Down),
        Just(Direction::Left),
    ]
}

fn count_nonzero(b: &Board) -> usize {
    CELLS - b.count_empty()
}

proptest! {
    /// A slide changes the board iff the legality oracle said it could.
    #[test]
    fn slide_changes_board_iff_can_slide(board in arb_board(), dir in arb_direction()) {
        let can = board.can_slide(dir);
        let mut slid = board;
        slid.slide(dir);
        prop_assert_eq!(can, slid != board);
    }

    /// Sliding never adds tiles; it removes exactly one tile per merge.
    #[test]
    fn slide_never_increases_tile_count(board in arb_board(), dir in arb_direction()) {
        let before = count_nonzero(&board);
        let mut slid = board;
        slid.slide(dir);
        prop_assert!(count_nonzero(&slid) <= before);
    }

    /// Merges conserve total tile mass: sum of 2^exp is invariant under slides.
    #[test]
    fn slide_conserves_tile_mass(board in arb_board(), dir in arb_direction()) {
        let mass = |b: &Board| -> u64 {
            b.cells().iter().map(|&e| if e == 0 { 0 } else { 1u64 << e }).sum()
        };
        let mut slid = board;
        slid.slide(dir);
        prop_assert_eq!(mass(&slid), mass(&board));
    }

    /// Repeated slides in one direction reach a fixpoint. Each changing
    /// slide after the first must merge at least one pair, and a 4-cell line
    /// supports at most three merges, so 8 iterations is more than enough.
    #[test]
    fn slide_reaches_a_fixpoint(board in arb_board(), dir in arb_direction()) {
        let mut b = board;
        for _ in 0..8 {
            b.slide(dir);
        }
        let frozen = b;
        b.slide(dir);
        prop_assert_eq!(b, frozen);
    }

    /// Horizontal slides act on each row independently: a row changes iff
    /// that row, taken alone, could slide.
    #[test]
    fn horizontal_slide_is_row_local(board in arb_board(), horizontal in prop_oneof![Just(Direction::Left), Just(Direction::Right)]) {
        let mut slid = board;
        slid.slide(horizontal);
        let before = board.cells();
        let after = slid.cells();
        for row in 0..4 {
            let row_changed = (0..4).any(|c| before[row * 4 + c] != after[row * 4 + c]);
            let row_board = {
                let mut cells = [0u8; CELLS];
                cells[row * 4..row * 4 + 4].copy_from_slice(&before[row * 4..row * 4 + 4]);
                Board::from_cells(cells)
            };
            prop_assert_eq!(row_changed, row_board.can_slide(horizontal));
        }
    }

    /// place on an empty cell adds exactly that tile and nothing else.
    #[test]
    fn place_touches_exactly_one_cell(board in arb_board(), idx in 0usize..CELLS, exp in 1u8..=2) {
        let mut placed = board;
        match placed.place(idx, exp) {
            Ok(()) => {
                prop_assert_eq!(board.get(idx), Ok(0));
                prop_assert_eq!(placed.get(idx), Ok(exp));
                for other in (0..CELLS).filter(|&i| i != idx) {
                    prop_assert_eq!(placed.get(other), board.get(other));
                }
            }
            Err(GameError::OccupiedCellSpawn { index }) => {
                prop_assert_eq!(index, idx);
                prop_assert_ne!(board.get(idx), Ok(0));
                prop_assert_eq!(placed, board);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// is_game_over is exactly "no direction can slide".
    #[test]
    fn game_over_is_conjunction_over_directions(board in arb_board()) {
        let stuck = Direction::ALL.iter().all(|&d| !board.can_slide(d));
        prop_assert_eq!(board.is_game_over(), stuck);
    }

    /// can_slide never mutates.
    #[test]
    fn legality_oracle_is_read_only(board in arb_board(), dir in arb_direction()) {
        let copy = board;
        let _ = copy.can_slide(dir);
        let _ = copy.legal_mask();
        let _ = copy.is_game_over();
        prop_assert_eq!(copy, board);
    }

    /// The same nonzero seed and action script reproduce identical episodes.
    #[test]
    fn seeded_episodes_are_reproducible(seed in 1u64..u64::MAX, script in proptest::collection::vec(arb_direction(), 1..40)) {
        let run = |script: &[Direction]| {
            let mut ep = Episode::new();
            ep.reset(seed);
            let mut boards = vec![ep.board().cells()];
            for &dir in script {
                if ep.apply_agent_action(dir).terminal || ep.apply_random_spawn() {
                    break;
                }
                boards.push(ep.board().cells());
            }
            boards
        };
        prop_assert_eq!(run(&script), run(&script));
    }

    /// Timestep parity always matches the explicit turn kind.
    #[test]
    fn turn_kind_and_parity_agree(seed in 1u64..u64::MAX, script in proptest::collection::vec(arb_direction(), 1..30)) {
        let mut ep = Episode::new();
        ep.reset(seed);
        for &dir in &script {
            prop_assert_eq!(ep.turn(), TurnKind::Agent);
            prop_assert_eq!(ep.timestep() % 2, 0);
            if ep.apply_agent_action(dir).terminal {
                break;
            }
            prop_assert_eq!(ep.turn(), TurnKind::Spawn);
            prop_assert_eq!(ep.timestep() % 2, 1);
            if ep.apply_random_spawn() {
                break;
            }
        }
    }
}
