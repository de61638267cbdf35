// Property tests for the board rules

use dots_and_boxes::board::{line_key, Board, Dot, LineKey, Player, SquareKey};
use proptest::prelude::*;

// (row, col, horizontal) picks a candidate line from a dot; off-grid picks are no-ops
fn moves() -> impl Strategy<Value = Vec<(usize, usize, bool)>> {
    prop::collection::vec((0usize..6, 0usize..6, any::<bool>()), 0..80)
}

fn endpoints(row: usize, col: usize, horizontal: bool) -> (Dot, Dot) {
    let a = Dot::new(row, col);
    let b = if horizontal { Dot::new(row, col + 1) } else { Dot::new(row + 1, col) };
    (a, b)
}

fn all_lines(rows: usize, cols: usize) -> Vec<(Dot, Dot)> {
    let mut lines = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            if col + 1 < cols {
                lines.push((Dot::new(row, col), Dot::new(row, col + 1)));
            }
            if row + 1 < rows {
                lines.push((Dot::new(row, col), Dot::new(row + 1, col)));
            }
        }
    }
    lines
}

// Every line of the grid once, in random order, each with a random endpoint order
fn shuffled_fill(rows: usize, cols: usize) -> impl Strategy<Value = Vec<(Dot, Dot)>> {
    let lines = all_lines(rows, cols);
    let count = lines.len();
    (Just(lines).prop_shuffle(), prop::collection::vec(any::<bool>(), count)).prop_map(|(lines, flips)| {
        lines
            .into_iter()
            .zip(flips)
            .map(|((a, b), flip)| if flip { (b, a) } else { (a, b) })
            .collect()
    })
}

fn any_fill() -> impl Strategy<Value = (usize, usize, Vec<(Dot, Dot)>)> {
    (2usize..7, 2usize..7).prop_flat_map(|(rows, cols)| (Just(rows), Just(cols), shuffled_fill(rows, cols)))
}

proptest! {
    #[test]
    fn scores_never_exceed_owned_squares(rows in 2usize..6, cols in 2usize..6, moves in moves()) {
        let mut board = Board::new(rows, cols);
        for (row, col, horizontal) in moves {
            let (a, b) = endpoints(row, col, horizontal);
            board.place_line(a, b);

            let scores = board.scores();
            prop_assert_eq!(scores.total(), board.owned_squares());
            prop_assert!(scores.total() <= board.total_squares());
        }
    }

    #[test]
    fn line_identity_ignores_direction(r1 in 0usize..10, c1 in 0usize..10, r2 in 0usize..10, c2 in 0usize..10) {
        let a = Dot::new(r1, c1);
        let b = Dot::new(r2, c2);
        prop_assert_eq!(line_key(a, b), line_key(b, a));
    }

    #[test]
    fn turn_passes_only_without_completion(moves in moves()) {
        let mut board = Board::new(4, 4);
        for (row, col, horizontal) in moves {
            let (a, b) = endpoints(row, col, horizontal);
            let before = board.current_player();
            match board.place_line(a, b) {
                Some(placement) => {
                    prop_assert_eq!(placement.player, before);
                    prop_assert_eq!(placement.turn_passed, placement.completed.is_empty());
                    let expected = if placement.turn_passed { before.other() } else { before };
                    prop_assert_eq!(board.current_player(), expected);
                }
                None => prop_assert_eq!(board.current_player(), before),
            }
        }
    }

    #[test]
    fn owners_are_written_once((rows, cols, lines) in any_fill()) {
        let mut board = Board::new(rows, cols);
        let mut line_owners: Vec<(LineKey, Player)> = Vec::new();
        let mut square_owners: Vec<(SquareKey, Player)> = Vec::new();

        for (a, b) in lines {
            board.place_line(a, b);
            // Placing the same line again changes nothing
            prop_assert!(board.place_line(b, a).is_none());

            for (line, owner) in &line_owners {
                prop_assert_eq!(board.line_owner(*line), Some(*owner));
            }
            for (square, owner) in &square_owners {
                prop_assert_eq!(board.square_owner(*square), Some(*owner));
            }
            line_owners = board.lines().collect();
            square_owners = board.squares().collect();
        }
    }

    #[test]
    fn filling_every_line_ends_the_game((rows, cols, lines) in any_fill()) {
        let mut board = Board::new(rows, cols);
        for (a, b) in lines {
            prop_assert!(!board.is_game_over());
            prop_assert!(board.place_line(a, b).is_some());
        }

        prop_assert!(board.is_game_over());
        prop_assert_eq!(board.scores().total(), (rows - 1) * (cols - 1));
        prop_assert_eq!(board.owned_squares(), board.total_squares());
        prop_assert!(board.outcome().is_some());
    }

    // Whoever draws the fourth side, in any order, owns the square
    #[test]
    fn single_square_goes_to_the_closing_player(lines in shuffled_fill(2, 2)) {
        let mut board = Board::new(2, 2);
        for &(a, b) in &lines[..3] {
            let placement = board.place_line(a, b);
            prop_assert!(placement.map_or(false, |p| p.completed.is_empty()));
        }

        let closer = board.current_player();
        let (a, b) = lines[3];
        let placement = board.place_line(a, b);
        prop_assert_eq!(placement.map(|p| p.completed), Some(vec![SquareKey::new(0, 0)]));
        prop_assert_eq!(board.square_owner(SquareKey::new(0, 0)), Some(closer));
        prop_assert_eq!(board.scores().get(closer), 1);
        prop_assert!(board.is_game_over());
    }
}
