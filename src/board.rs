/*
 * Board Module
 *
 * This module defines the authoritative dots and boxes game state.
 * It owns the dot lattice dimensions, the set of placed lines, square
 * ownership, the scores and whose turn it is.
 *
 * Rules:
 * 1. A line joins two dots that differ by one step along a single axis
 * 2. A square belongs to whoever places its fourth bounding line
 * 3. A player who completes a square moves again, otherwise the turn passes
 *
 * Every operation is total: an invalid move is a no-op, never a failure.
 */

use std::collections::BTreeMap;
use std::fmt;

// A lattice vertex. Ordering is row first, then column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dot {
    pub row: usize,
    pub col: usize,
}

impl Dot {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Dot {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "{},{}", self.row, self.col)
    }
}

// True iff the two dots differ by exactly 1 in exactly one axis
pub fn adjacent(a: Dot, b: Dot) -> bool {
    let row_diff = a.row.abs_diff(b.row);
    let col_diff = a.col.abs_diff(b.col);
    (row_diff == 1 && col_diff == 0) || (row_diff == 0 && col_diff == 1)
}

/// Direction-independent identity of a line between two dots.
///
/// The endpoints are stored sorted (row, then column), so
/// `LineKey::new(a, b) == LineKey::new(b, a)` for every pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey {
    start: Dot,
    end: Dot,
}

impl LineKey {
    pub fn new(a: Dot, b: Dot) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> Dot {
        self.start
    }

    pub fn end(&self) -> Dot {
        self.end
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.row == self.end.row
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "{}-{}", self.start, self.end)
    }
}

// Canonical key for the line joining `a` and `b`
pub fn line_key(a: Dot, b: Dot) -> LineKey {
    LineKey::new(a, b)
}

// A unit cell, identified by its top-left dot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SquareKey {
    pub row: usize,
    pub col: usize,
}

impl SquareKey {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    // The four bounding lines: top, bottom, left, right
    pub fn edges(&self) -> [LineKey; 4] {
        let (row, col) = (self.row, self.col);
        [
            LineKey::new(Dot::new(row, col), Dot::new(row, col + 1)),
            LineKey::new(Dot::new(row + 1, col), Dot::new(row + 1, col + 1)),
            LineKey::new(Dot::new(row, col), Dot::new(row + 1, col)),
            LineKey::new(Dot::new(row, col + 1), Dot::new(row + 1, col + 1)),
        ]
    }
}

impl fmt::Display for SquareKey {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "{},{}", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "Player {}", self.number())
    }
}

// Squares owned by each player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scores {
    pub one: usize,
    pub two: usize,
}

impl Scores {
    pub fn get(&self, player: Player) -> usize {
        match player {
            Player::One => self.one,
            Player::Two => self.two,
        }
    }

    pub fn total(&self) -> usize {
        self.one + self.two
    }

    fn add(&mut self, player: Player, amount: usize) {
        match player {
            Player::One => self.one += amount,
            Player::Two => self.two += amount,
        }
    }
}

/// Result of a finished game: higher score wins, equal scores tie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Winner {
        player: Player,
        winning_score: usize,
        losing_score: usize,
    },
    Tie {
        score: usize,
    },
}

impl GameOutcome {
    pub fn from_scores(scores: Scores) -> Self {
        if scores.one > scores.two {
            GameOutcome::Winner { player: Player::One, winning_score: scores.one, losing_score: scores.two }
        } else if scores.two > scores.one {
            GameOutcome::Winner { player: Player::Two, winning_score: scores.two, losing_score: scores.one }
        } else {
            GameOutcome::Tie { score: scores.one }
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Winner { player, winning_score, losing_score } => {
                write!(out, "{} Wins! ({} - {})", player, winning_score, losing_score)
            }
            GameOutcome::Tie { .. } => write!(out, "It's a Tie!"),
        }
    }
}

/// What a successful `place_line` did to the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub line: LineKey,
    pub player: Player,
    // At most two: one on each side of the line
    pub completed: Vec<SquareKey>,
    pub turn_passed: bool,
}

#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    // Doubles as the placed-line set and the record of who drew each line
    lines: BTreeMap<LineKey, Player>,
    squares: BTreeMap<SquareKey, Player>,
    scores: Scores,
    current_player: Player,
}

impl Board {
    // Dimensions below 2 dots are raised to 2 so every square count is valid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(2),
            cols: cols.max(2),
            lines: BTreeMap::new(),
            squares: BTreeMap::new(),
            scores: Scores::default(),
            current_player: Player::One,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn total_squares(&self) -> usize {
        (self.rows - 1) * (self.cols - 1)
    }

    pub fn contains_dot(&self, dot: Dot) -> bool {
        dot.row < self.rows && dot.col < self.cols
    }

    pub fn has_line(&self, line: LineKey) -> bool {
        self.lines.contains_key(&line)
    }

    // Which player drew a line, if it has been placed
    pub fn line_owner(&self, line: LineKey) -> Option<Player> {
        self.lines.get(&line).copied()
    }

    pub fn square_owner(&self, square: SquareKey) -> Option<Player> {
        self.squares.get(&square).copied()
    }

    pub fn lines(&self) -> impl Iterator<Item = (LineKey, Player)> + '_ {
        self.lines.iter().map(|(&line, &player)| (line, player))
    }

    pub fn squares(&self) -> impl Iterator<Item = (SquareKey, Player)> + '_ {
        self.squares.iter().map(|(&square, &player)| (square, player))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn owned_squares(&self) -> usize {
        self.squares.len()
    }

    // All four bounding lines present and the square not yet owned
    pub fn is_square_complete(&self, row: usize, col: usize) -> bool {
        let square = SquareKey::new(row, col);
        square.edges().iter().all(|edge| self.lines.contains_key(edge))
            && !self.squares.contains_key(&square)
    }

    pub fn is_game_over(&self) -> bool {
        self.squares.len() == self.total_squares()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if self.is_game_over() {
            Some(GameOutcome::from_scores(self.scores))
        } else {
            None
        }
    }

    // A line can be placed between in-bounds adjacent dots that are not yet joined
    pub fn can_place(&self, a: Dot, b: Dot) -> bool {
        self.contains_dot(a)
            && self.contains_dot(b)
            && adjacent(a, b)
            && !self.lines.contains_key(&LineKey::new(a, b))
    }

    /// Places the line between `a` and `b` for the current player.
    ///
    /// Returns `None` without touching any state when the dots are not
    /// adjacent, out of bounds, or already joined.
    pub fn place_line(&mut self, a: Dot, b: Dot) -> Option<Placement> {
        if !self.can_place(a, b) {
            return None;
        }

        let line = LineKey::new(a, b);
        let player = self.current_player;
        self.lines.insert(line, player);

        let completed = self.claim_completed_squares(line, player);

        let turn_passed = completed.is_empty();
        if turn_passed {
            self.current_player = player.other();
        } else {
            self.scores.add(player, completed.len());
        }

        Some(Placement { line, player, completed, turn_passed })
    }

    // Only the (at most two) squares bordering the new line can have just completed
    fn claim_completed_squares(&mut self, line: LineKey, player: Player) -> Vec<SquareKey> {
        let start = line.start();
        let mut candidates = Vec::with_capacity(2);

        if line.is_horizontal() {
            if start.row > 0 {
                candidates.push(SquareKey::new(start.row - 1, start.col));
            }
            if start.row < self.rows - 1 {
                candidates.push(SquareKey::new(start.row, start.col));
            }
        } else {
            if start.col > 0 {
                candidates.push(SquareKey::new(start.row, start.col - 1));
            }
            if start.col < self.cols - 1 {
                candidates.push(SquareKey::new(start.row, start.col));
            }
        }

        let mut completed = Vec::with_capacity(2);
        for square in candidates {
            if self.is_square_complete(square.row, square.col) {
                self.squares.insert(square, player);
                completed.push(square);
            }
        }
        completed
    }
}
