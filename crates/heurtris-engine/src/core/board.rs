use std::{fmt, iter, ops::Range};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{Move, PieceKind, PieceShape},
};

/// Marker of an unoccupied cell.
pub const EMPTY_CELL: u32 = 0;

/// Immutable board snapshot with its column-top profile.
///
/// Cells are addressed as `(x, y)` with `y = 0` at the bottom row. An occupied
/// cell holds the (non-zero) turn number of the move that placed it.
///
/// `top[x]` is one more than the row index of the highest occupied cell of
/// column `x`, or 0 for an empty column. Every operation that produces a new
/// board keeps this profile exact.
///
/// # Example
///
/// ```
/// use heurtris_engine::{Board, Move, PieceKind};
///
/// let placement = Board::EMPTY.simulate(PieceKind::O, Move::new(0, 0), 1);
/// assert!(!placement.is_terminal());
/// assert_eq!(placement.cleared_rows(), 0);
/// assert_eq!(placement.board().top_profile(), &[2, 2, 0, 0, 0, 0, 0, 0, 0, 0]);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[u32; BOARD_WIDTH]; BOARD_HEIGHT],
    top: [usize; BOARD_WIDTH],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{ top: {:?}", self.top)?;
        for y in (0..BOARD_HEIGHT).rev() {
            let row: String = (0..BOARD_WIDTH)
                .map(|x| if self.is_occupied(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "  {y:2} {row}")?;
        }
        write!(f, "}}")
    }
}

/// Result of simulating a single move on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    board: Board,
    cleared_rows: usize,
    terminal: bool,
}

impl Placement {
    /// Board after the move (identical to the input board when terminal).
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of rows removed by this move.
    #[must_use]
    pub fn cleared_rows(&self) -> usize {
        self.cleared_rows
    }

    /// Whether the move overflowed the board (game over).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

impl Board {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        cells: [[EMPTY_CELL; BOARD_WIDTH]; BOARD_HEIGHT],
        top: [0; BOARD_WIDTH],
    };

    /// Returns the cell marker at `(x, y)`.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> u32 {
        self.cells[y][x]
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cells[y][x] != EMPTY_CELL
    }

    /// Returns the column-top profile.
    #[must_use]
    pub fn top_profile(&self) -> &[usize; BOARD_WIDTH] {
        &self.top
    }

    /// Returns the height of a single column.
    #[must_use]
    pub fn column_top(&self, x: usize) -> usize {
        self.top[x]
    }

    /// Checks whether every cell of row `y` is occupied.
    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells[y].iter().all(|&c| c != EMPTY_CELL)
    }

    /// Row the piece comes to rest on when dropped at `slot`.
    ///
    /// The piece settles on the highest obstruction among its spanned columns.
    #[must_use]
    pub fn landing_height(&self, shape: &PieceShape, slot: usize) -> usize {
        iter::zip(&self.top[slot..], shape.bottom())
            .map(|(&top, &bottom)| top.saturating_sub(bottom))
            .max()
            .unwrap_or(0)
    }

    /// Drops `kind` with `mv` onto this board and returns the resulting snapshot.
    ///
    /// Filled cells are marked with `marker`, which must be non-zero.
    ///
    /// If the piece would reach the top row the placement is terminal and the
    /// returned board is this board, unchanged. Otherwise the piece is written,
    /// completed rows within the piece's footprint are removed, and the
    /// column-top profile is re-settled.
    ///
    /// The move must be legal for `kind`; legality is a property of move
    /// enumeration and is only checked in debug builds.
    #[must_use]
    pub fn simulate(&self, kind: PieceKind, mv: Move, marker: u32) -> Placement {
        debug_assert!(kind.is_legal(mv), "illegal move {mv} for piece {kind}");
        debug_assert_ne!(marker, EMPTY_CELL);

        let shape = kind.shape(mv.orientation());
        let slot = mv.slot();
        let landing = self.landing_height(shape, slot);
        if landing + shape.height() >= BOARD_HEIGHT {
            return Placement {
                board: *self,
                cleared_rows: 0,
                terminal: true,
            };
        }

        let mut board = *self;
        for (dx, (&bottom, &top)) in iter::zip(shape.bottom(), shape.top()).enumerate() {
            let x = slot + dx;
            for y in landing + bottom..landing + top {
                board.cells[y][x] = marker;
            }
            board.top[x] = landing + top;
        }
        let cleared_rows = board.clear_rows(landing..landing + shape.height());

        Placement {
            board,
            cleared_rows,
            terminal: false,
        }
    }

    /// Removes every full row in `rows`, scanning from the top of the range down.
    ///
    /// Each column is compacted independently: only the cells between the
    /// removed row and the column top slide down.
    fn clear_rows(&mut self, rows: Range<usize>) -> usize {
        let mut cleared = 0;
        for y in rows.rev() {
            if !self.is_row_full(y) {
                continue;
            }
            cleared += 1;
            for x in 0..BOARD_WIDTH {
                for i in y..self.top[x] {
                    self.cells[i][x] = self.cells.get(i + 1).map_or(EMPTY_CELL, |row| row[x]);
                }
                self.top[x] -= 1;
                while self.top[x] > 0 && self.cells[self.top[x] - 1][x] == EMPTY_CELL {
                    self.top[x] -= 1;
                }
            }
        }
        cleared
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `#` is an occupied cell and `.` an empty one. Lines are given top to
    /// bottom and the last line is row 0, so short pictures describe the
    /// bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if a line does not have exactly 10 cells or there are more than
    /// 21 lines.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "at most {BOARD_HEIGHT} rows allowed, got {}",
            lines.len()
        );

        let mut board = Self::EMPTY;
        for (y, line) in lines.iter().rev().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                BOARD_WIDTH,
                "Each row must have exactly {BOARD_WIDTH} cells, got {} at row {y}",
                chars.len(),
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.cells[y][x] = 1;
                    board.top[x] = y + 1;
                }
            }
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn brute_force_top(board: &Board) -> [usize; BOARD_WIDTH] {
        let mut top = [0; BOARD_WIDTH];
        for (x, t) in top.iter_mut().enumerate() {
            *t = (0..BOARD_HEIGHT)
                .rev()
                .find(|&y| board.is_occupied(x, y))
                .map_or(0, |y| y + 1);
        }
        top
    }

    fn holes(board: &Board) -> usize {
        (0..BOARD_WIDTH)
            .map(|x| {
                (0..board.column_top(x))
                    .filter(|&y| !board.is_occupied(x, y))
                    .count()
            })
            .sum()
    }

    #[test]
    fn test_o_piece_on_empty_board() {
        let placement = Board::EMPTY.simulate(PieceKind::O, Move::new(0, 0), 1);
        assert!(!placement.is_terminal());
        assert_eq!(placement.cleared_rows(), 0);
        assert_eq!(
            placement.board().top_profile(),
            &[2, 2, 0, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(holes(placement.board()), 0);
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(placement.board().cell(x, y), 1);
        }
    }

    #[test]
    fn test_piece_rests_on_highest_obstruction() {
        let board = Board::from_ascii(
            r"
            ..#.......
            ..#.......
            ",
        );
        // Flat I across columns 0..4 rests on top of column 2.
        let placement = board.simulate(PieceKind::I, Move::new(1, 0), 7);
        assert_eq!(
            placement.board().top_profile(),
            &[3, 3, 3, 3, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(holes(placement.board()), 6);
        assert_eq!(placement.board().cell(0, 2), 7);
    }

    #[test]
    fn test_overhanging_orientation_uses_bottom_offset() {
        // T pointing down: columns 0 and 2 hang one row above column 1.
        let board = Board::from_ascii(
            r"
            #.#.......
            ",
        );
        let placement = board.simulate(PieceKind::T, Move::new(1, 0), 2);
        assert_eq!(placement.board().top_profile(), &[2, 2, 2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(placement.cleared_rows(), 0);
        assert_eq!(holes(placement.board()), 0);
    }

    #[test]
    fn test_single_row_clear_in_last_column() {
        let board = Board::from_ascii(
            r"
            #.........
            #########.
            ",
        );
        let placement = board.simulate(PieceKind::I, Move::new(0, 9), 3);
        assert!(!placement.is_terminal());
        assert_eq!(placement.cleared_rows(), 1);

        // Pre-clear tops would be [2, 1, 1, 1, 1, 1, 1, 1, 1, 4].
        assert_eq!(
            placement.board().top_profile(),
            &[1, 0, 0, 0, 0, 0, 0, 0, 0, 3]
        );
        assert!(placement.board().is_occupied(0, 0));
        assert_eq!(placement.board().cell(9, 2), 3);
        assert_eq!(placement.board().cell(9, 3), EMPTY_CELL);
    }

    #[test]
    fn test_multiple_row_clear_compacts_columns() {
        let board = Board::from_ascii(
            r"
            #.........
            .########.
            #########.
            #########.
            #########.
            ",
        );
        let placement = board.simulate(PieceKind::I, Move::new(0, 9), 4);
        assert_eq!(placement.cleared_rows(), 3);
        assert_eq!(placement.board().top_profile(), &[2, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
        // The overhang in column 0 keeps its hole after falling.
        assert!(!placement.board().is_occupied(0, 0));
        assert!(placement.board().is_occupied(0, 1));
        assert_eq!(brute_force_top(placement.board()), *placement.board().top_profile());
    }

    #[test]
    fn test_top_resettles_below_exposed_hole() {
        let board = Board::from_ascii(
            r"
            #########.
            ..........
            #.........
            ",
        );
        let placement = board.simulate(PieceKind::I, Move::new(0, 9), 5);
        assert_eq!(placement.cleared_rows(), 1);
        assert_eq!(placement.board().column_top(0), 1);
        assert_eq!(placement.board().column_top(1), 0);
        assert_eq!(placement.board().column_top(9), 3);
    }

    #[test]
    fn test_terminal_leaves_board_unchanged() {
        let mut art = String::new();
        for _ in 0..18 {
            art.push_str("#.........\n");
        }
        let board = Board::from_ascii(&art);
        // Vertical I on column 0 would need rows 18..22.
        let placement = board.simulate(PieceKind::I, Move::new(0, 0), 9);
        assert!(placement.is_terminal());
        assert_eq!(placement.cleared_rows(), 0);
        assert_eq!(placement.board(), &board);

        // Landing 18 + height 2 = 20 < 21 still fits.
        let placement = board.simulate(PieceKind::O, Move::new(0, 0), 9);
        assert!(!placement.is_terminal());
        // Landing 18 + height 3 = 21 does not.
        let placement = board.simulate(PieceKind::L, Move::new(0, 0), 9);
        assert!(placement.is_terminal());
    }

    #[test]
    fn test_from_ascii_sets_tops() {
        let board = Board::from_ascii(
            r"
            .#........
            ..........
            ##.......#
            ",
        );
        assert_eq!(board.top_profile(), &[1, 3, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(brute_force_top(&board), *board.top_profile());
    }

    fn occupied_cells(board: &Board) -> usize {
        (0..BOARD_HEIGHT)
            .map(|y| (0..BOARD_WIDTH).filter(|&x| board.is_occupied(x, y)).count())
            .sum()
    }

    fn arb_moves() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0..PieceKind::LEN, 0..crate::MAX_MOVES), 1..120)
    }

    proptest! {
        #[test]
        fn simulated_moves_preserve_board_invariants(moves in arb_moves()) {
            let mut board = Board::EMPTY;
            for (turn, (kind, choice)) in (1..).zip(moves) {
                let kind = PieceKind::ALL[kind];
                let legal = kind.legal_moves();
                let mv = legal[choice % legal.len()];
                let shape = kind.shape(mv.orientation());

                let placement = board.simulate(kind, mv, turn);
                if placement.is_terminal() {
                    prop_assert_eq!(placement.board(), &board);
                    let landing = board.landing_height(shape, mv.slot());
                    prop_assert!(landing + shape.height() >= BOARD_HEIGHT);
                    break;
                }

                prop_assert!(placement.cleared_rows() <= shape.height());
                let next = *placement.board();
                prop_assert_eq!(brute_force_top(&next), *next.top_profile());
                for y in 0..BOARD_HEIGHT {
                    prop_assert!(!next.is_row_full(y), "row {} left full", y);
                }
                prop_assert_eq!(
                    occupied_cells(&next),
                    occupied_cells(&board) + 4 - placement.cleared_rows() * BOARD_WIDTH
                );
                board = next;
            }
        }
    }
}
