//! Board evaluation features.
//!
//! Five scalar heuristics describe a board snapshot produced by a move:
//!
//! - [`BoardFeature::CompleteLines`] - Rows cleared by the move that produced the snapshot
//! - [`BoardFeature::AggregateHeight`] - Sum of column heights ([`source::aggregate_height`])
//! - [`BoardFeature::Bumpiness`] - Height variation between neighbours ([`source::bumpiness`])
//! - [`BoardFeature::Holes`] - Covered empty cells ([`source::holes`])
//! - [`BoardFeature::WellSum`] - Triangular well depth ([`source::well_sum`])
//!
//! Features carry no sign: whether a feature is good or bad is expressed only by
//! the sign of its learned weight.

use std::fmt;

use heurtris_engine::Board;
use serde::{Deserialize, Serialize};

pub mod source;

/// One of the five heuristics, in weight-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardFeature {
    CompleteLines,
    AggregateHeight,
    Bumpiness,
    Holes,
    WellSum,
}

impl BoardFeature {
    /// Number of features (5).
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Self::CompleteLines,
        Self::AggregateHeight,
        Self::Bumpiness,
        Self::Holes,
        Self::WellSum,
    ];

    /// Position of this feature in a weight vector.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::CompleteLines => "complete_lines",
            Self::AggregateHeight => "aggregate_height",
            Self::Bumpiness => "bumpiness",
            Self::Holes => "holes",
            Self::WellSum => "well_sum",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CompleteLines => "Complete Lines",
            Self::AggregateHeight => "Aggregate Height",
            Self::Bumpiness => "Bumpiness",
            Self::Holes => "Holes",
            Self::WellSum => "Well Sum",
        }
    }
}

impl fmt::Display for BoardFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feature values of one board snapshot.
///
/// # Example
///
/// ```
/// use heurtris_engine::{Board, Move, PieceKind};
/// use heurtris_evaluator::board_feature::{BoardFeature, BoardFeatures};
///
/// let placement = Board::EMPTY.simulate(PieceKind::O, Move::new(0, 0), 1);
/// let features = BoardFeatures::from_board(placement.board(), placement.cleared_rows());
/// assert_eq!(features.get(BoardFeature::AggregateHeight), 4);
/// assert_eq!(features.get(BoardFeature::Bumpiness), 2);
/// assert_eq!(features.get(BoardFeature::Holes), 0);
/// assert_eq!(features.get(BoardFeature::WellSum), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardFeatures {
    values: [u32; BoardFeature::LEN],
}

impl BoardFeatures {
    /// Computes every feature of `board`.
    ///
    /// `cleared_rows` is the number of rows removed by the move that produced
    /// `board`; it is not recomputed from the snapshot.
    #[must_use]
    pub fn from_board(board: &Board, cleared_rows: usize) -> Self {
        #[expect(clippy::cast_possible_truncation)]
        let complete_lines = cleared_rows as u32;
        Self {
            values: [
                complete_lines,
                source::aggregate_height(board),
                source::bumpiness(board),
                source::holes(board),
                source::well_sum(board),
            ],
        }
    }

    #[must_use]
    pub const fn get(&self, feature: BoardFeature) -> u32 {
        self.values[feature.index()]
    }

    /// Values in weight-vector order.
    #[must_use]
    pub const fn values(&self) -> &[u32; BoardFeature::LEN] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use heurtris_engine::{Move, PieceKind};

    use super::*;

    #[test]
    fn test_feature_order_matches_index() {
        for (i, feature) in BoardFeature::ALL.iter().enumerate() {
            assert_eq!(feature.index(), i);
        }
    }

    #[test]
    fn test_complete_lines_come_from_the_move() {
        let board = Board::from_ascii(
            r"
            #########.
            ",
        );
        let placement = board.simulate(PieceKind::I, Move::new(0, 9), 2);
        assert_eq!(placement.cleared_rows(), 1);

        let features = BoardFeatures::from_board(placement.board(), placement.cleared_rows());
        assert_eq!(features.get(BoardFeature::CompleteLines), 1);
        assert_eq!(features.get(BoardFeature::AggregateHeight), 3);
        assert_eq!(features.get(BoardFeature::Holes), 0);
        // columns 0..8 are empty, column 9 stands 3 high
        assert_eq!(features.get(BoardFeature::Bumpiness), 3);
        assert_eq!(features.get(BoardFeature::WellSum), 0);
    }

    #[test]
    fn test_feature_ids() {
        let ids: Vec<_> = BoardFeature::ALL.iter().map(|f| f.id()).collect();
        assert_eq!(
            ids,
            ["complete_lines", "aggregate_height", "bumpiness", "holes", "well_sum"]
        );
        let json = serde_json::to_string(&BoardFeature::WellSum).unwrap();
        assert_eq!(json, "\"well_sum\"");
    }
}
