use std::sync::LazyLock;

use arrayvec::ArrayVec;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use super::BOARD_WIDTH;

/// Upper bound on the number of legal moves of any piece kind.
///
/// Reached by L, J and T (`9 + 8 + 9 + 8`).
pub const MAX_MOVES: usize = 34;

/// Fixed-capacity list of moves for one piece kind.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Footprint of one orientation of a piece.
///
/// The footprint is described column by column relative to the piece origin
/// (its lowest-leftmost corner): column `i` of the piece occupies rows
/// `bottom[i]..top[i]`.
///
/// # Example
///
/// ```
/// use heurtris_engine::PieceKind;
///
/// // The flat I-piece spans four columns and a single row.
/// let shape = PieceKind::I.shape(1);
/// assert_eq!(shape.width(), 4);
/// assert_eq!(shape.height(), 1);
/// assert_eq!(shape.bottom(), &[0, 0, 0, 0]);
/// assert_eq!(shape.top(), &[1, 1, 1, 1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    width: usize,
    height: usize,
    bottom: &'static [usize],
    top: &'static [usize],
}

impl PieceShape {
    const fn new(
        width: usize,
        height: usize,
        bottom: &'static [usize],
        top: &'static [usize],
    ) -> Self {
        assert!(bottom.len() == width);
        assert!(top.len() == width);
        Self {
            width,
            height,
            bottom,
            top,
        }
    }

    /// Number of columns spanned by the piece.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows spanned by the piece.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Lowest occupied row offset of each spanned column.
    #[must_use]
    pub const fn bottom(&self) -> &'static [usize] {
        self.bottom
    }

    /// One past the highest occupied row offset of each spanned column.
    #[must_use]
    pub const fn top(&self) -> &'static [usize] {
        self.top
    }
}

// Indexed by [kind][orientation]. These values define the game physics and must not drift.
static PIECE_SHAPES: [&[PieceShape]; PieceKind::LEN] = [
    // O
    &[PieceShape::new(2, 2, &[0, 0], &[2, 2])],
    // I
    &[
        PieceShape::new(1, 4, &[0], &[4]),
        PieceShape::new(4, 1, &[0, 0, 0, 0], &[1, 1, 1, 1]),
    ],
    // L
    &[
        PieceShape::new(2, 3, &[0, 0], &[3, 1]),
        PieceShape::new(3, 2, &[0, 1, 1], &[2, 2, 2]),
        PieceShape::new(2, 3, &[2, 0], &[3, 3]),
        PieceShape::new(3, 2, &[0, 0, 0], &[1, 1, 2]),
    ],
    // J
    &[
        PieceShape::new(2, 3, &[0, 0], &[1, 3]),
        PieceShape::new(3, 2, &[0, 0, 0], &[2, 1, 1]),
        PieceShape::new(2, 3, &[0, 2], &[3, 3]),
        PieceShape::new(3, 2, &[1, 1, 0], &[2, 2, 2]),
    ],
    // T
    &[
        PieceShape::new(2, 3, &[0, 1], &[3, 2]),
        PieceShape::new(3, 2, &[1, 0, 1], &[2, 2, 2]),
        PieceShape::new(2, 3, &[1, 0], &[2, 3]),
        PieceShape::new(3, 2, &[0, 0, 0], &[1, 2, 1]),
    ],
    // S
    &[
        PieceShape::new(3, 2, &[0, 0, 1], &[1, 2, 2]),
        PieceShape::new(2, 3, &[1, 0], &[3, 2]),
    ],
    // Z
    &[
        PieceShape::new(3, 2, &[1, 0, 0], &[2, 2, 1]),
        PieceShape::new(2, 3, &[0, 1], &[2, 3]),
    ],
];

static LEGAL_MOVES: LazyLock<[MoveList; PieceKind::LEN]> =
    LazyLock::new(|| PieceKind::ALL.map(enumerate_moves));

fn enumerate_moves(kind: PieceKind) -> MoveList {
    let mut moves = MoveList::new();
    for (orientation, shape) in kind.shapes().iter().enumerate() {
        for slot in 0..=(BOARD_WIDTH - shape.width()) {
            moves.push(Move::new(orientation, slot));
        }
    }
    moves
}

/// Enum representing the type of piece.
///
/// The discriminants are the piece identifiers used by the geometry table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[repr(u8)]
pub enum PieceKind {
    /// O-piece (2×2 square).
    O = 0,
    /// I-piece.
    I = 1,
    /// L-piece.
    L = 2,
    /// J-piece.
    J = 3,
    /// T-piece.
    T = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

/// Draws a piece kind uniformly from all seven kinds.
impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in identifier order.
    pub const ALL: [Self; Self::LEN] = [
        Self::O,
        Self::I,
        Self::L,
        Self::J,
        Self::T,
        Self::S,
        Self::Z,
    ];

    /// Returns the piece kind with the given identifier.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::LEN {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Number of distinct orientations of this piece kind.
    #[must_use]
    pub fn orientation_count(self) -> usize {
        self.shapes().len()
    }

    /// All orientations of this piece kind.
    #[must_use]
    pub fn shapes(self) -> &'static [PieceShape] {
        PIECE_SHAPES[self.index()]
    }

    /// Footprint of this piece kind in the given orientation.
    ///
    /// # Panics
    ///
    /// Panics if `orientation` is out of range for this kind.
    #[must_use]
    pub fn shape(self, orientation: usize) -> &'static PieceShape {
        &self.shapes()[orientation]
    }

    /// Returns every legal move of this piece kind.
    ///
    /// Moves are ordered by orientation first and slot second. The list is
    /// built once per process and shared by every caller.
    ///
    /// ```
    /// use heurtris_engine::{Move, PieceKind};
    ///
    /// let moves = PieceKind::O.legal_moves();
    /// assert_eq!(moves.len(), 9);
    /// assert_eq!(moves[0], Move::new(0, 0));
    /// assert_eq!(moves[8], Move::new(0, 8));
    /// ```
    #[must_use]
    pub fn legal_moves(self) -> &'static [Move] {
        &LEGAL_MOVES[self.index()]
    }

    /// Checks whether the move fits horizontally within the board.
    #[must_use]
    pub fn is_legal(self, mv: Move) -> bool {
        self.shapes()
            .get(mv.orientation())
            .is_some_and(|shape| mv.slot() + shape.width() <= BOARD_WIDTH)
    }
}

/// A placement choice: orientation index and leftmost column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("{orientation}@{slot}")]
pub struct Move {
    orientation: u8,
    slot: u8,
}

impl Move {
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn new(orientation: usize, slot: usize) -> Self {
        assert!(orientation < 4);
        assert!(slot < BOARD_WIDTH);
        Self {
            orientation: orientation as u8,
            slot: slot as u8,
        }
    }

    #[must_use]
    pub fn orientation(self) -> usize {
        usize::from(self.orientation)
    }

    #[must_use]
    pub fn slot(self) -> usize {
        usize::from(self.slot)
    }
}
