pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum ApplyMoveError {
    #[display("move is not legal for the current piece")]
    IllegalMove,
    #[display("game is already over")]
    GameOver,
}
