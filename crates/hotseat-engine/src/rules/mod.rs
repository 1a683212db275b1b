//! Rule set abstraction.
//!
//! The turn machine asks its [`RuleSet`] which destinations a piece may
//! choose. [`PseudoLegal`] offers every pattern move; [`Strict`] also drops
//! moves that leave the mover's own king attacked.

mod pseudo;
mod strict;

pub use pseudo::PseudoLegal;
pub use strict::{leaves_king_safe, Strict};

use crate::board::MoveDict;
use crate::movegen::MoveSet;
use crate::{Board, Piece, Team};

/// Which destinations a side may choose from.
///
/// # Example
///
/// ```
/// use hotseat_engine::rules::{PseudoLegal, RuleSet, Strict};
/// use hotseat_engine::Board;
/// use hotseat_core::Color;
///
/// let (board, teams) = Board::standard();
/// let light = &teams[Color::Light.index()];
/// assert_eq!(PseudoLegal.move_dict(&board, light).len(), 10);
/// assert_eq!(Strict.move_dict(&board, light).len(), 10);
/// ```
pub trait RuleSet {
    /// Short name for logs and front ends.
    fn name(&self) -> &'static str;

    /// Returns the destinations `piece` may choose on `board`.
    fn destinations(&self, board: &Board, piece: &Piece) -> MoveSet;

    /// Destinations for each on-board piece of `team` that has any.
    ///
    /// An empty dictionary means the side to move cannot move.
    fn move_dict(&self, board: &Board, team: &Team) -> MoveDict {
        team.active()
            .iter()
            .filter(|&&id| board.on_board(id))
            .filter_map(|&id| board.piece(id))
            .map(|p| (p.id(), self.destinations(board, p)))
            .filter(|(_, moves)| !moves.is_empty())
            .collect()
    }
}

impl<R: RuleSet + ?Sized> RuleSet for &R {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn destinations(&self, board: &Board, piece: &Piece) -> MoveSet {
        (**self).destinations(board, piece)
    }
}
