//! Pattern-only rules.

use super::RuleSet;
use crate::movegen::{generate_moves, MoveSet};
use crate::{Board, Piece};

/// Offers every pseudo-legal destination.
///
/// Moves that leave the mover's own king attacked are allowed, and a side
/// with no pattern moves at all ends the game. This is the default rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PseudoLegal;

impl RuleSet for PseudoLegal {
    fn name(&self) -> &'static str {
        "pseudo"
    }

    fn destinations(&self, board: &Board, piece: &Piece) -> MoveSet {
        generate_moves(board, piece)
    }
}
