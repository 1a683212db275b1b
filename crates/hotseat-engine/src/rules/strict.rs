//! Rules that forbid leaving one's own king attacked.

use super::RuleSet;
use crate::movegen::{generate_moves, MoveSet};
use crate::{Board, Piece};
use hotseat_core::{Coord, PieceKind};

/// Offers only destinations after which the mover's king is not attacked.
///
/// With these rules an empty move dictionary is a true checkmate or
/// stalemate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl RuleSet for Strict {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn destinations(&self, board: &Board, piece: &Piece) -> MoveSet {
        let mut moves = generate_moves(board, piece);
        moves.retain(|&dest| leaves_king_safe(board, piece, dest));
        moves
    }
}

/// Returns true if moving `piece` to `dest` leaves its own king unattacked.
///
/// The move is played on a scratch copy of `board`; the original is never
/// touched. A side without a king on the board is always safe.
pub fn leaves_king_safe(board: &Board, piece: &Piece, dest: Coord) -> bool {
    let mut scratch = board.clone();
    if scratch.move_piece(piece.id(), dest).is_err() {
        return false;
    }

    let us = piece.color();
    let king_square = if piece.kind() == PieceKind::King {
        Some(dest)
    } else {
        scratch
            .pieces()
            .find(|p| p.color() == us && p.kind() == PieceKind::King)
            .map(Piece::position)
    };

    match king_square {
        Some(square) => scratch.attackers_of(square, us.opposite()).is_empty(),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotseat_core::{Color, Layout};

    fn at(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    fn board_from(diagram: &str) -> Board {
        Board::from_layout(&Layout::parse(diagram).unwrap()).unwrap().0
    }

    #[test]
    fn pinned_piece_stays_on_the_line() {
        let board = board_from("4k3/4r3/8/8/8/8/4R3/4K3");
        let rook = board.piece_at(at(6, 4)).unwrap();
        let moves = Strict.destinations(&board, rook);
        assert!(!moves.contains(at(6, 0)));
        assert!(moves.contains(at(5, 4)));
        assert!(moves.contains(at(1, 4)));
        assert_eq!(moves.len(), 5);
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let board = board_from("4k3/8/8/8/8/8/r7/4K3");
        let king = board.piece_at(at(7, 4)).unwrap();
        let mut moves = Strict.destinations(&board, king).as_slice().to_vec();
        moves.sort();
        assert_eq!(moves, vec![at(7, 3), at(7, 5)]);
    }

    #[test]
    fn scratch_simulation_leaves_board_untouched() {
        let board = board_from("4k3/4r3/8/8/8/8/4R3/4K3");
        let before = board.clone();
        let rook = board.piece_at(at(6, 4)).unwrap();
        assert!(!leaves_king_safe(&board, rook, at(6, 0)));
        assert!(leaves_king_safe(&board, rook, at(1, 4)));
        assert_eq!(board, before);
    }

    #[test]
    fn back_rank_mate_has_no_moves() {
        let (board, teams) =
            Board::from_layout(&Layout::parse("R5k1/5ppp/8/8/8/8/8/6K1").unwrap()).unwrap();
        let dark = &teams[Color::Dark.index()];
        assert!(Strict.move_dict(&board, dark).is_empty());
        assert!(!board.move_dict(dark).is_empty());
    }
}
