//! Move generation.
//!
//! Every generator here is pseudo-legal: it follows the piece's movement
//! pattern over the current occupancy and never asks whether the move
//! exposes the mover's own king. Legality filtering lives in
//! [`rules`](crate::rules).

pub mod perft;

use crate::{Board, Piece};
use hotseat_core::{Coord, PieceKind};
use serde::Serialize;

/// Knight jump offsets as `(row, col)` deltas.
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// The eight squares surrounding a king.
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Diagonal ray directions (bishop, queen).
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Orthogonal ray directions (rook, queen).
pub const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// The destinations one piece may reach.
///
/// Valid only for the board it was generated from; regenerate after any
/// mutation. Destinations keep generation order and are never duplicated.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MoveSet {
    squares: Vec<Coord>,
}

impl MoveSet {
    /// Creates an empty move set.
    #[inline]
    pub const fn new() -> Self {
        MoveSet {
            squares: Vec::new(),
        }
    }

    /// Adds a destination, ignoring duplicates.
    #[inline]
    pub fn push(&mut self, to: Coord) {
        if !self.squares.contains(&to) {
            self.squares.push(to);
        }
    }

    /// Returns the number of destinations.
    #[inline]
    pub fn len(&self) -> usize {
        self.squares.len()
    }

    /// Returns true if there are no destinations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    /// Returns true if `to` is one of the destinations.
    #[inline]
    pub fn contains(&self, to: Coord) -> bool {
        self.squares.contains(&to)
    }

    /// Returns the destinations as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Coord] {
        &self.squares
    }

    /// Retains only destinations for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Coord) -> bool,
    {
        self.squares.retain(f);
    }
}

impl<'a> IntoIterator for &'a MoveSet {
    type Item = &'a Coord;
    type IntoIter = std::slice::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.squares.iter()
    }
}

impl FromIterator<Coord> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        let mut set = MoveSet::new();
        for to in iter {
            set.push(to);
        }
        set
    }
}

impl std::fmt::Debug for MoveSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.squares.iter()).finish()
    }
}

/// Generates the pseudo-legal destinations of `piece` on `board`.
pub fn generate_moves(board: &Board, piece: &Piece) -> MoveSet {
    let mut moves = MoveSet::new();
    match piece.kind() {
        PieceKind::Pawn => generate_pawn_moves(board, piece, &mut moves),
        PieceKind::Knight => generate_steps(board, piece, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::Bishop => generate_slides(board, piece, &DIAGONALS, &mut moves),
        PieceKind::Rook => generate_slides(board, piece, &ORTHOGONALS, &mut moves),
        PieceKind::Queen => {
            generate_slides(board, piece, &ORTHOGONALS, &mut moves);
            generate_slides(board, piece, &DIAGONALS, &mut moves);
        }
        PieceKind::King => generate_steps(board, piece, &KING_OFFSETS, &mut moves),
    }
    moves
}

/// Pawn pushes and diagonal captures.
fn generate_pawn_moves(board: &Board, piece: &Piece, moves: &mut MoveSet) {
    let from = piece.position();
    let dv = piece.color().forward();

    if let Some(one) = from.offset(dv, 0) {
        if board.is_vacant(one) {
            moves.push(one);
            if !piece.has_moved() {
                if let Some(two) = one.offset(dv, 0) {
                    if board.is_vacant(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for dc in [-1, 1] {
        if let Some(to) = from.offset(dv, dc) {
            if is_enemy(board, piece, to) {
                moves.push(to);
            }
        }
    }
}

/// Single-step movers: knight jumps and king steps.
fn generate_steps(board: &Board, piece: &Piece, offsets: &[(i8, i8)], moves: &mut MoveSet) {
    let from = piece.position();
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc) {
            if board.is_vacant(to) || is_enemy(board, piece, to) {
                moves.push(to);
            }
        }
    }
}

/// Walks each ray until it leaves the board or hits a piece.
///
/// An enemy blocker is included and ends the ray; an allied blocker ends the
/// ray without being included.
fn generate_slides(board: &Board, piece: &Piece, rays: &[(i8, i8)], moves: &mut MoveSet) {
    let from = piece.position();
    for &(dr, dc) in rays {
        let mut cursor = from;
        while let Some(to) = cursor.offset(dr, dc) {
            match board.piece_at(to) {
                None => moves.push(to),
                Some(blocker) => {
                    if blocker.color() != piece.color() {
                        moves.push(to);
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}

#[inline]
fn is_enemy(board: &Board, piece: &Piece, at: Coord) -> bool {
    board
        .piece_at(at)
        .is_some_and(|other| other.color() != piece.color())
}
