//! Piece records stored in the board arena.

use hotseat_core::{Color, Coord, PieceKind};
use serde::Serialize;
use std::fmt;

/// Stable handle to a piece in the board arena.
///
/// Ids are never reused: a promoted pawn's id is retired and the new piece
/// receives a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PieceId(pub(crate) u16);

impl PieceId {
    /// Returns the arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single piece: its identity, kind, and per-kind flags.
///
/// The position is written only by the board, together with the grid cell
/// that refers to this piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: PieceId,
    color: Color,
    kind: PieceKind,
    position: Coord,
    has_moved: bool,
    in_check: bool,
    passant_spent: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, color: Color, kind: PieceKind, position: Coord) -> Self {
        // A pawn away from its starting row can no longer double-step.
        let has_moved = kind == PieceKind::Pawn && position.row() != color.pawn_row();
        Piece {
            id,
            color,
            kind,
            position,
            has_moved,
            in_check: false,
            passant_spent: false,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub fn position(&self) -> Coord {
        self.position
    }

    /// Returns true once the piece has made a move.
    #[inline]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Returns true if this is a king currently marked as attacked.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Returns true once a pawn has made its first diagonal advance.
    #[inline]
    pub fn passant_spent(&self) -> bool {
        self.passant_spent
    }

    /// Returns true for a pawn standing on the far row from its own side.
    pub fn is_promotable(&self) -> bool {
        self.kind == PieceKind::Pawn && self.position.row() == self.color.promotion_row()
    }

    pub(crate) fn set_position(&mut self, position: Coord) {
        self.position = position;
    }

    /// Post-move hook, run after the board has relocated the piece.
    pub(crate) fn after_move(&mut self, from: Coord) {
        self.has_moved = true;
        if self.kind == PieceKind::Pawn && from.col() != self.position.col() {
            self.passant_spent = true;
        }
    }

    /// Marks a king as attacked or clear. Ignored for other kinds.
    pub(crate) fn set_in_check(&mut self, in_check: bool) {
        if self.kind == PieceKind::King {
            self.in_check = in_check;
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.color, self.kind, self.position)
    }
}
