//! Team rosters: which pieces each side has in play and which it has lost.

use crate::{Piece, PieceId};
use hotseat_core::Color;

/// One side's roster.
///
/// Holds ids only; the pieces themselves live in the board arena. The
/// roster is changed by the board's promotion and by the turn machine when
/// it settles a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    color: Color,
    active: Vec<PieceId>,
    captured: Vec<PieceId>,
}

impl Team {
    /// Creates an empty roster.
    pub fn new(color: Color) -> Self {
        Team {
            color,
            active: Vec::with_capacity(16),
            captured: Vec::new(),
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns true if the piece is this team's color.
    #[inline]
    pub fn owns(&self, piece: &Piece) -> bool {
        piece.color() == self.color
    }

    /// Returns true if the piece is in this team's active set.
    pub fn is_active(&self, id: PieceId) -> bool {
        self.active.contains(&id)
    }

    /// Pieces in play, in enlistment order.
    pub fn active(&self) -> &[PieceId] {
        &self.active
    }

    /// Pieces lost to the opponent, in capture order.
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }

    pub(crate) fn enlist(&mut self, id: PieceId) {
        if !self.active.contains(&id) {
            self.active.push(id);
        }
    }

    /// Moves a piece from the active set to the captured list.
    ///
    /// Returns false, changing nothing, if the piece was not active.
    pub(crate) fn record_capture(&mut self, id: PieceId) -> bool {
        match self.active.iter().position(|&a| a == id) {
            Some(index) => {
                self.active.remove(index);
                self.captured.push(id);
                true
            }
            None => false,
        }
    }

    /// Swaps a retired id for its replacement in the active set.
    pub(crate) fn replace(&mut self, old: PieceId, new: PieceId) -> bool {
        match self.active.iter().position(|&a| a == old) {
            Some(index) => {
                self.active.remove(index);
                self.active.push(new);
                true
            }
            None => false,
        }
    }
}
