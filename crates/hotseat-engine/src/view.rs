//! What the presentation layer reads back after every tick.

use crate::game::{Outcome, Phase, TurnReport};
use hotseat_core::{Color, Coord, PieceKind};
use serde::Serialize;

/// A piece as seen from outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub color: Color,
    pub kind: PieceKind,
}

impl Occupant {
    /// Diagram symbol: uppercase for Light, lowercase for Dark.
    pub fn symbol(self) -> char {
        self.kind.to_symbol(self.color)
    }
}

/// Squares to highlight, split by purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlights {
    /// Destinations of the selected piece.
    pub destinations: Vec<Coord>,
    /// Squares of the pieces attacking the side to move's king.
    pub checkers: Vec<Coord>,
    /// The side to move's king, when it is in check.
    pub king: Option<Coord>,
}

impl Highlights {
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty() && self.checkers.is_empty() && self.king.is_none()
    }
}

/// Everything a front end needs to draw the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub current: Color,
    pub rules: &'static str,
    /// Completed turns so far.
    pub turn: u32,
    /// Row-major occupancy, row 0 first.
    pub squares: [[Option<Occupant>; 8]; 8],
    pub highlights: Highlights,
    /// The menu shown while a promotion is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_choices: Option<[PieceKind; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_turn: Option<TurnReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Active piece counts, indexed by color.
    pub active: [usize; 2],
    /// Captured piece counts, indexed by color.
    pub captured: [usize; 2],
}

impl Snapshot {
    /// Returns the occupant of `at`.
    pub fn at(&self, at: Coord) -> Option<Occupant> {
        self.squares[at.row() as usize][at.col() as usize]
    }
}
