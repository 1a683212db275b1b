//! Board diagram parsing and serialization.
//!
//! A diagram is the placement field of FEN: eight rows separated by `/`,
//! row 0 (Dark's back rank) first, digits standing for runs of empty
//! squares. Only placement is described; side to move and clocks are not.

use crate::{Color, Coord, PieceKind, BOARD_SIZE};
use thiserror::Error;

/// Errors that can occur when parsing a board diagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("invalid diagram: expected 8 rows, got {0}")]
    InvalidRowCount(usize),

    #[error("invalid character '{symbol}' in row {row}")]
    InvalidSymbol { symbol: char, row: usize },

    #[error("row {row} has {squares} squares, expected 8")]
    InvalidRowWidth { row: usize, squares: u32 },
}

/// A single piece placement from a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub coord: Coord,
    pub kind: PieceKind,
    pub color: Color,
}

/// A parsed board diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    placements: Vec<Placement>,
}

impl Layout {
    /// The standard starting diagram.
    pub const STANDARD: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    /// Returns the standard starting layout.
    pub fn standard() -> Self {
        Self::parse(Self::STANDARD).expect("STANDARD is valid")
    }

    /// Parses a diagram.
    pub fn parse(diagram: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = diagram.trim().split('/').collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(LayoutError::InvalidRowCount(rows.len()));
        }

        let mut placements = Vec::new();
        for (row, text) in rows.iter().enumerate() {
            let mut squares = 0u32;
            for c in text.chars() {
                if let Some(run) = c.to_digit(10) {
                    squares += run;
                } else if let Some((kind, color)) = PieceKind::from_symbol(c) {
                    if let Some(coord) = Coord::new(row as u8, squares as u8) {
                        placements.push(Placement { coord, kind, color });
                    }
                    squares += 1;
                } else {
                    return Err(LayoutError::InvalidSymbol { symbol: c, row });
                }
            }
            if squares != BOARD_SIZE as u32 {
                return Err(LayoutError::InvalidRowWidth { row, squares });
            }
        }

        Ok(Layout { placements })
    }

    /// Returns the placements in row-major order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Returns the piece placed on `coord`, if any.
    pub fn at(&self, coord: Coord) -> Option<(PieceKind, Color)> {
        self.placements
            .iter()
            .find(|p| p.coord == coord)
            .map(|p| (p.kind, p.color))
    }

    /// Converts the layout back to a diagram.
    pub fn to_diagram(&self) -> String {
        let mut out = String::new();
        for row in 0..BOARD_SIZE {
            if row > 0 {
                out.push('/');
            }
            let mut empty = 0;
            for col in 0..BOARD_SIZE {
                let piece = Coord::new(row, col).and_then(|c| self.at(c));
                match piece {
                    Some((kind, color)) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(kind.to_symbol(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
        }
        out
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::standard()
    }
}
