//! Side representation.

use serde::{Deserialize, Serialize};

/// The two sides of the board.
///
/// Rows are numbered from the top of the board: Dark starts on rows 0 and 1,
/// Light on rows 6 and 7.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    #[default]
    Light = 0,
    Dark = 1,
}

impl Color {
    /// Both colors, Light first (Light always moves first).
    pub const BOTH: [Color; 2] = [Color::Light, Color::Dark];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Returns the index (0 for Light, 1 for Dark).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the row delta of a forward pawn step (-1 for Light, +1 for Dark).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Light => -1,
            Color::Dark => 1,
        }
    }

    /// Returns the row holding this side's back-rank pieces.
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }

    /// Returns the row this side's pawns start on.
    #[inline]
    pub const fn pawn_row(self) -> u8 {
        match self {
            Color::Light => 6,
            Color::Dark => 1,
        }
    }

    /// Returns the row on which this side's pawns promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        self.opposite().home_row()
    }

    /// Returns the label the presentation layer shows for this side.
    pub const fn player_name(self) -> &'static str {
        match self {
            Color::Light => "White Player",
            Color::Dark => "Black Player",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Light => write!(f, "Light"),
            Color::Dark => write!(f, "Dark"),
        }
    }
}
