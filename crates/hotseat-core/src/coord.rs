//! Board coordinate representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 8;

/// Error raised when raw coordinates fall outside the board.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("coordinate ({row}, {col}) is outside the board")]
pub struct CoordError {
    pub row: i32,
    pub col: i32,
}

/// A square on the board, addressed by `(row, col)`.
///
/// Row 0 is the top of the board (Dark's back rank), column 0 the left edge.
/// A `Coord` is always in bounds; raw input goes through
/// [`Coord::try_from_signed`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Creates a coordinate, or `None` if either index is 8 or more.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Coord { row, col })
        } else {
            None
        }
    }

    /// Creates a coordinate from signed input such as a presentation event.
    pub fn try_from_signed(row: i32, col: i32) -> Result<Self, CoordError> {
        if Self::in_bounds(row, col) {
            Ok(Coord {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(CoordError { row, col })
        }
    }

    /// Returns true if `(row, col)` lies on the board.
    #[inline]
    pub const fn in_bounds(row: i32, col: i32) -> bool {
        row >= 0 && row < BOARD_SIZE as i32 && col >= 0 && col < BOARD_SIZE as i32
    }

    /// Creates a coordinate from a grid index (0-63, row-major).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Coord {
                row: (index / 8) as u8,
                col: (index % 8) as u8,
            })
        } else {
            None
        }
    }

    /// Returns the row (0-7).
    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (0-7).
    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the row-major grid index (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Returns the coordinate shifted by `(dr, dc)`, if it stays on the board.
    #[inline]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i32 + dr as i32;
        let col = self.col as i32 + dc as i32;
        Self::try_from_signed(row, col).ok()
    }

    /// Iterates over all 64 squares, row by row.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..64).filter_map(Coord::from_index)
    }

    /// Parses an algebraic label such as `"e2"`.
    ///
    /// Files `a`-`h` map to columns 0-7; ranks `8`-`1` map to rows 0-7.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Coord::new(b'8' - rank, file - b'a')
    }

    /// Returns the algebraic label for this square.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.col) as char, 8 - self.row)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_bounds() {
        assert!(Coord::new(0, 0).is_some());
        assert!(Coord::new(7, 7).is_some());
        assert!(Coord::new(8, 0).is_none());
        assert!(Coord::new(0, 8).is_none());
    }

    #[test]
    fn signed_input() {
        assert_eq!(Coord::try_from_signed(6, 4), Ok(Coord::new(6, 4).unwrap()));
        assert_eq!(
            Coord::try_from_signed(-1, 3),
            Err(CoordError { row: -1, col: 3 })
        );
        assert!(Coord::try_from_signed(3, 8).is_err());
        assert!(!Coord::in_bounds(8, 8));
    }

    #[test]
    fn offset() {
        let c = Coord::new(0, 0).unwrap();
        assert_eq!(c.offset(1, 2), Coord::new(1, 2));
        assert_eq!(c.offset(-1, 0), None);
        assert_eq!(Coord::new(7, 7).unwrap().offset(0, 1), None);
    }

    #[test]
    fn index_roundtrip() {
        for (i, c) in Coord::all().enumerate() {
            assert_eq!(c.index(), i);
        }
        assert_eq!(Coord::all().count(), 64);
        assert_eq!(Coord::from_index(64), None);
    }

    #[test]
    fn algebraic() {
        assert_eq!(Coord::from_algebraic("a8"), Coord::new(0, 0));
        assert_eq!(Coord::from_algebraic("e2"), Coord::new(6, 4));
        assert_eq!(Coord::from_algebraic("H1"), Coord::new(7, 7));
        assert_eq!(Coord::from_algebraic("i1"), None);
        assert_eq!(Coord::from_algebraic("a9"), None);
        assert_eq!(Coord::from_algebraic(""), None);
        assert_eq!(Coord::new(6, 4).unwrap().to_algebraic(), "e2");
    }

    #[test]
    fn display() {
        let c = Coord::new(6, 4).unwrap();
        assert_eq!(format!("{}", c), "(6, 4)");
        assert_eq!(format!("{:?}", c), "Coord(6, 4)");
    }

    proptest::proptest! {
        #[test]
        fn signed_lookup_matches_bounds(row in -20i32..20, col in -20i32..20) {
            let inside = (0..8).contains(&row) && (0..8).contains(&col);
            proptest::prop_assert_eq!(Coord::try_from_signed(row, col).is_ok(), inside);
            proptest::prop_assert_eq!(Coord::in_bounds(row, col), inside);
        }

        #[test]
        fn offset_stays_on_board(index in 0usize..64, dr in -8i8..8, dc in -8i8..8) {
            let from = Coord::from_index(index).unwrap();
            let expected = Coord::in_bounds(
                i32::from(from.row()) + i32::from(dr),
                i32::from(from.col()) + i32::from(dc),
            );
            proptest::prop_assert_eq!(from.offset(dr, dc).is_some(), expected);
        }
    }
}
