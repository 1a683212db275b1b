//! Core types for hot-seat chess.
//!
//! This crate provides the plain value types shared by the engine and its
//! front ends:
//! - [`Color`] for the two sides
//! - [`PieceKind`] for the six piece types
//! - [`Coord`] for `(row, col)` board coordinates
//! - [`Layout`] for board diagrams used at setup

mod color;
mod coord;
mod layout;
mod piece;

pub use color::Color;
pub use coord::{Coord, CoordError, BOARD_SIZE};
pub use layout::{Layout, LayoutError, Placement};
pub use piece::PieceKind;
