//! Two-player chess rules with an explicit turn state machine.
//!
//! This crate provides:
//! - [`Board`] - an arena of pieces addressed by [`PieceId`] plus the 8x8 grid
//! - [`Team`] - each side's active and captured rosters
//! - [`generate_moves`] - pseudo-legal destinations per piece kind
//! - [`RuleSet`] - which destinations a side may choose ([`PseudoLegal`] or [`Strict`])
//! - [`Game`] - the turn state machine driven by [`Event`]s
//! - [`Snapshot`] - what a front end reads back after every tick
//!
//! # Example
//!
//! ```
//! use hotseat_engine::{Event, Game, Phase};
//! use hotseat_core::Color;
//!
//! let mut game = Game::new();
//! assert_eq!(game.advance(), Phase::SelectPiece);
//!
//! // Light pushes the e-pawn two squares.
//! game.handle(Event::square(6, 4)).unwrap();
//! game.handle(Event::square(4, 4)).unwrap();
//! assert_eq!(game.current(), Color::Dark);
//! ```

mod board;
mod game;
pub mod movegen;
mod piece;
pub mod rules;
mod team;
mod view;

pub use board::{Board, BoardError, CheckMap, MoveDict};
pub use game::{ActionError, Event, Game, Outcome, Phase, Tick, TurnReport};
pub use movegen::{generate_moves, MoveSet};
pub use piece::{Piece, PieceId};
pub use rules::{leaves_king_safe, PseudoLegal, RuleSet, Strict};
pub use team::Team;
pub use view::{Highlights, Occupant, Snapshot};
