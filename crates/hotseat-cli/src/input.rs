//! Turning typed lines into commands.

use hotseat_core::{Coord, PieceKind};
use thiserror::Error;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Select the square at raw `(row, col)`; bounds are checked by the game.
    Square { row: i32, col: i32 },
    Promote(PieceKind),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Type a square such as `6 4` or `e2`, or `help`.")]
    Empty,
    #[error("Cannot read `{0}` as a square. Type `help` for the accepted forms.")]
    Unrecognised(String),
    #[error("Choose a promotion: q, r, b or n.")]
    PromotionExpected,
}

/// Parses one line. While a promotion is pending, piece letters and names
/// are read as promotion choices.
pub fn parse(line: &str, promotion_pending: bool) -> Result<Command, InputError> {
    let text = line.trim().to_ascii_lowercase();
    match text.as_str() {
        "" => return Err(InputError::Empty),
        "quit" | "exit" => return Ok(Command::Quit),
        "help" | "?" => return Ok(Command::Help),
        _ => {}
    }

    if promotion_pending {
        return promotion(&text)
            .map(Command::Promote)
            .ok_or(InputError::PromotionExpected);
    }

    if let Some(at) = Coord::from_algebraic(&text) {
        return Ok(Command::Square {
            row: i32::from(at.row()),
            col: i32::from(at.col()),
        });
    }

    let parts: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    if let [row, col] = parts.as_slice() {
        if let (Ok(row), Ok(col)) = (row.parse(), col.parse()) {
            return Ok(Command::Square { row, col });
        }
    }
    Err(InputError::Unrecognised(line.trim().to_string()))
}

fn promotion(text: &str) -> Option<PieceKind> {
    let kind = match text {
        "queen" => PieceKind::Queen,
        "rook" => PieceKind::Rook,
        "bishop" => PieceKind::Bishop,
        "knight" => PieceKind::Knight,
        "king" => PieceKind::King,
        "pawn" => PieceKind::Pawn,
        _ => {
            let mut chars = text.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return None;
            };
            PieceKind::from_symbol(c)?.0
        }
    };
    Some(kind)
}
