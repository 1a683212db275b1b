//! ASCII rendering of a game snapshot.

use crate::config::PlayConfig;
use hotseat_core::{Color, Coord, PieceKind};
use hotseat_engine::{Outcome, Phase, Snapshot, TurnReport};

/// Draws the board with row/column indices and algebraic labels.
///
/// With hints on, destinations are bracketed `[ ]`, checking pieces braced
/// `{ }` and a king in check parenthesised `( )`.
pub fn board(snapshot: &Snapshot, show_hints: bool) -> String {
    let hinted = show_hints && !snapshot.highlights.is_empty();
    let mut out = String::from("     0  1  2  3  4  5  6  7\n");
    for row in 0..8u8 {
        out.push_str(&format!("{}  ", row));
        for col in 0..8u8 {
            let Some(at) = Coord::new(row, col) else {
                continue;
            };
            let symbol = snapshot.at(at).map_or('.', |o| o.symbol());
            let (open, close) = if hinted {
                markers(snapshot, at)
            } else {
                (' ', ' ')
            };
            out.push(open);
            out.push(symbol);
            out.push(close);
        }
        out.push_str(&format!("  {}\n", 8 - row));
    }
    out.push_str("     a  b  c  d  e  f  g  h\n");
    out
}

fn markers(snapshot: &Snapshot, at: Coord) -> (char, char) {
    let hints = &snapshot.highlights;
    if hints.king == Some(at) {
        ('(', ')')
    } else if hints.checkers.contains(&at) {
        ('{', '}')
    } else if hints.destinations.contains(&at) {
        ('[', ']')
    } else {
        (' ', ' ')
    }
}

/// One line saying whose turn it is and what they should do.
pub fn status(snapshot: &Snapshot, config: &PlayConfig) -> String {
    let player = label(snapshot.current, config);
    match snapshot.phase {
        Phase::SelectPiece => {
            let check = if snapshot.highlights.king.is_some() {
                " You are in check."
            } else {
                ""
            };
            format!("Turn {}. {}, select a piece.{}", snapshot.turn + 1, player, check)
        }
        Phase::SelectMove => format!("{}, select a destination.", player),
        Phase::SelectPromotion => {
            let choices: Vec<String> = snapshot
                .promotion_choices
                .unwrap_or(PieceKind::PROMOTION_CHOICES)
                .iter()
                .map(|k| format!("{} ({})", k, k.to_symbol(Color::Dark)))
                .collect();
            format!("{}, promote to: {}.", player, choices.join(", "))
        }
        Phase::GameEnd => match snapshot.outcome {
            Some(outcome) => outcome_line(outcome, config),
            None => "Game over.".to_string(),
        },
        Phase::StartTurn | Phase::EndTurn => format!("{} to move.", player),
    }
}

/// Describes a completed turn using the configured player names.
pub fn report(report: &TurnReport, config: &PlayConfig) -> String {
    let mut line = format!("{} moved", label(report.mover, config));
    if let Some((color, kind)) = report.captured {
        line.push_str(&format!(" and captured {}'s {}", config.player_name(color), kind));
    }
    if let Some(kind) = report.promoted {
        line.push_str(&format!(", promoting to {}", kind));
    }
    line.push('.');
    line
}

fn outcome_line(outcome: Outcome, config: &PlayConfig) -> String {
    match outcome {
        Outcome::Checkmate { winner } => {
            format!("Checkmate! {} wins.", label(winner, config))
        }
        Outcome::Stalemate { side } => {
            format!("Stalemate: {} has no moves. The game is drawn.", label(side, config))
        }
    }
}

fn label(color: Color, config: &PlayConfig) -> String {
    format!("{} ({})", config.player_name(color), color)
}
