//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Each pawn arriving on its promotion row branches into one node per
//! promotion choice.

use crate::rules::RuleSet;
use crate::{Board, PieceId, Team};
use hotseat_core::{Color, Coord, PieceKind};

/// Counts the number of leaf nodes at the given depth for `side` to move.
pub fn perft<R: RuleSet>(rules: &R, board: &Board, teams: &[Team; 2], side: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let dict = rules.move_dict(board, &teams[side.index()]);
    let mut nodes = 0u64;
    for (&id, moves) in &dict {
        for &dest in moves {
            for (next_board, next_teams) in play(board, teams, side, id, dest) {
                nodes += if depth == 1 {
                    1
                } else {
                    perft(rules, &next_board, &next_teams, side.opposite(), depth - 1)
                };
            }
        }
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide<R: RuleSet>(
    rules: &R,
    board: &Board,
    teams: &[Team; 2],
    side: Color,
    depth: u32,
) -> Vec<(String, u64)> {
    let dict = rules.move_dict(board, &teams[side.index()]);
    let mut results = Vec::new();

    for (&id, moves) in &dict {
        let Some(from) = board.piece(id).map(|p| p.position()) else {
            continue;
        };
        for &dest in moves {
            let nodes = play(board, teams, side, id, dest)
                .iter()
                .map(|(b, t)| {
                    if depth > 1 {
                        perft(rules, b, t, side.opposite(), depth - 1)
                    } else {
                        1
                    }
                })
                .sum::<u64>();
            results.push((format!("{}{}", from.to_algebraic(), dest.to_algebraic()), nodes));
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// Plays one move on copies of the board and rosters, settling any capture.
fn play(board: &Board, teams: &[Team; 2], side: Color, id: PieceId, dest: Coord) -> Vec<(Board, [Team; 2])> {
    let mut board = board.clone();
    let mut teams = teams.clone();
    let Ok(captured) = board.move_piece(id, dest) else {
        return Vec::new();
    };
    if let Some(victim) = captured {
        teams[side.opposite().index()].record_capture(victim);
    }

    if !board.piece(id).is_some_and(|p| p.is_promotable()) {
        return vec![(board, teams)];
    }
    PieceKind::PROMOTION_CHOICES
        .iter()
        .filter_map(|&kind| {
            let mut board = board.clone();
            let mut teams = teams.clone();
            board
                .promote(&mut teams[side.index()], id, kind)
                .ok()
                .map(|_| (board, teams))
        })
        .collect()
}
