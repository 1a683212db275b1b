//! The turn state machine.
//!
//! A [`Game`] owns the board and both rosters and walks through the phases
//! of a turn: [`Phase::StartTurn`] computes check and the move dictionary,
//! [`Phase::SelectPiece`] and [`Phase::SelectMove`] wait for square
//! selections, [`Phase::SelectPromotion`] waits for a promotion choice, and
//! [`Phase::EndTurn`] settles captures and hands the move to the other side.
//!
//! Each call to [`Game::tick`] performs exactly one transition. Interactive
//! phases stay put when no event arrives; automatic phases ignore events.

use crate::board::{CheckMap, MoveDict};
use crate::movegen::MoveSet;
use crate::rules::{PseudoLegal, RuleSet};
use crate::view::{Highlights, Occupant, Snapshot};
use crate::{Board, BoardError, Piece, PieceId, Team};
use hotseat_core::{Color, Coord, Layout, PieceKind};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Phases of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    StartTurn,
    SelectPiece,
    SelectMove,
    SelectPromotion,
    EndTurn,
    GameEnd,
}

impl Phase {
    /// Returns true for phases that wait for player input.
    pub const fn is_interactive(self) -> bool {
        matches!(
            self,
            Phase::SelectPiece | Phase::SelectMove | Phase::SelectPromotion
        )
    }

    /// Returns true once the game is over.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::GameEnd)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::StartTurn => "start turn",
            Phase::SelectPiece => "select piece",
            Phase::SelectMove => "select move",
            Phase::SelectPromotion => "select promotion",
            Phase::EndTurn => "end turn",
            Phase::GameEnd => "game end",
        };
        f.write_str(name)
    }
}

/// Input from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A board square was chosen. Coordinates are raw and may be off the board.
    SquareSelected { row: i32, col: i32 },
    /// A piece kind was chosen from the promotion menu.
    PromotionSelected(PieceKind),
}

impl Event {
    pub fn square(row: i32, col: i32) -> Self {
        Event::SquareSelected { row, col }
    }

    pub fn at(coord: Coord) -> Self {
        Event::SquareSelected {
            row: i32::from(coord.row()),
            col: i32::from(coord.col()),
        }
    }
}

/// The transition performed by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub from: Phase,
    pub to: Phase,
}

impl Tick {
    /// Returns true if the machine stayed where it was.
    pub fn is_idle(&self) -> bool {
        self.from == self.to
    }
}

/// An interactive action the machine refused.
///
/// Rejected actions never change the board.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("square ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("there is no piece on {0}")]
    EmptySquare(Coord),

    #[error("the {kind} on {at} belongs to {owner}, not {player}")]
    NotOwned {
        kind: PieceKind,
        at: Coord,
        owner: Color,
        player: Color,
    },

    #[error("the {kind} on {at} has no moves")]
    NoMoves { kind: PieceKind, at: Coord },

    #[error("the {kind} on {from} cannot move to ({row}, {col})")]
    IllegalDestination {
        kind: PieceKind,
        from: Coord,
        row: i32,
        col: i32,
    },

    #[error("cannot promote to {0}; choose a rook, bishop, knight or queen")]
    InvalidPromotion(PieceKind),

    #[error("a promotion choice is pending")]
    PromotionPending,

    #[error("no promotion is pending")]
    NoPromotionPending,

    #[error("no piece is selected")]
    NoSelection,

    #[error("the game is over")]
    GameOver,

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// What happened in a completed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub mover: Color,
    /// Color and kind of the piece taken this turn.
    pub captured: Option<(Color, PieceKind)>,
    /// The kind a pawn was promoted to this turn.
    pub promoted: Option<PieceKind>,
    /// The side whose turn it is now.
    pub next: Color,
}

impl fmt::Display for TurnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} moved", self.mover)?;
        if let Some((color, kind)) = self.captured {
            write!(f, ", capturing the {} {}", color, kind)?;
        }
        if let Some(kind) = self.promoted {
            write!(f, ", promoting to {}", kind)?;
        }
        write!(f, ". {} to move.", self.next)
    }
}

/// How the game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// The side to move had no moves while in check.
    Checkmate { winner: Color },
    /// The side to move had no moves and was not in check.
    Stalemate { side: Color },
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(*winner),
            Outcome::Stalemate { .. } => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "Checkmate! {} wins.", winner),
            Outcome::Stalemate { side } => write!(f, "Stalemate: {} cannot move.", side),
        }
    }
}

/// Per-turn bookkeeping, replaced wholesale on every transition.
#[derive(Debug, Clone, Default)]
struct TurnState {
    phase: Phase,
    current: Color,
    selected: Option<PieceId>,
    destinations: MoveSet,
    checkers: CheckMap,
    moves: MoveDict,
    pending_capture: Option<PieceId>,
    promoted: Option<PieceKind>,
    last_turn: Option<TurnReport>,
    outcome: Option<Outcome>,
    turns: u32,
}

impl TurnState {
    fn new(current: Color) -> Self {
        TurnState {
            current,
            ..Default::default()
        }
    }

    /// Enters `phase`, applying its entry action.
    fn enter(mut self, phase: Phase) -> Self {
        match phase {
            Phase::StartTurn => {
                self.checkers.clear();
                self.moves.clear();
                self.selected = None;
                self.destinations = MoveSet::new();
            }
            Phase::SelectPiece => {
                self.selected = None;
                self.destinations = MoveSet::new();
            }
            Phase::EndTurn | Phase::SelectPromotion => {
                self.destinations = MoveSet::new();
            }
            Phase::SelectMove | Phase::GameEnd => {}
        }
        self.phase = phase;
        self
    }
}

type Step = (TurnState, Result<(), ActionError>);

/// A two-player game on one board.
///
/// Generic over its [`RuleSet`]; the default offers pseudo-legal moves.
#[derive(Debug, Clone)]
pub struct Game<R: RuleSet = PseudoLegal> {
    rules: R,
    board: Board,
    teams: [Team; 2],
    state: TurnState,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a game from the standard position with Light to move.
    pub fn new() -> Self {
        Self::with_rules(PseudoLegal)
    }
}

impl<R: RuleSet> Game<R> {
    /// Creates a game from the standard position under `rules`.
    pub fn with_rules(rules: R) -> Self {
        let (board, teams) = Board::standard();
        Self::from_parts(rules, board, teams, Color::Light)
    }

    /// Creates a game from a layout with `to_move` on turn.
    pub fn from_layout(rules: R, layout: &Layout, to_move: Color) -> Result<Self, BoardError> {
        let (board, teams) = Board::from_layout(layout)?;
        Ok(Self::from_parts(rules, board, teams, to_move))
    }

    /// Creates a game from a prepared board and rosters.
    pub fn from_parts(rules: R, board: Board, teams: [Team; 2], to_move: Color) -> Self {
        debug!(rules = rules.name(), %to_move, "new game");
        Game {
            rules,
            board,
            teams,
            state: TurnState::new(to_move),
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn team(&self, color: Color) -> &Team {
        &self.teams[color.index()]
    }

    pub fn teams(&self) -> &[Team; 2] {
        &self.teams
    }

    /// The side whose turn it is.
    pub fn current(&self) -> Color {
        self.state.current
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// The piece chosen in [`Phase::SelectPiece`], while it is pending.
    pub fn selected(&self) -> Option<&Piece> {
        self.state.selected.and_then(|id| self.board.piece(id))
    }

    /// Destinations of the selected piece.
    pub fn destinations(&self) -> &MoveSet {
        &self.state.destinations
    }

    /// Pieces attacking the current side's king this turn.
    pub fn checkers(&self) -> &CheckMap {
        &self.state.checkers
    }

    /// Moves available to the current side this turn.
    pub fn move_dict(&self) -> &MoveDict {
        &self.state.moves
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    pub fn last_turn(&self) -> Option<TurnReport> {
        self.state.last_turn
    }

    /// Number of completed turns.
    pub fn turn_number(&self) -> u32 {
        self.state.turns
    }

    /// The promotion menu, while a promotion is pending.
    pub fn promotion_choices(&self) -> Option<[PieceKind; 4]> {
        (self.state.phase == Phase::SelectPromotion).then_some(PieceKind::PROMOTION_CHOICES)
    }

    /// Returns true if the current side's king is flagged as in check.
    pub fn in_check(&self) -> bool {
        self.board
            .king_of(self.team(self.state.current))
            .is_some_and(Piece::in_check)
    }

    /// Performs one transition.
    ///
    /// `None` means no input arrived this tick. A rejected action is
    /// returned as an error after the machine has moved to the phase the
    /// transition table prescribes for it.
    pub fn tick(&mut self, event: Option<Event>) -> Result<Tick, ActionError> {
        let from = self.state.phase;
        let state = std::mem::take(&mut self.state);
        let (state, result) = self.step(state, event);
        self.state = state;
        let to = self.state.phase;

        if from != to {
            debug!(%from, %to, side = %self.state.current, "phase transition");
        }
        if let Err(err) = &result {
            warn!(%err, phase = %to, "action rejected");
        }
        result.map(|()| Tick { from, to })
    }

    /// Runs automatic phases until the game waits for input or ends.
    pub fn advance(&mut self) -> Phase {
        while !self.state.phase.is_interactive() && !self.state.phase.is_terminal() {
            if self.tick(None).is_err() {
                break;
            }
        }
        self.state.phase
    }

    /// Delivers one event, then advances to the next waiting phase.
    pub fn handle(&mut self, event: Event) -> Result<Phase, ActionError> {
        self.advance();
        let result = self.tick(Some(event));
        let phase = self.advance();
        result.map(|_| phase)
    }

    /// Captures what a front end needs to draw the current state.
    pub fn snapshot(&self) -> Snapshot {
        let squares = self.board.occupancy().map(|row| {
            row.map(|cell| cell.map(|(color, kind)| Occupant { color, kind }))
        });
        let king = self
            .board
            .king_of(self.team(self.state.current))
            .filter(|k| k.in_check())
            .map(Piece::position);

        Snapshot {
            phase: self.state.phase,
            current: self.state.current,
            rules: self.rules.name(),
            turn: self.state.turns,
            squares,
            highlights: Highlights {
                destinations: self.state.destinations.as_slice().to_vec(),
                checkers: self.state.checkers.values().copied().collect(),
                king,
            },
            promotion_choices: self.promotion_choices(),
            last_turn: self.state.last_turn,
            outcome: self.state.outcome,
            active: [
                self.teams[0].active_count(),
                self.teams[1].active_count(),
            ],
            captured: [
                self.teams[0].captured_count(),
                self.teams[1].captured_count(),
            ],
        }
    }

    fn step(&mut self, state: TurnState, event: Option<Event>) -> Step {
        match (state.phase, event) {
            (Phase::StartTurn, _) => (self.start_turn(state), Ok(())),
            (Phase::EndTurn, _) => (self.end_turn(state), Ok(())),

            (Phase::SelectPiece, None) => (state, Ok(())),
            (Phase::SelectPiece, Some(Event::SquareSelected { row, col })) => {
                self.select_piece(state, row, col)
            }
            (Phase::SelectPiece, Some(Event::PromotionSelected(_))) => {
                (state, Err(ActionError::NoPromotionPending))
            }

            (Phase::SelectMove, None) => (state, Ok(())),
            (Phase::SelectMove, Some(Event::SquareSelected { row, col })) => {
                self.select_move(state, row, col)
            }
            (Phase::SelectMove, Some(Event::PromotionSelected(_))) => (
                state.enter(Phase::SelectPiece),
                Err(ActionError::NoPromotionPending),
            ),

            (Phase::SelectPromotion, None) => (state, Ok(())),
            (Phase::SelectPromotion, Some(Event::PromotionSelected(kind))) => {
                self.select_promotion(state, kind)
            }
            (Phase::SelectPromotion, Some(Event::SquareSelected { .. })) => {
                (state, Err(ActionError::PromotionPending))
            }

            (Phase::GameEnd, None) => (state, Ok(())),
            (Phase::GameEnd, Some(_)) => (state, Err(ActionError::GameOver)),
        }
    }

    fn start_turn(&mut self, mut state: TurnState) -> TurnState {
        let us = &self.teams[state.current.index()];
        let them = &self.teams[state.current.opposite().index()];

        let checkers = self.board.checking_pieces(us, them);
        let in_check = !checkers.is_empty();
        self.board.set_king_in_check(us, in_check);
        let moves = self.rules.move_dict(&self.board, us);
        trace!(
            side = %state.current,
            pieces = moves.len(),
            destinations = moves.values().map(MoveSet::len).sum::<usize>(),
            checkers = checkers.len(),
            "turn started"
        );
        state.checkers = checkers;

        if moves.is_empty() {
            let outcome = if in_check {
                Outcome::Checkmate {
                    winner: state.current.opposite(),
                }
            } else {
                Outcome::Stalemate {
                    side: state.current,
                }
            };
            info!(%outcome, turns = state.turns, "game over");
            state.outcome = Some(outcome);
            return state.enter(Phase::GameEnd);
        }

        state.moves = moves;
        state.enter(Phase::SelectPiece)
    }

    fn select_piece(&self, mut state: TurnState, row: i32, col: i32) -> Step {
        let Ok(at) = Coord::try_from_signed(row, col) else {
            return (state, Err(ActionError::OutOfBounds { row, col }));
        };
        let Some(piece) = self.board.piece_at(at) else {
            return (state, Err(ActionError::EmptySquare(at)));
        };
        if !self.team(state.current).owns(piece) {
            let err = ActionError::NotOwned {
                kind: piece.kind(),
                at,
                owner: piece.color(),
                player: state.current,
            };
            return (state, Err(err));
        }

        state.destinations = state.moves.get(&piece.id()).cloned().unwrap_or_default();
        state.selected = Some(piece.id());
        (state.enter(Phase::SelectMove), Ok(()))
    }

    fn select_move(&mut self, mut state: TurnState, row: i32, col: i32) -> Step {
        let Some(piece) = state.selected.and_then(|id| self.board.piece(id)) else {
            return (state.enter(Phase::SelectPiece), Err(ActionError::NoSelection));
        };
        let (id, kind, from) = (piece.id(), piece.kind(), piece.position());

        if state.destinations.is_empty() {
            return (
                state.enter(Phase::SelectPiece),
                Err(ActionError::NoMoves { kind, at: from }),
            );
        }
        let dest = match Coord::try_from_signed(row, col) {
            Ok(dest) if state.destinations.contains(dest) => dest,
            _ => {
                let err = ActionError::IllegalDestination {
                    kind,
                    from,
                    row,
                    col,
                };
                return (state.enter(Phase::SelectPiece), Err(err));
            }
        };

        let captured = match self.board.move_piece(id, dest) {
            Ok(captured) => captured,
            Err(err) => return (state.enter(Phase::SelectPiece), Err(err.into())),
        };
        if let Some(victim) = captured.and_then(|id| self.board.piece(id)) {
            info!(
                mover = %state.current,
                %kind,
                at = %dest,
                taken = %victim.kind(),
                "capture"
            );
        }
        state.pending_capture = captured;

        let next = if self.board.piece(id).is_some_and(Piece::is_promotable) {
            Phase::SelectPromotion
        } else {
            Phase::EndTurn
        };
        (state.enter(next), Ok(()))
    }

    fn select_promotion(&mut self, mut state: TurnState, kind: PieceKind) -> Step {
        let Some(id) = state.selected else {
            return (state, Err(ActionError::NoSelection));
        };
        if !kind.is_promotion_choice() {
            return (state, Err(ActionError::InvalidPromotion(kind)));
        }

        let team = &mut self.teams[state.current.index()];
        match self.board.promote(team, id, kind) {
            Ok(new_id) => {
                info!(side = %state.current, %kind, "promotion");
                state.selected = Some(new_id);
                state.promoted = Some(kind);
                (state.enter(Phase::EndTurn), Ok(()))
            }
            Err(err) => (state, Err(err.into())),
        }
    }

    fn end_turn(&mut self, mut state: TurnState) -> TurnState {
        let mover = state.current;
        let next = mover.opposite();

        let mut captured = None;
        if let Some(victim) = state.pending_capture.take() {
            if !self.teams[next.index()].record_capture(victim) {
                warn!(%victim, side = %next, "captured piece was not in the active roster");
            }
            captured = self.board.piece(victim).map(|p| (p.color(), p.kind()));
        }
        self.board.set_king_in_check(&self.teams[mover.index()], false);

        state.last_turn = Some(TurnReport {
            mover,
            captured,
            promoted: state.promoted.take(),
            next,
        });
        state.current = next;
        state.turns += 1;
        state.enter(Phase::StartTurn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Strict;

    fn at(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    fn game_from(diagram: &str, to_move: Color) -> Game {
        Game::from_layout(PseudoLegal, &Layout::parse(diagram).unwrap(), to_move).unwrap()
    }

    #[test]
    fn starts_in_start_turn() {
        let game = Game::new();
        assert_eq!(game.phase(), Phase::StartTurn);
        assert_eq!(game.current(), Color::Light);
        assert_eq!(game.turn_number(), 0);
    }

    #[test]
    fn kingless_layout_is_refused() {
        let empty = Layout::parse("8/8/8/8/8/8/8/8").unwrap();
        assert_eq!(
            Game::from_layout(PseudoLegal, &empty, Color::Light).unwrap_err(),
            BoardError::KingCount {
                color: Color::Light,
                found: 0
            }
        );
    }

    #[test]
    fn start_turn_computes_moves() {
        let mut game = Game::new();
        let tick = game.tick(None).unwrap();
        assert_eq!(tick, Tick { from: Phase::StartTurn, to: Phase::SelectPiece });
        assert_eq!(game.move_dict().len(), 10);
        assert!(game.checkers().is_empty());
    }

    #[test]
    fn idle_ticks_stay_put() {
        let mut game = Game::new();
        game.advance();
        let tick = game.tick(None).unwrap();
        assert!(tick.is_idle());
        assert_eq!(game.phase(), Phase::SelectPiece);
    }

    #[test]
    fn select_and_move_a_pawn() {
        let mut game = Game::new();
        game.advance();

        game.tick(Some(Event::square(6, 4))).unwrap();
        assert_eq!(game.phase(), Phase::SelectMove);
        assert_eq!(game.destinations().len(), 2);
        assert_eq!(game.selected().map(Piece::kind), Some(PieceKind::Pawn));

        game.tick(Some(Event::square(4, 4))).unwrap();
        assert_eq!(game.phase(), Phase::EndTurn);
        game.tick(None).unwrap();
        assert_eq!(game.phase(), Phase::StartTurn);
        assert_eq!(game.current(), Color::Dark);
        assert_eq!(game.turn_number(), 1);

        let report = game.last_turn().unwrap();
        assert_eq!(report.mover, Color::Light);
        assert_eq!(report.next, Color::Dark);
        assert_eq!(report.captured, None);
    }

    #[test]
    fn invalid_selections_stay_in_select_piece() {
        let mut game = Game::new();
        game.advance();

        assert_eq!(
            game.tick(Some(Event::square(8, 0))),
            Err(ActionError::OutOfBounds { row: 8, col: 0 })
        );
        assert_eq!(
            game.tick(Some(Event::square(4, 4))),
            Err(ActionError::EmptySquare(at(4, 4)))
        );
        assert!(matches!(
            game.tick(Some(Event::square(1, 4))),
            Err(ActionError::NotOwned { owner: Color::Dark, player: Color::Light, .. })
        ));
        assert_eq!(game.phase(), Phase::SelectPiece);
    }

    #[test]
    fn bad_destination_discards_selection() {
        let mut game = Game::new();
        game.advance();
        let before = game.board().clone();

        game.tick(Some(Event::square(6, 4))).unwrap();
        let err = game.tick(Some(Event::square(3, 4))).unwrap_err();
        assert!(matches!(err, ActionError::IllegalDestination { row: 3, col: 4, .. }));
        assert_eq!(game.phase(), Phase::SelectPiece);
        assert!(game.selected().is_none());
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn stuck_piece_discards_selection() {
        let mut game = Game::new();
        game.advance();

        // The rook in the corner is boxed in.
        game.tick(Some(Event::square(7, 0))).unwrap();
        assert!(game.destinations().is_empty());
        let err = game.tick(Some(Event::square(6, 0))).unwrap_err();
        assert!(matches!(err, ActionError::NoMoves { kind: PieceKind::Rook, .. }));
        assert_eq!(game.phase(), Phase::SelectPiece);
    }

    #[test]
    fn capture_is_settled_at_end_turn() {
        let mut game = game_from("4k3/8/8/3p4/4P3/8/8/4K3", Color::Light);
        game.advance();
        game.tick(Some(Event::square(4, 4))).unwrap();
        game.tick(Some(Event::square(3, 3))).unwrap();

        // Taken off the grid, still on the roster until the turn ends.
        assert_eq!(game.team(Color::Dark).active_count(), 2);
        game.tick(None).unwrap();
        assert_eq!(game.team(Color::Dark).active_count(), 1);
        assert_eq!(game.team(Color::Dark).captured_count(), 1);
        assert_eq!(
            game.last_turn().unwrap().captured,
            Some((Color::Dark, PieceKind::Pawn))
        );
    }

    #[test]
    fn stale_capture_leaves_rosters_alone() {
        let mut game = game_from("4k3/8/8/8/8/8/8/4K3", Color::Light);
        game.state.pending_capture = Some(PieceId(99));
        game.state = std::mem::take(&mut game.state).enter(Phase::EndTurn);

        game.tick(None).unwrap();
        assert_eq!(game.phase(), Phase::StartTurn);
        assert_eq!(game.current(), Color::Dark);
        assert_eq!(game.team(Color::Dark).active_count(), 1);
        assert_eq!(game.team(Color::Dark).captured_count(), 0);
        assert_eq!(game.last_turn().unwrap().captured, None);
    }

    #[test]
    fn promotion_flow() {
        let mut game = game_from("4k3/P7/8/8/8/8/8/4K3", Color::Light);
        game.advance();
        game.handle(Event::square(1, 0)).unwrap();
        let phase = game.handle(Event::square(0, 0)).unwrap();
        assert_eq!(phase, Phase::SelectPromotion);
        assert_eq!(game.promotion_choices(), Some(PieceKind::PROMOTION_CHOICES));

        assert_eq!(
            game.tick(Some(Event::square(0, 1))),
            Err(ActionError::PromotionPending)
        );
        assert_eq!(
            game.tick(Some(Event::PromotionSelected(PieceKind::King))),
            Err(ActionError::InvalidPromotion(PieceKind::King))
        );
        assert_eq!(game.phase(), Phase::SelectPromotion);

        game.tick(Some(Event::PromotionSelected(PieceKind::Queen))).unwrap();
        assert_eq!(game.phase(), Phase::EndTurn);
        let queen = game.board().piece_at(at(0, 0)).unwrap();
        assert_eq!(queen.kind(), PieceKind::Queen);
        assert_eq!(game.team(Color::Light).active_count(), 2);
    }

    #[test]
    fn checkmate_reports_winner() {
        let mut game = Game::from_layout(
            Strict,
            &Layout::parse("R5k1/5ppp/8/8/8/8/8/6K1").unwrap(),
            Color::Dark,
        )
        .unwrap();
        assert_eq!(game.advance(), Phase::GameEnd);
        assert_eq!(game.outcome(), Some(Outcome::Checkmate { winner: Color::Light }));
        assert!(game.in_check());
        assert_eq!(game.checkers().values().copied().collect::<Vec<_>>(), vec![at(0, 0)]);
    }

    #[test]
    fn stalemate_reports_side() {
        // The dark king is boxed in by the light queen without being attacked.
        let mut game = game_from("k7/2Q5/8/8/8/8/8/7K", Color::Dark);
        game.advance();
        // Pseudo rules still let the king walk into attack.
        assert_eq!(game.phase(), Phase::SelectPiece);

        let mut strict =
            Game::from_layout(Strict, &Layout::parse("k7/2Q5/8/8/8/8/8/7K").unwrap(), Color::Dark)
                .unwrap();
        assert_eq!(strict.advance(), Phase::GameEnd);
        assert_eq!(strict.outcome(), Some(Outcome::Stalemate { side: Color::Dark }));
        assert!(!strict.in_check());
    }

    #[test]
    fn game_end_rejects_events() {
        let mut game = Game::from_layout(
            Strict,
            &Layout::parse("k7/2Q5/8/8/8/8/8/7K").unwrap(),
            Color::Dark,
        )
        .unwrap();
        game.advance();
        assert_eq!(game.tick(Some(Event::square(0, 0))), Err(ActionError::GameOver));
        assert!(game.tick(None).unwrap().is_idle());
    }

    #[test]
    fn check_flag_cleared_after_turn() {
        let mut game = game_from("4k3/8/8/8/8/8/8/r3K3", Color::Light);
        game.advance();
        assert!(game.in_check());
        assert_eq!(game.snapshot().highlights.king, Some(at(7, 4)));

        game.handle(Event::square(7, 4)).unwrap();
        game.handle(Event::square(6, 4)).unwrap();
        assert_eq!(game.current(), Color::Dark);
        let light_king = game.board().king_of(game.team(Color::Light)).unwrap();
        assert!(!light_king.in_check());
    }

    #[test]
    fn snapshot_reflects_selection() {
        let mut game = Game::new();
        game.advance();
        game.handle(Event::square(7, 1)).unwrap();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.phase, Phase::SelectMove);
        assert_eq!(snapshot.rules, "pseudo");
        assert_eq!(snapshot.active, [16, 16]);
        let mut dests = snapshot.highlights.destinations.clone();
        dests.sort();
        assert_eq!(dests, vec![at(5, 0), at(5, 2)]);
        assert_eq!(
            snapshot.at(at(7, 1)),
            Some(Occupant { color: Color::Light, kind: PieceKind::Knight })
        );
    }
}
