//! Board state: the piece arena, the 8x8 grid, and the operations that
//! mutate them.

use crate::movegen::{generate_moves, MoveSet};
use crate::{Piece, PieceId, Team};
use hotseat_core::{Color, Coord, CoordError, Layout, PieceKind};
use std::collections::BTreeMap;
use thiserror::Error;

/// Attacking pieces and their squares, keyed by id.
pub type CheckMap = BTreeMap<PieceId, Coord>;

/// Destinations for every piece of a team that has at least one move.
pub type MoveDict = BTreeMap<PieceId, MoveSet>;

/// Errors raised by board setup, queries, and mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    OutOfBounds(#[from] CoordError),

    #[error("square {0} is already occupied")]
    Occupied(Coord),

    #[error("no piece {0} on the board")]
    UnknownPiece(PieceId),

    #[error("{kind} at {from} cannot move to {to}")]
    IllegalMove {
        kind: PieceKind,
        from: Coord,
        to: Coord,
    },

    #[error("only pawns can be promoted, not a {0}")]
    NotAPawn(PieceKind),

    #[error("{team} does not own the piece at {at}")]
    NotOwned { team: Color, at: Coord },

    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),

    #[error("{color} must have exactly one king, found {found}")]
    KingCount { color: Color, found: usize },
}

/// The 8x8 board.
///
/// Pieces live in an arena indexed by [`PieceId`]; the grid holds ids only.
/// A piece's stored position and the grid cell referring to it change
/// together, in [`Board::relocate`], and nowhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: [Option<PieceId>; 64],
    pieces: Vec<Option<Piece>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Board {
            grid: [None; 64],
            pieces: Vec::with_capacity(32),
        }
    }

    /// Creates the standard starting position with both teams.
    pub fn standard() -> (Self, [Team; 2]) {
        Self::from_layout(&Layout::standard()).expect("standard layout is valid")
    }

    /// Builds a board and its two teams from a diagram.
    ///
    /// Teams are returned indexed by [`Color::index`]. Each side must have
    /// exactly one king.
    pub fn from_layout(layout: &Layout) -> Result<(Self, [Team; 2]), BoardError> {
        let mut board = Board::new();
        let mut teams = [Team::new(Color::Light), Team::new(Color::Dark)];
        for placement in layout.placements() {
            let id = board.place(placement.color, placement.kind, placement.coord)?;
            teams[placement.color.index()].enlist(id);
        }
        for team in &teams {
            let found = team
                .active()
                .iter()
                .filter_map(|&id| board.piece(id))
                .filter(|p| p.kind() == PieceKind::King)
                .count();
            if found != 1 {
                return Err(BoardError::KingCount {
                    color: team.color(),
                    found,
                });
            }
        }
        Ok((board, teams))
    }

    /// Returns true if `(row, col)` lies on the board.
    #[inline]
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        Coord::in_bounds(row, col)
    }

    /// Returns the piece at `(row, col)`, failing if it is off the board.
    pub fn get(&self, row: i32, col: i32) -> Result<Option<&Piece>, BoardError> {
        let at = Coord::try_from_signed(row, col)?;
        Ok(self.piece_at(at))
    }

    /// Returns true if `(row, col)` is on the board and holds no piece.
    pub fn is_empty(&self, row: i32, col: i32) -> bool {
        Coord::try_from_signed(row, col).is_ok_and(|at| self.is_vacant(at))
    }

    /// Returns true if `at` holds no piece.
    #[inline]
    pub fn is_vacant(&self, at: Coord) -> bool {
        self.grid[at.index()].is_none()
    }

    /// Returns the piece occupying `at`.
    #[inline]
    pub fn piece_at(&self, at: Coord) -> Option<&Piece> {
        self.grid[at.index()].and_then(|id| self.piece(id))
    }

    /// Returns a piece by id, whether or not it is still on the board.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns true if the piece currently occupies a square.
    pub fn on_board(&self, id: PieceId) -> bool {
        self.piece(id)
            .is_some_and(|p| self.grid[p.position().index()] == Some(id))
    }

    /// Iterates over the pieces occupying the board, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.grid.iter().filter_map(|cell| cell.and_then(|id| self.piece(id)))
    }

    /// Returns the king of `team` if it is on the board.
    pub fn king_of(&self, team: &Team) -> Option<&Piece> {
        team.active()
            .iter()
            .filter(|&&id| self.on_board(id))
            .filter_map(|&id| self.piece(id))
            .find(|p| p.kind() == PieceKind::King)
    }

    /// Places a new piece during setup.
    pub fn place(&mut self, color: Color, kind: PieceKind, at: Coord) -> Result<PieceId, BoardError> {
        if !self.is_vacant(at) {
            return Err(BoardError::Occupied(at));
        }
        let id = self.allocate(color, kind, at);
        self.grid[at.index()] = Some(id);
        Ok(id)
    }

    /// Moves a piece to `dest`, returning whatever stood there.
    ///
    /// The destination must be one of the piece's pseudo-legal moves;
    /// otherwise nothing changes. A returned piece has left the grid but is
    /// still in its team's active set until the caller records the capture.
    pub fn move_piece(&mut self, id: PieceId, dest: Coord) -> Result<Option<PieceId>, BoardError> {
        let piece = self.live(id)?;
        let from = piece.position();
        if !generate_moves(self, piece).contains(dest) {
            return Err(BoardError::IllegalMove {
                kind: piece.kind(),
                from,
                to: dest,
            });
        }

        let captured = self.grid[dest.index()];
        self.relocate(id, dest);
        if let Some(piece) = self.piece_mut(id) {
            piece.after_move(from);
        }
        tracing::trace!(%id, %from, to = %dest, ?captured, "piece moved");
        Ok(captured)
    }

    /// Replaces a pawn with a new piece of `new_kind` on the same square.
    ///
    /// The pawn's id is retired. `team` loses the pawn and gains the new
    /// piece, so its active count is unchanged.
    pub fn promote(&mut self, team: &mut Team, id: PieceId, new_kind: PieceKind) -> Result<PieceId, BoardError> {
        let pawn = self.live(id)?;
        if pawn.kind() != PieceKind::Pawn {
            return Err(BoardError::NotAPawn(pawn.kind()));
        }
        if !team.owns(pawn) || !team.is_active(id) {
            return Err(BoardError::NotOwned {
                team: team.color(),
                at: pawn.position(),
            });
        }
        if !new_kind.is_promotion_choice() {
            return Err(BoardError::InvalidPromotion(new_kind));
        }

        let (color, at) = (pawn.color(), pawn.position());
        let new_id = self.allocate(color, new_kind, at);
        if let Some(piece) = self.piece_mut(new_id) {
            piece.after_move(at);
        }
        self.grid[at.index()] = Some(new_id);
        self.pieces[id.index()] = None;
        team.replace(id, new_id);
        tracing::debug!(old = %id, new = %new_id, kind = %new_kind, %at, "pawn promoted");
        Ok(new_id)
    }

    /// Finds every attacker piece whose moves include the defender's king.
    pub fn checking_pieces(&self, defender: &Team, attacker: &Team) -> CheckMap {
        let Some(king) = self.king_of(defender) else {
            return CheckMap::new();
        };
        let target = king.position();
        attacker
            .active()
            .iter()
            .filter(|&&id| self.on_board(id))
            .filter_map(|&id| self.piece(id))
            .filter(|p| generate_moves(self, p).contains(target))
            .map(|p| (p.id(), p.position()))
            .collect()
    }

    /// Finds every piece of `by` whose moves include `target`.
    ///
    /// Unlike [`checking_pieces`](Self::checking_pieces) this reads the grid
    /// only, so it works on scratch boards without team rosters.
    pub fn attackers_of(&self, target: Coord, by: Color) -> CheckMap {
        self.pieces()
            .filter(|p| p.color() == by)
            .filter(|p| generate_moves(self, p).contains(target))
            .map(|p| (p.id(), p.position()))
            .collect()
    }

    /// Pseudo-legal destinations for each on-board piece of `team`.
    ///
    /// Pieces without moves are left out, so an empty map means the team
    /// cannot move at all.
    pub fn move_dict(&self, team: &Team) -> MoveDict {
        team.active()
            .iter()
            .filter(|&&id| self.on_board(id))
            .filter_map(|&id| self.piece(id))
            .map(|p| (p.id(), generate_moves(self, p)))
            .filter(|(_, moves)| !moves.is_empty())
            .collect()
    }

    /// Sets or clears the in-check flag on `team`'s king.
    pub fn set_king_in_check(&mut self, team: &Team, in_check: bool) {
        if let Some(id) = self.king_of(team).map(Piece::id) {
            if let Some(king) = self.piece_mut(id) {
                king.set_in_check(in_check);
            }
        }
    }

    /// Returns `(color, kind)` for every square, row by row.
    pub fn occupancy(&self) -> [[Option<(Color, PieceKind)>; 8]; 8] {
        let mut rows = [[None; 8]; 8];
        for at in Coord::all() {
            rows[at.row() as usize][at.col() as usize] =
                self.piece_at(at).map(|p| (p.color(), p.kind()));
        }
        rows
    }

    /// Checks that every grid reference agrees with the stored position.
    pub fn is_consistent(&self) -> bool {
        Coord::all().all(|at| match self.grid[at.index()] {
            Some(id) => self.piece(id).is_some_and(|p| p.position() == at),
            None => true,
        })
    }

    fn allocate(&mut self, color: Color, kind: PieceKind, at: Coord) -> PieceId {
        let id = PieceId(self.pieces.len() as u16);
        self.pieces.push(Some(Piece::new(id, color, kind, at)));
        id
    }

    fn live(&self, id: PieceId) -> Result<&Piece, BoardError> {
        if self.on_board(id) {
            self.piece(id).ok_or(BoardError::UnknownPiece(id))
        } else {
            Err(BoardError::UnknownPiece(id))
        }
    }

    fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// The only place a piece's position changes.
    fn relocate(&mut self, id: PieceId, to: Coord) {
        let Some(piece) = self.piece_mut(id) else {
            return;
        };
        let from = piece.position();
        piece.set_position(to);
        self.grid[from.index()] = None;
        self.grid[to.index()] = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    fn setup(diagram: &str) -> (Board, [Team; 2]) {
        Board::from_layout(&Layout::parse(diagram).unwrap()).unwrap()
    }

    fn id_at(board: &Board, row: u8, col: u8) -> PieceId {
        board.piece_at(at(row, col)).expect("piece on square").id()
    }

    #[test]
    fn standard_setup_counts() {
        let (board, teams) = Board::standard();
        for team in &teams {
            assert_eq!(team.active_count(), 16);
            assert_eq!(team.captured_count(), 0);
            let count = |kind| {
                team.active()
                    .iter()
                    .filter(|&&id| board.piece(id).map(Piece::kind) == Some(kind))
                    .count()
            };
            assert_eq!(count(PieceKind::Pawn), 8);
            assert_eq!(count(PieceKind::Rook), 2);
            assert_eq!(count(PieceKind::Knight), 2);
            assert_eq!(count(PieceKind::Bishop), 2);
            assert_eq!(count(PieceKind::Queen), 1);
            assert_eq!(count(PieceKind::King), 1);
        }
        assert_eq!(board.pieces().count(), 32);
        assert!(board.is_consistent());
    }

    #[test]
    fn place_rejects_occupied_square() {
        let mut board = Board::new();
        board.place(Color::Light, PieceKind::Rook, at(7, 0)).unwrap();
        assert_eq!(
            board.place(Color::Dark, PieceKind::Knight, at(7, 0)),
            Err(BoardError::Occupied(at(7, 0)))
        );
    }

    #[test]
    fn layout_needs_one_king_per_side() {
        let build = |diagram| Board::from_layout(&Layout::parse(diagram).unwrap());
        assert_eq!(
            build("8/8/8/8/8/8/8/8").unwrap_err(),
            BoardError::KingCount {
                color: Color::Light,
                found: 0
            }
        );
        assert_eq!(
            build("4k3/8/8/8/8/8/8/r2KK3").unwrap_err(),
            BoardError::KingCount {
                color: Color::Light,
                found: 2
            }
        );
        assert_eq!(
            build("8/8/8/8/8/8/8/R2K4").unwrap_err(),
            BoardError::KingCount {
                color: Color::Dark,
                found: 0
            }
        );
        assert!(build("4k3/8/8/8/8/8/8/4K3").is_ok());
    }

    #[test]
    fn bounded_queries() {
        let (board, _) = Board::standard();
        assert!(board.get(8, 0).is_err());
        assert!(matches!(
            board.get(-1, 3),
            Err(BoardError::OutOfBounds(CoordError { row: -1, col: 3 }))
        ));
        assert_eq!(
            board.get(7, 4).unwrap().map(Piece::kind),
            Some(PieceKind::King)
        );
        assert!(board.get(4, 4).unwrap().is_none());
        assert!(board.in_bounds(0, 7));
        assert!(!board.in_bounds(0, 8));
        assert!(board.is_empty(4, 4));
        assert!(!board.is_empty(6, 4));
        assert!(!board.is_empty(9, 9));
    }

    #[test]
    fn move_updates_grid_and_position() {
        let (mut board, _) = Board::standard();
        let pawn = id_at(&board, 6, 4);
        let captured = board.move_piece(pawn, at(4, 4)).unwrap();
        assert_eq!(captured, None);
        assert!(board.is_vacant(at(6, 4)));
        assert_eq!(board.piece_at(at(4, 4)).map(Piece::id), Some(pawn));
        assert_eq!(board.piece(pawn).unwrap().position(), at(4, 4));
        assert!(board.piece(pawn).unwrap().has_moved());
        assert!(board.is_consistent());
    }

    #[test]
    fn illegal_move_is_a_no_op() {
        let (mut board, _) = Board::standard();
        let before = board.clone();
        let pawn = id_at(&board, 6, 4);
        assert!(matches!(
            board.move_piece(pawn, at(3, 4)),
            Err(BoardError::IllegalMove { .. })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn capture_returns_victim_without_touching_teams() {
        let (mut board, teams) = setup("4k3/8/8/8/8/3p4/4P3/4K3");
        let pawn = id_at(&board, 6, 4);
        let victim = id_at(&board, 5, 3);
        let captured = board.move_piece(pawn, at(5, 3)).unwrap();
        assert_eq!(captured, Some(victim));
        assert!(!board.on_board(victim));
        assert!(teams[Color::Dark.index()].is_active(victim));
        assert!(board.piece(pawn).unwrap().passant_spent());
        assert!(board.is_consistent());
    }

    #[test]
    fn promote_replaces_pawn() {
        let (mut board, mut teams) = setup("4k3/P7/8/8/8/8/8/4K3");
        let pawn = id_at(&board, 1, 0);
        board.move_piece(pawn, at(0, 0)).unwrap();
        assert!(board.piece(pawn).unwrap().is_promotable());

        let light = &mut teams[Color::Light.index()];
        let before = light.active_count();
        let queen = board.promote(light, pawn, PieceKind::Queen).unwrap();
        assert_eq!(light.active_count(), before);
        assert!(light.is_active(queen));
        assert!(!light.is_active(pawn));
        assert!(board.piece(pawn).is_none());
        assert_eq!(
            board.piece_at(at(0, 0)).map(|p| (p.kind(), p.color())),
            Some((PieceKind::Queen, Color::Light))
        );
    }

    #[test]
    fn promote_guards() {
        let (mut board, mut teams) = setup("4k3/P7/8/8/8/8/8/R3K3");
        let pawn = id_at(&board, 1, 0);
        let rook = id_at(&board, 7, 0);
        let [light, dark] = &mut teams;

        assert_eq!(
            board.promote(light, rook, PieceKind::Queen),
            Err(BoardError::NotAPawn(PieceKind::Rook))
        );
        assert_eq!(
            board.promote(dark, pawn, PieceKind::Queen),
            Err(BoardError::NotOwned {
                team: Color::Dark,
                at: at(1, 0)
            })
        );
        assert_eq!(
            board.promote(light, pawn, PieceKind::King),
            Err(BoardError::InvalidPromotion(PieceKind::King))
        );
        assert_eq!(
            board.promote(light, pawn, PieceKind::Pawn),
            Err(BoardError::InvalidPromotion(PieceKind::Pawn))
        );
        assert_eq!(board.piece_at(at(1, 0)).map(Piece::id), Some(pawn));
    }

    #[test]
    fn checking_pieces_finds_attackers() {
        let (board, teams) = setup("4k3/8/8/8/1b6/8/8/r3K2R");
        let [light, dark] = &teams;
        let checks = board.checking_pieces(light, dark);
        let mut squares: Vec<Coord> = checks.values().copied().collect();
        squares.sort();
        assert_eq!(squares, vec![at(4, 1), at(7, 0)]);
        assert!(board.checking_pieces(dark, light).is_empty());
        assert_eq!(board.attackers_of(at(7, 4), Color::Dark).len(), 2);
    }

    #[test]
    fn move_dict_omits_stuck_pieces() {
        let (board, teams) = Board::standard();
        let dict = board.move_dict(&teams[Color::Light.index()]);
        // Eight pawns and two knights can move.
        assert_eq!(dict.len(), 10);
        assert_eq!(dict.values().map(MoveSet::len).sum::<usize>(), 20);
    }

    #[test]
    fn king_in_check_flag() {
        let (mut board, teams) = setup("4k3/8/8/8/8/8/8/r3K3");
        let light = &teams[Color::Light.index()];
        board.set_king_in_check(light, true);
        assert!(board.king_of(light).unwrap().in_check());
        board.set_king_in_check(light, false);
        assert!(!board.king_of(light).unwrap().in_check());
    }

    #[test]
    fn occupancy_snapshot() {
        let (board, _) = Board::standard();
        let rows = board.occupancy();
        assert_eq!(rows[0][4], Some((Color::Dark, PieceKind::King)));
        assert_eq!(rows[7][3], Some((Color::Light, PieceKind::Queen)));
        assert_eq!(rows[4][4], None);
    }
}
