//! Full game management with history tracking.
//!
//! The [`Game`] struct owns the mutable state of a match: placement, side to
//! move, castling rights, en passant target and clocks, plus one
//! [`UndoRecord`] per executed ply so that every move can be taken back
//! exactly. Legal move generation lives in [`crate::movegen`].

use crate::{Bitboard, Board, CastlingRights, DrawReason, Outcome, Position, PositionError};
use chess_core::{Color, Move, Piece, PieceKind, Square};
use thiserror::Error;
use tracing::debug;

/// Error type for game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// No piece stands on the start square.
    #[error("no piece on {0}")]
    MissingPiece(Square),

    /// The destination is not among the legal destinations of the start square.
    #[error("illegal move {mov} for {side} in {board}")]
    IllegalMove {
        mov: Move,
        side: Color,
        /// Piece placement at the time of the attempt.
        board: String,
    },

    /// Pawns may only promote to a knight, bishop, rook or queen.
    #[error("cannot promote to {0}")]
    InvalidPromotion(PieceKind),

    /// Move text that is not coordinate notation.
    #[error("cannot read move '{0}'")]
    InvalidMoveText(String),
}

/// Everything needed to take one ply back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoRecord {
    /// The move as executed, with the promotion kind if one happened.
    pub mov: Move,
    /// The piece that moved, before any promotion.
    pub piece: Piece,
    /// The piece that was captured, if any.
    pub capture: Option<Piece>,
    /// En passant target before the move.
    pub en_passant: Option<Square>,
    /// Attackers of the mover's king before the move.
    pub king_attackers: Bitboard,
    /// Halfmove clock before the move.
    pub halfmove_clock: u32,
    /// Castling rights before the move.
    pub castling: CastlingRights,
}

/// A chess game that can execute and undo moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    fullmove_number: u32,
    /// Fullmove number of the position the game started from.
    start_fullmove: u32,
    /// Whether black moved first, which shifts fullmove counting by one ply.
    black_started: bool,
    /// Pieces giving check to the side to move.
    pub(crate) king_attackers: Bitboard,
    history: Vec<UndoRecord>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_valid_position(Position::startpos())
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(position: Position) -> Result<Self, PositionError> {
        position.validate()?;
        Ok(Self::from_valid_position(position))
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Position::from_fen(fen).map(Self::from_valid_position)
    }

    fn from_valid_position(position: Position) -> Self {
        let king_attackers = position.board.attackers_to_king(position.side_to_move);
        Game {
            board: position.board,
            side_to_move: position.side_to_move,
            castling: position.castling,
            en_passant: position.en_passant,
            halfmove_clock: position.halfmove_clock,
            fullmove_number: position.fullmove_number,
            start_fullmove: position.fullmove_number,
            black_started: position.side_to_move == Color::Black,
            king_attackers,
            history: Vec::new(),
        }
    }

    /// Returns a snapshot of the current position.
    pub fn position(&self) -> Position {
        Position {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Returns the current piece placement.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the current full move number.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the pieces currently checking the side to move.
    #[inline]
    pub fn king_attackers(&self) -> Bitboard {
        self.king_attackers
    }

    /// Returns true if the side to move is in check.
    #[inline]
    pub fn king_is_checked(&self) -> bool {
        self.king_attackers.is_not_empty()
    }

    /// Returns true if the side to move is checked by two pieces at once.
    #[inline]
    pub fn king_is_double_checked(&self) -> bool {
        self.king_attackers.has_more_than_one()
    }

    /// Returns the undo records, oldest first.
    pub fn history(&self) -> &[UndoRecord] {
        &self.history
    }

    /// Returns the moves played so far, oldest first.
    pub fn played_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|record| record.mov)
    }

    /// Returns the number of half-moves (plies) played.
    #[inline]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Returns the piece captured by the last move, if it captured.
    pub fn last_capture(&self) -> Option<Piece> {
        self.history.last().and_then(|record| record.capture)
    }

    /// Returns true if the side to move has no legal move.
    ///
    /// This includes positions where the fifty-move rule applies.
    pub fn is_finished(&self) -> bool {
        !self.has_legal_move(true)
    }

    /// Returns how the game ended, or `None` while it is still running.
    ///
    /// Checkmate and stalemate take precedence over the fifty-move rule.
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.has_legal_move(false) {
            return Some(if self.king_is_checked() {
                Outcome::Checkmate {
                    winner: self.side_to_move.opposite(),
                }
            } else {
                Outcome::Draw(DrawReason::Stalemate)
            });
        }
        (self.halfmove_clock >= 100).then_some(Outcome::Draw(DrawReason::FiftyMoveRule))
    }

    /// Executes a legal move.
    ///
    /// `promotion` is only consulted when a pawn reaches the last rank. The
    /// game is left untouched when an error is returned.
    pub fn execute(&mut self, mov: Move, promotion: PieceKind) -> Result<(), GameError> {
        let from = mov.from();
        if self.board.piece_at(from).is_none() {
            return Err(GameError::MissingPiece(from));
        }
        if !self.moves_bitboard_from(from).contains(mov.to()) {
            return Err(self.reject(mov));
        }

        let mover = self.side_to_move;
        self.execute_unchecked(Move::new(from, mov.to()), promotion)?;
        debug!(
            mov = %mov,
            %mover,
            halfmove_clock = self.halfmove_clock,
            "executed move"
        );
        Ok(())
    }

    /// Executes a move, promoting to the kind it carries or to a queen.
    ///
    /// A promotion kind on a move that does not promote is rejected.
    pub fn play(&mut self, mov: Move) -> Result<(), GameError> {
        if mov.promotion().is_some() && !self.promotes(mov) {
            return Err(self.reject(mov));
        }
        self.execute(mov, mov.promotion().unwrap_or(PieceKind::Queen))
    }

    fn reject(&self, mov: Move) -> GameError {
        let error = GameError::IllegalMove {
            mov,
            side: self.side_to_move,
            board: self.board.to_placement(),
        };
        debug!(%error, "rejected move");
        error
    }

    /// Executes a move given in coordinate notation, e.g. `e2e4` or `e7e8n`.
    pub fn play_uci(&mut self, text: &str) -> Result<(), GameError> {
        let mov =
            Move::from_uci(text).ok_or_else(|| GameError::InvalidMoveText(text.to_string()))?;
        self.play(mov)
    }

    /// Applies a move without checking that it is legal.
    ///
    /// Only the promotion choice is checked, before anything is mutated.
    pub(crate) fn execute_unchecked(
        &mut self,
        mov: Move,
        promotion: PieceKind,
    ) -> Result<(), GameError> {
        let from = mov.from();
        let to = mov.to();
        let piece = self
            .board
            .piece_at(from)
            .ok_or(GameError::MissingPiece(from))?;
        let us = self.side_to_move;
        let is_pawn = piece.kind == PieceKind::Pawn;

        let promotes = is_pawn && to.rank() == piece.color.promotion_rank();
        if promotes && !promotion.can_promote_to() {
            return Err(GameError::InvalidPromotion(promotion));
        }
        let capture_square = if is_pawn && Some(to) == self.en_passant {
            to.with_rank(from.rank())
        } else {
            to
        };
        let capture = self.board.piece_at(capture_square);

        self.history.push(UndoRecord {
            mov: if promotes {
                Move::with_promotion(from, to, promotion)
            } else {
                Move::new(from, to)
            },
            piece,
            capture,
            en_passant: self.en_passant,
            king_attackers: self.king_attackers,
            halfmove_clock: self.halfmove_clock,
            castling: self.castling,
        });

        let landed = if promotes {
            Piece::new(promotion, piece.color)
        } else {
            piece
        };
        self.board.set(capture_square, None);
        self.board.set(from, None);
        self.board.set(to, Some(landed));
        if piece.kind == PieceKind::King && mov.is_castle(piece.color) {
            let (corner, crossed) = mov.castle_rook_squares();
            let rook = self.board.piece_at(corner);
            self.board.set(corner, None);
            self.board.set(crossed, rook);
        }

        match piece.kind {
            PieceKind::King => self.castling.remove_color(piece.color),
            PieceKind::Rook => self.castling.remove_rook_square(from),
            _ => {}
        }
        if capture.is_some() {
            self.castling.remove_rook_square(capture_square);
        }

        self.halfmove_clock = if is_pawn || capture.is_some() {
            0
        } else {
            self.halfmove_clock.saturating_add(1)
        };
        self.en_passant = if is_pawn && mov.rank_change().abs() == 2 {
            Square::from_index((from.index() + to.index()) / 2)
        } else {
            None
        };

        self.side_to_move = us.opposite();
        self.update_fullmove_number();
        // A mover left in check is never reported as checking the opponent.
        self.king_attackers = if self.board.attackers_to_king(us).is_not_empty() {
            Bitboard::EMPTY
        } else {
            self.board.attackers_to_king(self.side_to_move)
        };
        Ok(())
    }

    /// Takes back the last move and returns it, or `None` if nothing was played.
    pub fn undo(&mut self) -> Option<Move> {
        let record = self.history.pop()?;
        let from = record.mov.from();
        let to = record.mov.to();
        let piece = record.piece;

        self.board.set(to, None);
        self.board.set(from, Some(piece));
        if let Some(captured) = record.capture {
            let square = if piece.kind == PieceKind::Pawn && Some(to) == record.en_passant {
                to.with_rank(from.rank())
            } else {
                to
            };
            self.board.set(square, Some(captured));
        }
        if piece.kind == PieceKind::King && record.mov.is_castle(piece.color) {
            let (corner, crossed) = record.mov.castle_rook_squares();
            let rook = self.board.piece_at(crossed);
            self.board.set(crossed, None);
            self.board.set(corner, rook);
        }

        self.castling = record.castling;
        self.en_passant = record.en_passant;
        self.halfmove_clock = record.halfmove_clock;
        self.king_attackers = record.king_attackers;
        self.side_to_move = self.side_to_move.opposite();
        self.update_fullmove_number();

        debug!(
            mov = %record.mov,
            mover = %self.side_to_move,
            halfmove_clock = self.halfmove_clock,
            "undid move"
        );
        Some(record.mov)
    }

    fn update_fullmove_number(&mut self) {
        let plies = self.history.len() as u32 + u32::from(self.black_started);
        self.fullmove_number = self.start_fullmove.saturating_add(plies / 2);
    }

    /// A copy of the current state without history, for trial execution.
    pub(crate) fn trial_copy(&self) -> Game {
        Game {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            start_fullmove: self.start_fullmove,
            black_started: self.black_started,
            king_attackers: self.king_attackers,
            history: Vec::new(),
        }
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position().to_fen()
    }
}
