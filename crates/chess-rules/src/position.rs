//! Chess position representation.

use chess_core::{Color, FenError, FenFields, Piece, PieceKind, Rank, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::{Board, CastlingRight, CastlingRights};

/// Reasons a position cannot be built from FEN text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("malformed FEN: {0}")]
    MalformedFen(#[from] FenError),

    #[error("{0} must have exactly one king")]
    WrongKingCount(Color),

    #[error("castling right {0} needs the king on its start square")]
    MissingKing(CastlingRight),

    #[error("castling right {0} needs a rook in its corner")]
    MissingRook(CastlingRight),

    #[error("en passant target on rank {0} does not fit the side to move")]
    WrongEnPassantTargetRank(Rank),

    #[error("en passant target {0} is occupied by {1}")]
    NonEmptyEnPassantTarget(Square, Piece),

    #[error("no pawn to capture en passant on {0}")]
    MissingEnPassantPawn(Square),

    #[error("en passant origin {0} is occupied by {1}")]
    NonEmptyEnPassantSquare(Square, Piece),
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece placement.
    pub board: Board,

    /// The side to move.
    pub side_to_move: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Halfmove clock for 50-move rule.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl Position {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Position {
            board: Board::new(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates a position from a FEN string and checks that it is consistent.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let fields = FenFields::parse(fen)?;
        let board = Board::from_placement(&fields.piece_placement)?;
        let castling = CastlingRights::from_fen(&fields.castling)
            .ok_or_else(|| FenError::InvalidCastlingRights(fields.castling.clone()))?;

        let position = Position {
            board,
            side_to_move: fields.active_color,
            castling,
            en_passant: fields.en_passant,
            halfmove_clock: fields.halfmove_clock,
            fullmove_number: fields.fullmove_number,
        };
        position.validate()?;
        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        FenFields {
            piece_placement: self.board.to_placement(),
            active_color: self.side_to_move,
            castling: self.castling.to_fen(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Checks the structural rules every playable position obeys.
    pub fn validate(&self) -> Result<(), PositionError> {
        let result = self.check_kings().and_then(|()| self.check_en_passant());
        if let Err(error) = &result {
            tracing::debug!(%error, fen = %self.to_fen(), "rejected position");
        }
        result
    }

    fn check_kings(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            if self.board.count(Piece::new(PieceKind::King, color)) != 1 {
                return Err(PositionError::WrongKingCount(color));
            }
        }
        for right in self.castling.iter() {
            let king = Piece::new(PieceKind::King, right.color());
            let rook = Piece::new(PieceKind::Rook, right.color());
            if self.board.piece_at(right.king_square()) != Some(king) {
                return Err(PositionError::MissingKing(right));
            }
            if self.board.piece_at(right.rook_square()) != Some(rook) {
                return Err(PositionError::MissingRook(right));
            }
        }
        Ok(())
    }

    fn check_en_passant(&self) -> Result<(), PositionError> {
        let Some(target) = self.en_passant else {
            return Ok(());
        };
        // The side that just double-pushed is the one not to move.
        let pusher = self.side_to_move.opposite();
        let (target_rank, pawn_rank, origin_rank) = match pusher {
            Color::White => (Rank::R3, Rank::R4, Rank::R2),
            Color::Black => (Rank::R6, Rank::R5, Rank::R7),
        };

        if target.rank() != target_rank {
            return Err(PositionError::WrongEnPassantTargetRank(target.rank()));
        }
        if let Some(piece) = self.board.piece_at(target) {
            return Err(PositionError::NonEmptyEnPassantTarget(target, piece));
        }
        let pawn_square = target.with_rank(pawn_rank);
        if self.board.piece_at(pawn_square) != Some(Piece::new(PieceKind::Pawn, pusher)) {
            return Err(PositionError::MissingEnPassantPawn(pawn_square));
        }
        let origin = target.with_rank(origin_rank);
        if let Some(piece) = self.board.piece_at(origin) {
            return Err(PositionError::NonEmptyEnPassantSquare(origin, piece));
        }
        Ok(())
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.board.piece_at(sq)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
