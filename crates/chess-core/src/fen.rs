//! FEN (Forsyth-Edwards Notation) field splitting and syntax checks.
//!
//! This module only checks that each of the six fields is well formed.
//! Whether the fields describe a reachable position is decided by the engine.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Errors that can occur when splitting FEN strings into fields.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// The six fields of a FEN record.
///
/// Piece placement and castling availability are kept as text; the engine
/// turns them into its board and castling types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenFields {
    /// Piece placement string (e.g., "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
    pub piece_placement: String,
    /// Side to move.
    pub active_color: Color,
    /// Castling availability (e.g., "KQkq", "-")
    pub castling: String,
    /// En passant target square, if any.
    pub en_passant: Option<Square>,
    /// Halfmove clock (for 50-move rule)
    pub halfmove_clock: u32,
    /// Fullmove number, at least 1.
    pub fullmove_number: u32,
}

/// Parses a move counter written as plain decimal digits.
fn parse_counter(text: &str) -> Option<u32> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl FenFields {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Splits and checks a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let piece_placement = parts[0];
        Self::validate_piece_placement(piece_placement)?;

        let mut side = parts[1].chars();
        let active_color = match (side.next().and_then(Color::from_fen_char), side.next()) {
            (Some(color), None) => color,
            _ => return Err(FenError::InvalidActiveColor(parts[1].to_string())),
        };

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = match parts[3] {
            "-" => None,
            text => Some(
                Square::from_algebraic(text)
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(text.to_string()))?,
            ),
        };

        let halfmove_clock = parse_counter(parts[4])
            .ok_or_else(|| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parse_counter(parts[5])
            .filter(|&n| n > 0)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenFields {
            piece_placement: piece_placement.to_string(),
            active_color,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Checks a placement field: 8 ranks of exactly 8 files each, run lengths
    /// 1-8 and known piece letters only.
    pub fn validate_piece_placement(placement: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        for (i, rank) in ranks.iter().enumerate() {
            let mut squares = 0;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "run length {} in rank {}",
                            run,
                            8 - i
                        )));
                    }
                    squares += run;
                } else if Piece::from_fen_char(c).is_some() {
                    squares += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - i
                    )));
                }
            }
            if squares != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - i,
                    squares
                )));
            }
        }

        Ok(())
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        let mut seen = String::new();
        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
            if seen.contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "duplicate right '{}'",
                    c
                )));
            }
            seen.push(c);
        }

        Ok(())
    }

    /// Joins the fields back into a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.piece_placement,
            self.active_color.to_fen_char(),
            self.castling,
            self.en_passant
                .map_or_else(|| "-".to_string(), Square::to_algebraic),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
