//! Core types for chess.
//!
//! This crate provides the fundamental value types used by the rules engine:
//! - [`PieceKind`], [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for move representation and coordinate notation
//! - [`FenFields`] for splitting FEN text into its six fields

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenFields};
pub use mov::Move;
pub use piece::{Piece, PieceKind};
pub use square::{File, Rank, Square, SquareParseError};

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn move_serializes_compactly() {
        let m = Move::new(Square::E1, Square::G1);
        let json = serde_json::to_string(&m).unwrap();
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn piece_serializes_by_name() {
        let piece = Piece::new(PieceKind::Queen, Color::Black);
        let json = serde_json::to_string(&piece).unwrap();
        assert_eq!(json, r#"{"kind":"Queen","color":"Black"}"#);
    }
}
