//! Move representation.

use crate::{Color, File, PieceKind, Square};
use std::fmt;

/// A chess move: a start square, an end square and an optional promotion kind.
///
/// Encoded compactly: 6 bits from, 6 bits to, 3 bits promotion = 15 bits total.
/// The move carries no knowledge of the position it is played in; castling and
/// en passant are recognised by the game from the squares alone.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move(u16);

impl Move {
    /// Creates a move without a promotion choice.
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move((from.index() as u16) | ((to.index() as u16) << 6))
    }

    /// Creates a move that requests promotion to `kind`.
    ///
    /// Any kind can be encoded; whether it is a valid promotion is decided when
    /// the move is executed.
    #[inline]
    pub const fn with_promotion(from: Square, to: Square, kind: PieceKind) -> Self {
        let base = Self::new(from, to).0;
        Move(base | (((kind as u16) + 1) << 12))
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        Square::ALL[(self.0 & 0x3F) as usize]
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        Square::ALL[((self.0 >> 6) & 0x3F) as usize]
    }

    /// Returns the requested promotion kind, if any.
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        match (self.0 >> 12) & 0x7 {
            n @ 1..=6 => Some(PieceKind::ALL[(n - 1) as usize]),
            _ => None,
        }
    }

    /// Signed number of files travelled (positive toward the h-file).
    #[inline]
    pub const fn file_change(self) -> i8 {
        self.to().file().index() as i8 - self.from().file().index() as i8
    }

    /// Signed number of ranks travelled (positive toward rank 8).
    #[inline]
    pub const fn rank_change(self) -> i8 {
        self.to().rank().index() as i8 - self.from().rank().index() as i8
    }

    /// Returns true if the move has the shape of a castle for `color`:
    /// e-file to c- or g-file along that color's back rank.
    pub fn is_castle(self, color: Color) -> bool {
        let from = self.from();
        let to = self.to();
        from.rank() == color.back_rank()
            && to.rank() == from.rank()
            && from.file() == File::E
            && matches!(to.file(), File::C | File::G)
    }

    /// Returns the rook's (corner, destination) squares for a castle-shaped move.
    pub fn castle_rook_squares(self) -> (Square, Square) {
        let rank = self.from().rank();
        if self.file_change() < 0 {
            (Square::new(File::A, rank), Square::new(File::D, rank))
        } else {
            (Square::new(File::H, rank), Square::new(File::F, rank))
        }
    }

    /// Returns the move with start and end swapped, without promotion.
    #[inline]
    pub const fn reversed(self) -> Move {
        Move::new(self.to(), self.from())
    }

    /// Returns the coordinate notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.from(), self.to(), kind.to_char()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }

    /// Parses a move from coordinate notation.
    ///
    /// Accepts four characters (two squares) optionally followed by one of
    /// `n`, `b`, `r`, `q` in either case.
    pub fn from_uci(s: &str) -> Option<Self> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        if s.len() == 5 {
            let kind = PieceKind::from_char(s.chars().nth(4)?)?;
            if !kind.can_promote_to() {
                return None;
            }
            Some(Move::with_promotion(from, to, kind))
        } else {
            Some(Move::new(from, to))
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_encoding() {
        let m = Move::new(sq("e2"), sq("e4"));
        assert_eq!(m.from(), sq("e2"));
        assert_eq!(m.to(), sq("e4"));
        assert_eq!(m.promotion(), None);

        let promo = Move::with_promotion(sq("h7"), sq("h8"), PieceKind::Knight);
        assert_eq!(promo.from(), sq("h7"));
        assert_eq!(promo.to(), Square::H8);
        assert_eq!(promo.promotion(), Some(PieceKind::Knight));
    }

    #[test]
    fn every_kind_can_be_requested() {
        for kind in PieceKind::ALL {
            let m = Move::with_promotion(Square::A1, Square::H8, kind);
            assert_eq!(m.promotion(), Some(kind));
        }
    }

    #[test]
    fn move_uci() {
        assert_eq!(Move::new(sq("e2"), sq("e4")).to_uci(), "e2e4");
        assert_eq!(
            Move::with_promotion(sq("a7"), sq("a8"), PieceKind::Queen).to_uci(),
            "a7a8q"
        );
    }

    #[test]
    fn move_from_uci() {
        let m = Move::from_uci("e2e4").unwrap();
        assert_eq!(m.from().to_algebraic(), "e2");
        assert_eq!(m.to().to_algebraic(), "e4");

        let promo = Move::from_uci("a7a8Q").unwrap();
        assert_eq!(promo.promotion(), Some(PieceKind::Queen));
        assert_eq!(
            Move::from_uci("e7e8r").unwrap().promotion(),
            Some(PieceKind::Rook)
        );

        assert!(Move::from_uci("invalid").is_none());
        assert!(Move::from_uci("e2e9").is_none());
        assert!(Move::from_uci("e7e8k").is_none());
        assert!(Move::from_uci("e7e8x").is_none());
    }

    #[test]
    fn move_from_uci_edge_cases() {
        assert!(Move::from_uci("e2").is_none());
        assert!(Move::from_uci("e2e").is_none());
        assert!(Move::from_uci("e2e4qq").is_none());
        assert!(Move::from_uci("é2e4").is_none());
    }

    #[test]
    fn move_changes() {
        let m = Move::new(sq("b1"), sq("c3"));
        assert_eq!(m.file_change(), 1);
        assert_eq!(m.rank_change(), 2);
        assert_eq!(m.reversed(), Move::new(sq("c3"), sq("b1")));
    }

    #[test]
    fn castle_shapes() {
        let short = Move::new(Square::E1, Square::G1);
        let long = Move::new(Square::E8, Square::C8);
        assert!(short.is_castle(Color::White));
        assert!(!short.is_castle(Color::Black));
        assert!(long.is_castle(Color::Black));
        assert!(!Move::new(Square::E1, Square::F1).is_castle(Color::White));

        assert_eq!(short.castle_rook_squares(), (Square::H1, Square::F1));
        assert_eq!(long.castle_rook_squares(), (Square::A8, Square::D8));
        assert_eq!(
            Move::new(Square::E1, Square::C1).castle_rook_squares(),
            (Square::A1, Square::D1)
        );
        assert_eq!(Square::new(File::D, Rank::R8), Square::D8);
    }

    #[test]
    fn move_debug_display() {
        let m = Move::new(sq("e2"), sq("e4"));
        assert_eq!(format!("{:?}", m), "Move(e2e4)");
        assert_eq!(format!("{}", m), "e2e4");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn square_strategy() -> impl Strategy<Value = Square> {
            proptest::sample::select(Square::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn prop_uci_roundtrip(from in square_strategy(), to in square_strategy()) {
                let mov = Move::new(from, to);
                prop_assert_eq!(Move::from_uci(&mov.to_uci()), Some(mov));
                for kind in PieceKind::PROMOTIONS {
                    let promotion = Move::with_promotion(from, to, kind);
                    let text = promotion.to_uci();
                    prop_assert_eq!(text.len(), 5);
                    prop_assert_eq!(Move::from_uci(&text), Some(promotion));
                }
            }
        }
    }
}
