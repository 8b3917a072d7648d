//! Castling rights and the squares each right depends on.

use crate::Bitboard;
use chess_core::{Color, File, Square};
use std::fmt;

/// Which wing of the board a castle goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// A single castling right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingRight {
    WhiteKingside = 0b0001,
    WhiteQueenside = 0b0010,
    BlackKingside = 0b0100,
    BlackQueenside = 0b1000,
}

impl CastlingRight {
    /// All rights in FEN order: `K`, `Q`, `k`, `q`.
    pub const ALL: [CastlingRight; 4] = [
        CastlingRight::WhiteKingside,
        CastlingRight::WhiteQueenside,
        CastlingRight::BlackKingside,
        CastlingRight::BlackQueenside,
    ];

    pub const fn new(color: Color, side: CastleSide) -> Self {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => CastlingRight::WhiteKingside,
            (Color::White, CastleSide::Queenside) => CastlingRight::WhiteQueenside,
            (Color::Black, CastleSide::Kingside) => CastlingRight::BlackKingside,
            (Color::Black, CastleSide::Queenside) => CastlingRight::BlackQueenside,
        }
    }

    #[inline]
    const fn flag(self) -> u8 {
        self as u8
    }

    pub const fn color(self) -> Color {
        match self {
            CastlingRight::WhiteKingside | CastlingRight::WhiteQueenside => Color::White,
            CastlingRight::BlackKingside | CastlingRight::BlackQueenside => Color::Black,
        }
    }

    pub const fn side(self) -> CastleSide {
        match self {
            CastlingRight::WhiteKingside | CastlingRight::BlackKingside => CastleSide::Kingside,
            CastlingRight::WhiteQueenside | CastlingRight::BlackQueenside => CastleSide::Queenside,
        }
    }

    /// The FEN letter for this right.
    pub const fn to_char(self) -> char {
        match self {
            CastlingRight::WhiteKingside => 'K',
            CastlingRight::WhiteQueenside => 'Q',
            CastlingRight::BlackKingside => 'k',
            CastlingRight::BlackQueenside => 'q',
        }
    }

    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(CastlingRight::WhiteKingside),
            'Q' => Some(CastlingRight::WhiteQueenside),
            'k' => Some(CastlingRight::BlackKingside),
            'q' => Some(CastlingRight::BlackQueenside),
            _ => None,
        }
    }

    /// The square the king must stand on for this right to be usable.
    pub const fn king_square(self) -> Square {
        Square::new(File::E, self.color().back_rank())
    }

    /// The square the king lands on.
    pub const fn king_destination(self) -> Square {
        let file = match self.side() {
            CastleSide::Kingside => File::G,
            CastleSide::Queenside => File::C,
        };
        Square::new(file, self.color().back_rank())
    }

    /// The corner the rook starts in.
    pub const fn rook_square(self) -> Square {
        let file = match self.side() {
            CastleSide::Kingside => File::H,
            CastleSide::Queenside => File::A,
        };
        Square::new(file, self.color().back_rank())
    }

    /// The square the rook lands on, the one the king crosses.
    pub const fn rook_destination(self) -> Square {
        let file = match self.side() {
            CastleSide::Kingside => File::F,
            CastleSide::Queenside => File::D,
        };
        Square::new(file, self.color().back_rank())
    }

    /// Squares that must be unoccupied between king and rook.
    pub const fn must_be_empty(self) -> Bitboard {
        let bits: u64 = match self.side() {
            CastleSide::Kingside => 0x60,
            CastleSide::Queenside => 0x0E,
        };
        match self.color() {
            Color::White => Bitboard(bits),
            Color::Black => Bitboard(bits << 56),
        }
    }

    /// Squares the king stands on, crosses or lands on; none may be attacked.
    pub const fn king_path(self) -> Bitboard {
        let bits: u64 = match self.side() {
            CastleSide::Kingside => 0x70,
            CastleSide::Queenside => 0x1C,
        };
        match self.color() {
            Color::White => Bitboard(bits),
            Color::Black => Bitboard(bits << 56),
        }
    }

    /// The right tied to a rook corner, if `sq` is one of the four corners.
    pub fn for_rook_square(sq: Square) -> Option<Self> {
        CastlingRight::ALL
            .into_iter()
            .find(|right| right.rook_square() == sq)
    }
}

impl fmt::Display for CastlingRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The set of castling rights still held by both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn contains(self, right: CastlingRight) -> bool {
        (self.0 & right.flag()) != 0
    }

    #[inline]
    pub fn insert(&mut self, right: CastlingRight) {
        self.0 |= right.flag();
    }

    #[inline]
    pub fn remove(&mut self, right: CastlingRight) {
        self.0 &= !right.flag();
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(CastlingRight::new(color, CastleSide::Kingside));
        self.remove(CastlingRight::new(color, CastleSide::Queenside));
    }

    /// Removes the right whose rook starts on `sq`, if any.
    pub fn remove_rook_square(&mut self, sq: Square) {
        if let Some(right) = CastlingRight::for_rook_square(sq) {
            self.remove(right);
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if `color` still holds either right.
    #[inline]
    pub const fn any_for(self, color: Color) -> bool {
        self.contains(CastlingRight::new(color, CastleSide::Kingside))
            || self.contains(CastlingRight::new(color, CastleSide::Queenside))
    }

    /// Iterates over the held rights in FEN order.
    pub fn iter(self) -> impl Iterator<Item = CastlingRight> {
        CastlingRight::ALL
            .into_iter()
            .filter(move |right| self.contains(*right))
    }

    /// Parses the castling field of a FEN string.
    ///
    /// The field syntax is checked by the FEN parser; unknown letters are
    /// rejected here as well.
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(CastlingRights::NONE);
        }
        let mut rights = CastlingRights::NONE;
        for c in field.chars() {
            rights.insert(CastlingRight::from_char(c)?);
        }
        Some(rights)
    }

    /// Returns the FEN castling field (`-` when no right is held).
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        self.iter().map(CastlingRight::to_char).collect()
    }
}

impl FromIterator<CastlingRight> for CastlingRights {
    fn from_iter<I: IntoIterator<Item = CastlingRight>>(iter: I) -> Self {
        let mut rights = CastlingRights::NONE;
        for right in iter {
            rights.insert(right);
        }
        rights
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
