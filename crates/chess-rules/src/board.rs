//! Piece placement as twelve bitboards, one per piece kind and color.
//!
//! The board answers occupancy, attack and pin queries. It knows nothing
//! about whose turn it is or which moves are legal.

use crate::attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks,
    rook_attacks,
};
use crate::Bitboard;
use chess_core::{Color, FenError, FenFields, File, Piece, PieceKind, Rank, Square};
use std::fmt;

/// Piece placement.
///
/// Planes are indexed by [`Piece::plane`] and never overlap: every square is
/// set in at most one plane.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    planes: [Bitboard; Piece::COUNT],
}

impl Board {
    /// Creates a board with the standard starting layout.
    pub fn new() -> Self {
        let mut planes = [Bitboard::EMPTY; Piece::COUNT];
        for piece in Piece::all() {
            planes[piece.plane()] = Bitboard::start_for(piece);
        }
        Board { planes }
    }

    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            planes: [Bitboard::EMPTY; Piece::COUNT],
        }
    }

    /// Returns the piece on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.planes
            .iter()
            .position(|plane| plane.contains(sq))
            .and_then(Piece::from_plane)
    }

    /// Places `piece` on `sq`, or empties the square when `piece` is `None`.
    ///
    /// Whatever stood on the square before is removed from its plane.
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        for plane in &mut self.planes {
            plane.clear(sq);
        }
        if let Some(piece) = piece {
            self.planes[piece.plane()].set(sq);
        }
    }

    /// Returns the squares holding `piece`.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.planes[piece.plane()]
    }

    /// Returns the squares holding pieces of `kind` and `color`.
    #[inline]
    pub fn pieces_of(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces(Piece::new(kind, color))
    }

    /// Returns every square holding a piece of `color`.
    pub fn color(&self, color: Color) -> Bitboard {
        PieceKind::ALL
            .into_iter()
            .fold(Bitboard::EMPTY, |acc, kind| acc | self.pieces_of(kind, color))
    }

    /// Returns every occupied square.
    pub fn occupied(&self) -> Bitboard {
        self.planes
            .iter()
            .fold(Bitboard::EMPTY, |acc, plane| acc | *plane)
    }

    /// Returns every empty square.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    /// Returns the number of `piece` on the board.
    #[inline]
    pub fn count(&self, piece: Piece) -> u32 {
        self.pieces(piece).count()
    }

    /// Returns the square of the king of `color`, if there is one.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(PieceKind::King, color).lsb_square()
    }

    /// Returns the squares `piece` would attack from `sq` on this board.
    pub fn attacks_from(&self, sq: Square, piece: Piece) -> Bitboard {
        let occupied = self.occupied();
        match piece.kind {
            PieceKind::Pawn => pawn_attacks(sq, piece.color),
            PieceKind::Knight => knight_attacks(sq),
            PieceKind::Bishop => bishop_attacks(sq, occupied),
            PieceKind::Rook => rook_attacks(sq, occupied),
            PieceKind::Queen => queen_attacks(sq, occupied),
            PieceKind::King => king_attacks(sq),
        }
    }

    /// Returns the pieces of `by` that attack `sq`.
    pub fn attackers_to(&self, sq: Square, by: Color) -> Bitboard {
        let occupied = self.occupied();
        let diagonal =
            self.pieces_of(PieceKind::Bishop, by) | self.pieces_of(PieceKind::Queen, by);
        let orthogonal =
            self.pieces_of(PieceKind::Rook, by) | self.pieces_of(PieceKind::Queen, by);

        (pawn_attacks(sq, by.opposite()) & self.pieces_of(PieceKind::Pawn, by))
            | (knight_attacks(sq) & self.pieces_of(PieceKind::Knight, by))
            | (king_attacks(sq) & self.pieces_of(PieceKind::King, by))
            | (bishop_attacks(sq, occupied) & diagonal)
            | (rook_attacks(sq, occupied) & orthogonal)
    }

    /// Returns true if any piece of `by` attacks `sq`.
    #[inline]
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        self.attackers_to(sq, by).is_not_empty()
    }

    /// Returns the enemy pieces attacking the king of `color`.
    ///
    /// A board without such a king has no attackers.
    pub fn attackers_to_king(&self, color: Color) -> Bitboard {
        match self.king_square(color) {
            Some(king) => self.attackers_to(king, color.opposite()),
            None => Bitboard::EMPTY,
        }
    }

    /// Returns the pieces of `color` that are absolutely pinned to their king.
    pub fn pinned(&self, color: Color) -> Bitboard {
        let Some(king_sq) = self.king_square(color) else {
            return Bitboard::EMPTY;
        };
        let them = color.opposite();
        let occupied = self.occupied();
        let own = self.color(color);
        let king = Bitboard::from_square(king_sq);
        let queens = self.pieces_of(PieceKind::Queen, them);
        let rooks = self.pieces_of(PieceKind::Rook, them) | queens;
        let bishops = self.pieces_of(PieceKind::Bishop, them) | queens;

        let pinners = (king.xray_rook_attacks(occupied, own) & rooks)
            | (king.xray_bishop_attacks(occupied, own) & bishops);

        pinners
            .into_iter()
            .fold(Bitboard::EMPTY, |pinned, pinner| {
                pinned | (between(pinner, king_sq) & own)
            })
    }

    /// Iterates over every occupied square and its piece, a1 first.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .into_iter()
            .filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    /// Decodes the piece-placement field of a FEN string.
    ///
    /// Either the whole field decodes or nothing is returned.
    pub fn from_placement(placement: &str) -> Result<Self, FenError> {
        FenFields::validate_piece_placement(placement)?;

        let mut board = Board::empty();
        for (rank, row) in Rank::ALL.into_iter().rev().zip(placement.split('/')) {
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let (Some(piece), Some(f)) =
                    (Piece::from_fen_char(c), File::from_index(file))
                {
                    board.set(Square::new(f, rank), Some(piece));
                    file += 1;
                }
            }
        }
        Ok(board)
    }

    /// Encodes the board as the piece-placement field of a FEN string.
    pub fn to_placement(&self) -> String {
        let mut placement = String::with_capacity(64);
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank != Rank::R1 {
                placement.push('/');
            }
        }
        placement
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_placement())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            write!(f, "{} ", rank)?;
            for file in File::ALL {
                let c = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', Piece::to_fen_char);
                write!(f, "{} ", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
