//! Bitboard representation and operations.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the
//! chess board. Besides set algebra this module holds the bit tricks the rest
//! of the engine is built on: De Bruijn bit scans, parallel population count,
//! wrap-masked shifts and occluded fills for sliding pieces.

use chess_core::{Color, File, Piece, PieceKind, Rank, Square};
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

/// The De Bruijn multiplier paired with [`BIT_INDEX`].
const DEBRUIJN: u64 = 0x03f7_9d71_b4cb_0a89;

/// Square index of an isolated bit, addressed by `(bit * DEBRUIJN) >> 58`.
#[rustfmt::skip]
const BIT_INDEX: [u8; 64] = [
     0,  1, 48,  2, 57, 49, 28,  3,
    61, 58, 50, 42, 38, 29, 17,  4,
    62, 55, 59, 36, 53, 51, 43, 22,
    45, 39, 33, 30, 24, 18, 12,  5,
    63, 47, 56, 27, 60, 41, 37, 16,
    54, 35, 52, 21, 44, 32, 23, 11,
    46, 26, 40, 15, 34, 20, 31, 10,
    25, 14, 19,  9, 13,  8,  7,  6,
];

/// The eight compass directions a bitboard can be shifted toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Rook directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Bishop directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];
}

/// A 64-bit board representation.
///
/// Bit 0 = a1, bit 1 = b1, ..., bit 63 = h8 (little-endian rank-file mapping).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// Empty bitboard (no squares set).
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Full bitboard (all squares set).
    pub const FULL: Bitboard = Bitboard(!0);

    /// The outer ring of squares.
    pub const EDGES: Bitboard = Bitboard(0xFF81_8181_8181_81FF);

    // File masks
    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_B: Bitboard = Bitboard(0x0202_0202_0202_0202);
    pub const FILE_G: Bitboard = Bitboard(0x4040_4040_4040_4040);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    // Rank masks
    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_2: Bitboard = Bitboard(0x0000_0000_0000_FF00);
    pub const RANK_7: Bitboard = Bitboard(0x00FF_0000_0000_0000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    const NOT_FILE_A: u64 = !Self::FILE_A.0;
    const NOT_FILE_AB: u64 = !(Self::FILE_A.0 | Self::FILE_B.0);
    const NOT_FILE_H: u64 = !Self::FILE_H.0;
    const NOT_FILE_GH: u64 = !(Self::FILE_G.0 | Self::FILE_H.0);

    /// Creates a bitboard from a raw u64.
    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    /// Creates a bitboard with a single square set.
    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1u64 << sq.index())
    }

    /// Returns the mask of every square on `file`.
    #[inline]
    pub const fn file(file: File) -> Self {
        Bitboard(Self::FILE_A.0 << file.index())
    }

    /// Returns the mask of every square on `rank`.
    #[inline]
    pub const fn rank(rank: Rank) -> Self {
        Bitboard(Self::RANK_1.0 << (rank.index() * 8))
    }

    /// Returns the squares `piece` occupies in the standard starting position.
    pub const fn start_for(piece: Piece) -> Self {
        let white: u64 = match piece.kind {
            PieceKind::Pawn => 0xFF00,
            PieceKind::Knight => 0x0042,
            PieceKind::Bishop => 0x0024,
            PieceKind::Rook => 0x0081,
            PieceKind::Queen => 0x0008,
            PieceKind::King => 0x0010,
        };
        match (piece.color, piece.kind) {
            (Color::White, _) => Bitboard(white),
            (Color::Black, PieceKind::Pawn) => Bitboard(white << 40),
            (Color::Black, _) => Bitboard(white << 56),
        }
    }

    /// Returns true if the bitboard is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the bitboard is not empty.
    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Returns true if more than one square is set.
    #[inline]
    pub const fn has_more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    /// Returns true if the two bitboards share a square.
    #[inline]
    pub const fn intersects(self, other: Bitboard) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the number of set bits, summed in parallel across the word.
    #[inline]
    pub const fn count(self) -> u32 {
        let mut n = self.0;
        n -= (n >> 1) & 0x5555_5555_5555_5555;
        n = (n & 0x3333_3333_3333_3333) + ((n >> 2) & 0x3333_3333_3333_3333);
        n = (n + (n >> 4)) & 0x0F0F_0F0F_0F0F_0F0F;
        (n.wrapping_mul(0x0101_0101_0101_0101) >> 56) as u32
    }

    /// Returns true if the given square is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq.index())) != 0
    }

    /// Sets the given square.
    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u64 << sq.index();
    }

    /// Clears the given square.
    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u64 << sq.index());
    }

    /// Toggles the given square.
    #[inline]
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= 1u64 << sq.index();
    }

    /// Returns a bitboard holding only the lowest set bit.
    #[inline]
    pub const fn lsb(self) -> Bitboard {
        Bitboard(self.0 & self.0.wrapping_neg())
    }

    /// Returns a bitboard holding only the highest set bit.
    #[inline]
    pub const fn msb(self) -> Bitboard {
        if self.0 == 0 {
            return Bitboard::EMPTY;
        }
        let mut x = self.0;
        x |= x >> 1;
        x |= x >> 2;
        x |= x >> 4;
        x |= x >> 8;
        x |= x >> 16;
        x |= x >> 32;
        Bitboard((x >> 1) + 1)
    }

    /// Maps a single-bit bitboard to its square index.
    #[inline]
    const fn isolated_index(bit: Bitboard) -> Option<u8> {
        if bit.0 == 0 {
            None
        } else {
            Some(BIT_INDEX[(bit.0.wrapping_mul(DEBRUIJN) >> 58) as usize])
        }
    }

    /// Returns the index of the least significant bit (0-63).
    /// Returns None if the bitboard is empty.
    #[inline]
    pub const fn lsb_index(self) -> Option<u8> {
        Self::isolated_index(self.lsb())
    }

    /// Returns the index of the most significant bit (0-63).
    /// Returns None if the bitboard is empty.
    #[inline]
    pub const fn msb_index(self) -> Option<u8> {
        Self::isolated_index(self.msb())
    }

    /// Returns the square of the least significant bit.
    #[inline]
    pub const fn lsb_square(self) -> Option<Square> {
        match self.lsb_index() {
            Some(idx) => Square::from_index(idx),
            None => None,
        }
    }

    /// Returns the square of the most significant bit.
    #[inline]
    pub const fn msb_square(self) -> Option<Square> {
        match self.msb_index() {
            Some(idx) => Square::from_index(idx),
            None => None,
        }
    }

    /// Pops and returns the least significant bit.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let bit = self.lsb();
        self.0 ^= bit.0;
        Self::isolated_index(bit).and_then(Square::from_index)
    }

    /// Pops and returns the most significant bit.
    #[inline]
    pub fn pop_msb(&mut self) -> Option<Square> {
        let bit = self.msb();
        self.0 ^= bit.0;
        Self::isolated_index(bit).and_then(Square::from_index)
    }

    /// Shifts every square one step toward `direction`.
    ///
    /// Squares that would wrap around to the opposite edge are dropped.
    #[inline]
    pub const fn shift(self, direction: Direction) -> Bitboard {
        let b = self.0;
        Bitboard(match direction {
            Direction::North => b << 8,
            Direction::South => b >> 8,
            Direction::East => (b << 1) & Self::NOT_FILE_A,
            Direction::NorthEast => (b << 9) & Self::NOT_FILE_A,
            Direction::SouthEast => (b >> 7) & Self::NOT_FILE_A,
            Direction::West => (b >> 1) & Self::NOT_FILE_H,
            Direction::SouthWest => (b >> 9) & Self::NOT_FILE_H,
            Direction::NorthWest => (b << 7) & Self::NOT_FILE_H,
        })
    }

    /// Occluded fill: extends `self` toward `direction` through squares that
    /// are not `stoppers`. The result includes the original squares.
    #[inline]
    pub const fn fill(self, direction: Direction, stoppers: Bitboard) -> Bitboard {
        let empty = !stoppers.0;
        let mut filled = self;
        let mut i = 0;
        while i < 7 {
            filled.0 |= empty & filled.shift(direction).0;
            i += 1;
        }
        filled
    }

    /// Sliding reach toward `direction`, up to and including the first stopper.
    #[inline]
    pub const fn ray(self, direction: Direction, stoppers: Bitboard) -> Bitboard {
        self.fill(direction, stoppers).shift(direction)
    }

    /// Returns the squares attacked by pawns of `color` standing on `self`.
    #[inline]
    pub const fn pawn_attacks(self, color: Color) -> Bitboard {
        match color {
            Color::White => Bitboard(
                self.shift(Direction::NorthEast).0 | self.shift(Direction::NorthWest).0,
            ),
            Color::Black => Bitboard(
                self.shift(Direction::SouthEast).0 | self.shift(Direction::SouthWest).0,
            ),
        }
    }

    /// Returns the single-step pushes of pawns of `color` into `empty` squares.
    #[inline]
    pub const fn pawn_pushes(self, color: Color, empty: Bitboard) -> Bitboard {
        let pushed = match color {
            Color::White => self.shift(Direction::North),
            Color::Black => self.shift(Direction::South),
        };
        Bitboard(pushed.0 & empty.0)
    }

    /// Returns the squares attacked by knights standing on `self`.
    #[inline]
    pub const fn knight_attacks(self) -> Bitboard {
        let x = self.0;
        let a = ((x << 17) | (x >> 15)) & Self::NOT_FILE_A;
        let b = ((x << 10) | (x >> 6)) & Self::NOT_FILE_AB;
        let c = ((x << 15) | (x >> 17)) & Self::NOT_FILE_H;
        let d = ((x << 6) | (x >> 10)) & Self::NOT_FILE_GH;
        Bitboard(a | b | c | d)
    }

    /// Returns the squares attacked by kings standing on `self`.
    #[inline]
    pub const fn king_attacks(self) -> Bitboard {
        let sideways = self.shift(Direction::East).0 | self.shift(Direction::West).0;
        let row = Bitboard(self.0 | sideways);
        Bitboard(sideways | row.shift(Direction::North).0 | row.shift(Direction::South).0)
    }

    /// Returns the squares attacked by bishops on `self`, blocked by `occupied`.
    pub const fn bishop_attacks(self, occupied: Bitboard) -> Bitboard {
        Bitboard(
            self.ray(Direction::NorthEast, occupied).0
                | self.ray(Direction::NorthWest, occupied).0
                | self.ray(Direction::SouthEast, occupied).0
                | self.ray(Direction::SouthWest, occupied).0,
        )
    }

    /// Returns the squares attacked by rooks on `self`, blocked by `occupied`.
    pub const fn rook_attacks(self, occupied: Bitboard) -> Bitboard {
        Bitboard(
            self.ray(Direction::North, occupied).0
                | self.ray(Direction::South, occupied).0
                | self.ray(Direction::East, occupied).0
                | self.ray(Direction::West, occupied).0,
        )
    }

    /// Returns the squares attacked by queens on `self`, blocked by `occupied`.
    pub const fn queen_attacks(self, occupied: Bitboard) -> Bitboard {
        Bitboard(self.rook_attacks(occupied).0 | self.bishop_attacks(occupied).0)
    }

    /// Bishop x-ray: the squares revealed behind the first layer of `blockers`.
    ///
    /// Only blockers that are actually hit by the plain attack are removed.
    pub const fn xray_bishop_attacks(self, occupied: Bitboard, blockers: Bitboard) -> Bitboard {
        let attacks = self.bishop_attacks(occupied);
        let hit = blockers.0 & attacks.0;
        Bitboard(attacks.0 ^ self.bishop_attacks(Bitboard(occupied.0 ^ hit)).0)
    }

    /// Rook x-ray: the squares revealed behind the first layer of `blockers`.
    pub const fn xray_rook_attacks(self, occupied: Bitboard, blockers: Bitboard) -> Bitboard {
        let attacks = self.rook_attacks(occupied);
        let hit = blockers.0 & attacks.0;
        Bitboard(attacks.0 ^ self.rook_attacks(Bitboard(occupied.0 ^ hit)).0)
    }

    /// Returns the attacks of `piece` standing on `self`.
    ///
    /// `occupied` only matters for sliding pieces.
    pub const fn attacks(self, piece: Piece, occupied: Bitboard) -> Bitboard {
        match piece.kind {
            PieceKind::Pawn => self.pawn_attacks(piece.color),
            PieceKind::Knight => self.knight_attacks(),
            PieceKind::Bishop => self.bishop_attacks(occupied),
            PieceKind::Rook => self.rook_attacks(occupied),
            PieceKind::Queen => self.queen_attacks(occupied),
            PieceKind::King => self.king_attacks(),
        }
    }

    /// Mirrors the board top to bottom (rank 1 <-> rank 8).
    pub const fn flipped_vertically(self) -> Bitboard {
        Bitboard(self.0.swap_bytes())
    }

    /// Mirrors the board left to right (file a <-> file h).
    pub const fn flipped_horizontally(self) -> Bitboard {
        let mut n = self.0;
        n = ((n >> 1) & 0x5555_5555_5555_5555) | ((n & 0x5555_5555_5555_5555) << 1);
        n = ((n >> 2) & 0x3333_3333_3333_3333) | ((n & 0x3333_3333_3333_3333) << 2);
        n = ((n >> 4) & 0x0F0F_0F0F_0F0F_0F0F) | ((n & 0x0F0F_0F0F_0F0F_0F0F) << 4);
        Bitboard(n)
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl From<Square> for Bitboard {
    #[inline]
    fn from(sq: Square) -> Self {
        Bitboard::from_square(sq)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Bitboard::EMPTY, |bb, sq| bb | Bitboard::from_square(sq))
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = rank * 8 + file;
                if (self.0 >> sq) & 1 == 1 {
                    write!(f, "X ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Iterator over set squares in a bitboard, lowest index first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}
