//! Attack table generation and lookup for all piece types.
//!
//! Leaper patterns and the square-pair geometry are built once, on first
//! access, and shared read-only afterwards. Sliding attacks are computed on
//! demand with occluded fills since they depend on occupancy.

use crate::bitboard::Direction;
use crate::Bitboard;
use chess_core::{Color, Square};
use std::sync::LazyLock;

/// Number of unordered square pairs, the diagonal included: 64 * 65 / 2.
pub const PAIR_COUNT: usize = 2080;

/// Every table derived from the bitboard generators.
struct Tables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    /// Pawn attacks [color][square].
    pawn: [[Bitboard; 64]; 2],
    between: Vec<Bitboard>,
    line: Vec<Bitboard>,
}

static TABLES: LazyLock<Tables> = LazyLock::new(Tables::build);

impl Tables {
    fn build() -> Self {
        let mut knight = [Bitboard::EMPTY; 64];
        let mut king = [Bitboard::EMPTY; 64];
        let mut pawn = [[Bitboard::EMPTY; 64]; 2];
        for sq in Square::ALL {
            let origin = Bitboard::from_square(sq);
            let i = sq.index() as usize;
            knight[i] = origin.knight_attacks();
            king[i] = origin.king_attacks();
            for color in Color::ALL {
                pawn[color.index()][i] = origin.pawn_attacks(color);
            }
        }

        let mut between = vec![Bitboard::EMPTY; PAIR_COUNT];
        let mut line = vec![Bitboard::EMPTY; PAIR_COUNT];
        for a in Square::ALL {
            for b in Square::ALL.into_iter().filter(|b| *b >= a) {
                let index = pair_index(a, b);
                between[index] = compute_between(a, b);
                line[index] = compute_line(a, b);
            }
        }

        Tables {
            knight,
            king,
            pawn,
            between,
            line,
        }
    }
}

/// Maps an unordered square pair to a slot in `0..PAIR_COUNT`.
///
/// The pairing is symmetric, so `pair_index(a, b) == pair_index(b, a)`.
#[inline]
pub fn pair_index(a: Square, b: Square) -> usize {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let lo = lo.index() as usize;
    let hi = hi.index() as usize;
    lo * (127 - lo) / 2 + hi
}

/// Walks each direction from `a` until `b` is hit.
fn compute_between(a: Square, b: Square) -> Bitboard {
    let start = Bitboard::from_square(a);
    let end = Bitboard::from_square(b);
    for direction in Direction::ORTHOGONAL.into_iter().chain(Direction::DIAGONAL) {
        let filled = start.fill(direction, end);
        if filled.shift(direction).intersects(end) {
            return filled & !start;
        }
    }
    Bitboard::EMPTY
}

fn compute_line(a: Square, b: Square) -> Bitboard {
    if a == b {
        return Bitboard::EMPTY;
    }
    let start = Bitboard::from_square(a);
    let end = Bitboard::from_square(b);
    let ends = start | end;
    let rook = start.rook_attacks(Bitboard::EMPTY);
    if rook.intersects(end) {
        return ends | (rook & end.rook_attacks(Bitboard::EMPTY));
    }
    let bishop = start.bishop_attacks(Bitboard::EMPTY);
    if bishop.intersects(end) {
        return ends | (bishop & end.bishop_attacks(Bitboard::EMPTY));
    }
    Bitboard::EMPTY
}

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    TABLES.knight[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    TABLES.king[sq.index() as usize]
}

/// Returns pawn attacks from the given square for the given color.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    TABLES.pawn[color.index()][sq.index() as usize]
}

/// Returns bishop attacks from the given square, blocked by `occupied`.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard::from_square(sq).bishop_attacks(occupied)
}

/// Returns rook attacks from the given square, blocked by `occupied`.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard::from_square(sq).rook_attacks(occupied)
}

/// Returns queen attacks from the given square, blocked by `occupied`.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Bitboard::from_square(sq).queen_attacks(occupied)
}

/// Squares strictly between two aligned squares, or empty if they share no
/// rank, file or diagonal.
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    TABLES.between[pair_index(a, b)]
}

/// The full rank, file or diagonal through two aligned squares, or empty if
/// they are not aligned.
#[inline]
pub fn line(a: Square, b: Square) -> Bitboard {
    TABLES.line[pair_index(a, b)]
}
