//! Legal move generation.
//!
//! Destinations are built from the board's attack patterns, then each one is
//! tried on a copy of the game and dropped if it leaves the mover's king
//! attacked. That trial is the definition of legality used everywhere.

use crate::{Bitboard, Game};
use chess_core::{Move, Piece, PieceKind, Square};
use tracing::trace;

impl Game {
    /// Returns the legal destinations of the piece on `sq`.
    ///
    /// Empty when the square is empty, holds an opponent piece, or the
    /// fifty-move rule applies.
    pub fn moves_bitboard_from(&self, sq: Square) -> Bitboard {
        self.destinations(sq, true)
    }

    /// Returns the legal moves of the piece on `sq`.
    ///
    /// A pawn reaching the last rank yields one move per promotion kind.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        let destinations = self.moves_bitboard_from(sq);
        let promotes = self.board.piece_at(sq).is_some_and(|piece| {
            piece.kind == PieceKind::Pawn
                && (destinations & Bitboard::rank(piece.color.promotion_rank())).is_not_empty()
        });

        if promotes {
            destinations
                .into_iter()
                .flat_map(|to| {
                    PieceKind::PROMOTIONS
                        .into_iter()
                        .map(move |kind| Move::with_promotion(sq, to, kind))
                })
                .collect()
        } else {
            destinations
                .into_iter()
                .map(|to| Move::new(sq, to))
                .collect()
        }
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board
            .color(self.side_to_move)
            .into_iter()
            .flat_map(|sq| self.legal_moves_from(sq))
            .collect()
    }

    /// Returns true if `mov` can be executed in the current position.
    ///
    /// A promotion kind is only accepted on a pawn move to the last rank.
    pub fn is_legal(&self, mov: Move) -> bool {
        let promotion_fits = match mov.promotion() {
            Some(kind) => kind.can_promote_to() && self.promotes(mov),
            None => true,
        };
        promotion_fits && self.moves_bitboard_from(mov.from()).contains(mov.to())
    }

    /// Returns true if `mov` takes a pawn of the side to move to its last rank.
    pub(crate) fn promotes(&self, mov: Move) -> bool {
        self.board.piece_at(mov.from()).is_some_and(|piece| {
            piece.kind == PieceKind::Pawn
                && piece.color == self.side_to_move
                && mov.to().rank() == piece.color.promotion_rank()
        })
    }

    /// Returns true if any piece of the side to move has a legal destination.
    pub(crate) fn has_legal_move(&self, respect_clock: bool) -> bool {
        self.board
            .color(self.side_to_move)
            .into_iter()
            .any(|sq| self.destinations(sq, respect_clock).is_not_empty())
    }

    /// Legal destinations of the piece on `sq`. Trial executions skip the
    /// fifty-move short circuit, so the outcome can look past it.
    fn destinations(&self, sq: Square, respect_clock: bool) -> Bitboard {
        if respect_clock && self.halfmove_clock >= 100 {
            return Bitboard::EMPTY;
        }
        let Some(piece) = self.board.piece_at(sq) else {
            return Bitboard::EMPTY;
        };
        if piece.color != self.side_to_move {
            return Bitboard::EMPTY;
        }
        if self.king_is_double_checked() && piece.kind != PieceKind::King {
            return Bitboard::EMPTY;
        }

        let candidates = self.pseudo_legal(sq, piece) | self.castle_destinations(sq, piece);
        candidates
            .into_iter()
            .filter(|&to| self.keeps_king_safe(Move::new(sq, to)))
            .collect()
    }

    /// Destinations by movement pattern alone, ignoring king safety.
    fn pseudo_legal(&self, sq: Square, piece: Piece) -> Bitboard {
        let own = self.board.color(piece.color);
        let enemy = self.board.color(piece.color.opposite());
        let attacks = self.board.attacks_from(sq, piece);

        match piece.kind {
            PieceKind::Pawn => {
                let empty = self.board.empty_squares();
                let origin = Bitboard::from_square(sq);
                let single = origin.pawn_pushes(piece.color, empty);
                let double = (origin & Bitboard::start_for(piece))
                    .pawn_pushes(piece.color, empty)
                    .pawn_pushes(piece.color, empty);
                let en_passant = self
                    .en_passant
                    .map_or(Bitboard::EMPTY, Bitboard::from_square);
                single | double | (attacks & enemy) | (attacks & en_passant)
            }
            _ => attacks & !own,
        }
    }

    /// King destinations that castle. The destination square itself is
    /// checked again by the trial execution.
    fn castle_destinations(&self, sq: Square, piece: Piece) -> Bitboard {
        let on_start = Bitboard::from_square(sq) == Bitboard::start_for(piece);
        if piece.kind != PieceKind::King || !on_start || self.king_is_checked() {
            return Bitboard::EMPTY;
        }
        let occupied = self.board.occupied();
        let them = piece.color.opposite();

        self.castling
            .iter()
            .filter(|right| right.color() == piece.color)
            .filter(|right| !occupied.intersects(right.must_be_empty()))
            .filter(|right| {
                right
                    .king_path()
                    .into_iter()
                    .all(|path| !self.board.is_attacked(path, them))
            })
            .map(|right| Bitboard::from_square(right.king_destination()))
            .fold(Bitboard::EMPTY, |acc, destination| acc | destination)
    }

    /// Plays `mov` on a copy and reports whether the mover's king is safe.
    fn keeps_king_safe(&self, mov: Move) -> bool {
        let mut trial = self.trial_copy();
        let safe = trial.execute_unchecked(mov, PieceKind::Queen).is_ok()
            && trial
                .board
                .attackers_to_king(self.side_to_move)
                .is_empty();
        if !safe {
            trace!(mov = %mov, "discarded move that exposes the king");
        }
        safe
    }
}

#[cfg(test)]
mod tests {
    use crate::{attacks, Bitboard, Game, GameError};
    use chess_core::{Move, PieceKind, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares.iter().map(|s| sq(s)).collect()
    }

    #[test]
    fn startpos_has_20_moves() {
        let game = Game::new();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.moves_bitboard_from(sq("e2")), bb(&["e3", "e4"]));
        assert_eq!(game.moves_bitboard_from(Square::G1), bb(&["f3", "h3"]));
        assert!(game.moves_bitboard_from(Square::E1).is_empty());
    }

    #[test]
    fn opponent_and_empty_squares_have_no_moves() {
        let game = Game::new();
        assert!(game.moves_bitboard_from(sq("e7")).is_empty());
        assert!(game.moves_bitboard_from(sq("e4")).is_empty());
    }

    #[test]
    fn blocked_double_push() {
        let game = Game::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1").unwrap();
        assert!(game.moves_bitboard_from(sq("e2")).is_empty());
        let game = Game::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(game.moves_bitboard_from(sq("e2")), bb(&["e3"]));
    }

    #[test]
    fn pawn_captures_need_a_target() {
        let game = Game::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.moves_bitboard_from(sq("e4")), bb(&["e5", "d5"]));
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let game = Game::from_fen("3r4/4P3/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let moves = game.legal_moves_from(sq("e7"));
        assert_eq!(moves.len(), 8);
        for kind in PieceKind::PROMOTIONS {
            assert!(moves.contains(&Move::with_promotion(sq("e7"), Square::E8, kind)));
            assert!(moves.contains(&Move::with_promotion(sq("e7"), Square::D8, kind)));
        }
    }

    #[test]
    fn is_legal_checks_promotion_kind() {
        let game = Game::from_fen("8/4P3/8/8/8/8/8/k6K w - - 0 1").unwrap();
        assert!(game.is_legal(Move::new(sq("e7"), Square::E8)));
        assert!(game.is_legal(Move::with_promotion(sq("e7"), Square::E8, PieceKind::Rook)));
        assert!(!game.is_legal(Move::with_promotion(sq("e7"), Square::E8, PieceKind::King)));
    }

    #[test]
    fn promotion_kind_needs_a_promoting_move() {
        let mut game = Game::new();
        let stray = Move::with_promotion(sq("e2"), sq("e4"), PieceKind::Queen);
        assert!(!game.is_legal(stray));
        assert!(game.is_legal(Move::new(sq("e2"), sq("e4"))));
        assert!(matches!(game.play(stray), Err(GameError::IllegalMove { .. })));
        assert!(matches!(game.play_uci("g1f3n"), Err(GameError::IllegalMove { .. })));
        assert_eq!(game, Game::new());
    }

    #[test]
    fn pinned_piece_stays_on_line() {
        // The bishop on d2 is pinned by the bishop on a5.
        let game = Game::from_fen("4k3/8/8/b7/8/8/3B4/4K3 w - - 0 1").unwrap();
        let moves = game.moves_bitboard_from(sq("d2"));
        assert_eq!(moves, bb(&["c3", "b4", "a5"]));
        let line = attacks::line(Square::E1, sq("d2"));
        assert_eq!(moves & line, moves);
    }

    #[test]
    fn check_must_be_answered() {
        // Rook on e8 checks the king on e1; the knight can only block on e4.
        let game = Game::from_fen("4r1k1/8/8/8/8/8/3N4/R3K3 w Q - 0 1").unwrap();
        assert!(game.king_is_checked());
        assert_eq!(game.moves_bitboard_from(sq("d2")), bb(&["e4"]));
        assert!(game.moves_bitboard_from(Square::A1).is_empty());
        assert_eq!(game.moves_bitboard_from(Square::E1), bb(&["d1", "f1", "f2"]));
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        // Knight on d3 and rook on e8 both check the king on e1.
        let game = Game::from_fen("4r1k1/8/8/8/8/3n4/8/R3K2R w - - 0 1").unwrap();
        assert!(game.king_is_double_checked());
        assert!(game.moves_bitboard_from(Square::A1).is_empty());
        assert!(game.moves_bitboard_from(Square::H1).is_empty());
        assert!(game.moves_bitboard_from(Square::E1).is_not_empty());
    }

    #[test]
    fn castling_destinations() {
        let game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let king = game.moves_bitboard_from(Square::E1);
        assert!(king.contains(Square::G1));
        assert!(king.contains(Square::C1));
    }

    #[test]
    fn castling_blocked_or_attacked() {
        // Knight on b1 blocks the long castle.
        let game = Game::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        assert!(!game.moves_bitboard_from(Square::E1).contains(Square::C1));
        // The rook on f8 attacks the transit square f1.
        let game = Game::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
        assert!(!game.moves_bitboard_from(Square::E1).contains(Square::G1));
        assert!(game.moves_bitboard_from(Square::E1).contains(Square::C1));
        // b1 may be attacked: only the king's own squares matter.
        let game = Game::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert!(game.moves_bitboard_from(Square::E1).contains(Square::C1));
    }

    #[test]
    fn no_castling_out_of_check() {
        let game = Game::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let king = game.moves_bitboard_from(Square::E1);
        assert!(!king.contains(Square::G1));
        assert!(!king.contains(Square::C1));
    }

    #[test]
    fn en_passant_that_exposes_the_king_is_illegal() {
        // Capturing on d6 would clear the fifth rank between rook and king.
        let game = Game::from_fen("4k3/8/8/r2pP2K/8/8/8/8 w - d6 0 1").unwrap();
        assert!(!game.moves_bitboard_from(sq("e5")).contains(sq("d6")));
        assert!(game.moves_bitboard_from(sq("e5")).contains(sq("e6")));
    }

    #[test]
    fn clock_at_100_stops_everything() {
        let game = Game::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 100 60").unwrap();
        for square in Square::ALL {
            assert!(game.moves_bitboard_from(square).is_empty());
        }
        assert!(game.legal_moves().is_empty());
    }
}
