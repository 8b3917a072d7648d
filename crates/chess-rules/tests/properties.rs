//! Property-based tests using proptest.
//!
//! Games are driven by random indices into the legal move list, so every
//! generated sequence is playable from the starting position.

use chess_core::{PieceKind, Square};
use chess_rules::{attacks, Game, Position};
use proptest::prelude::*;
use proptest::sample::Index;

/// Strategy to generate the move choices of a random game.
fn choices_strategy() -> impl Strategy<Value = Vec<Index>> {
    prop::collection::vec(any::<Index>(), 1..=40)
}

/// Plays one legal move per choice, stopping early if the game ends.
fn random_game(choices: &[Index]) -> Game {
    let mut game = Game::new();
    for choice in choices {
        let moves = game.legal_moves();
        if moves.is_empty() {
            break;
        }
        game.play(moves[choice.index(moves.len())]).unwrap();
    }
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: every legal move followed by undo restores the game exactly
    #[test]
    fn prop_execute_undo_is_identity(choices in choices_strategy()) {
        let mut game = random_game(&choices);
        let before = game.clone();
        for mov in game.legal_moves() {
            game.execute(mov, mov.promotion().unwrap_or(PieceKind::Queen)).unwrap();
            let undone = game.undo();
            prop_assert_eq!(undone.map(|m| (m.from(), m.to())), Some((mov.from(), mov.to())));
            prop_assert_eq!(&game, &before);
        }
    }

    /// Property: undoing a whole random game returns to the start
    #[test]
    fn prop_undo_all_restores_start(choices in choices_strategy()) {
        let mut game = random_game(&choices);
        let plies = game.move_count();
        for _ in 0..plies {
            prop_assert!(game.undo().is_some());
        }
        prop_assert_eq!(game.undo(), None);
        prop_assert_eq!(game, Game::new());
    }

    /// Property: FEN round-trip preserves position
    #[test]
    fn prop_fen_roundtrip(choices in choices_strategy()) {
        let game = random_game(&choices);
        let position = game.position();
        let fen = position.to_fen();
        let decoded = Position::from_fen(&fen).unwrap();
        prop_assert_eq!(decoded.to_fen(), fen);
        prop_assert_eq!(decoded, position);
    }

    /// Property: a resumed game sees the same legal moves
    #[test]
    fn prop_resume_from_fen(choices in choices_strategy()) {
        let game = random_game(&choices);
        let resumed = Game::from_fen(&game.to_fen()).unwrap();
        prop_assert_eq!(resumed.legal_moves(), game.legal_moves());
        prop_assert_eq!(resumed.king_attackers(), game.king_attackers());
    }

    /// Property: pinned pieces never leave the line through their king
    #[test]
    fn prop_pins_agree_with_oracle(choices in choices_strategy()) {
        let game = random_game(&choices);
        let color = game.side_to_move();
        let king = game.board().king_square(color).unwrap();
        for pinned in game.board().pinned(color) {
            let moves = game.moves_bitboard_from(pinned);
            prop_assert_eq!(moves & attacks::line(king, pinned), moves);
        }
    }

    /// Property: only the side to move ever has destinations
    #[test]
    fn prop_only_mover_has_moves(choices in choices_strategy()) {
        let game = random_game(&choices);
        let opponent = game.board().color(game.side_to_move().opposite());
        for square in opponent {
            prop_assert!(game.moves_bitboard_from(square).is_empty());
        }
        prop_assert!(Square::ALL
            .into_iter()
            .all(|sq| game.moves_bitboard_from(sq).is_empty() || game.board().piece_at(sq).is_some()));
    }
}
