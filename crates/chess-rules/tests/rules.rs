//! Integration tests for the chess-rules crate.
//!
//! Each test drives a [`Game`] through public moves only and checks the
//! resulting board, rights and counters.

use chess_core::{Color, Move, Piece, PieceKind, Square};
use chess_rules::{
    attacks, perft, Bitboard, CastlingRight, DrawReason, Game, GameError, Outcome, Position,
};

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

fn piece(kind: PieceKind, color: Color) -> Option<Piece> {
    Some(Piece::new(kind, color))
}

#[test]
fn starting_position_has_twenty_moves() {
    let game = Game::new();
    let moves = game.legal_moves();
    assert_eq!(moves.len(), 20);
    let pawn_moves = moves
        .iter()
        .filter(|mov| game.board().piece_at(mov.from()) == piece(PieceKind::Pawn, Color::White))
        .count();
    assert_eq!(pawn_moves, 16);
}

#[test]
fn fools_mate() {
    let mut game = Game::new();
    for mov in ["f2f3", "e7e5", "g2g4", "d8h4"] {
        game.play_uci(mov).unwrap();
    }

    assert!(game.is_finished());
    assert!(game.king_is_checked());
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(
        game.outcome(),
        Some(Outcome::Checkmate {
            winner: Color::Black
        })
    );
    assert_eq!(game.outcome().unwrap().to_string(), "0-1");
    assert_eq!(game.fullmove_number(), 3);
}

#[test]
fn scholars_mate_is_a_white_win() {
    let mut game = Game::new();
    for mov in ["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"] {
        game.play_uci(mov).unwrap();
    }
    assert_eq!(
        game.outcome(),
        Some(Outcome::Checkmate {
            winner: Color::White
        })
    );
    assert_eq!(game.last_capture(), piece(PieceKind::Pawn, Color::Black));
}

#[test]
fn white_kingside_castle() {
    let mut game =
        Game::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
    game.play(Move::new(Square::E1, Square::G1)).unwrap();

    let board = game.board();
    assert_eq!(board.piece_at(Square::G1), piece(PieceKind::King, Color::White));
    assert_eq!(board.piece_at(Square::F1), piece(PieceKind::Rook, Color::White));
    assert_eq!(board.piece_at(Square::E1), None);
    assert_eq!(board.piece_at(Square::H1), None);
    assert!(!game.castling().contains(CastlingRight::WhiteKingside));
    assert!(!game.castling().contains(CastlingRight::WhiteQueenside));
    assert_eq!(game.castling().to_fen(), "kq");
}

#[test]
fn en_passant_removes_the_pushed_pawn() {
    let mut game =
        Game::from_fen("rnbqkbnr/ppp1pppp/8/3P4/8/8/PPP1PPPP/RNBQKBNR b KQkq - 0 2").unwrap();
    game.play_uci("e7e5").unwrap();
    assert_eq!(game.en_passant(), Some(sq("e6")));

    game.play_uci("d5e6").unwrap();
    assert_eq!(game.board().piece_at(sq("e5")), None);
    assert_eq!(game.board().piece_at(sq("e6")), piece(PieceKind::Pawn, Color::White));
    assert_eq!(game.last_capture(), piece(PieceKind::Pawn, Color::Black));
    assert_eq!(game.en_passant(), None);
}

#[test]
fn promotion_and_underpromotion() {
    let mut game = Game::from_fen("1n5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let moves = game.legal_moves_from(sq("a7"));
    // Push to a8 and capture on b8, four kinds each.
    assert_eq!(moves.len(), 8);

    game.play_uci("a7b8n").unwrap();
    assert_eq!(game.board().piece_at(Square::B8), piece(PieceKind::Knight, Color::White));
    assert_eq!(game.last_capture(), piece(PieceKind::Knight, Color::Black));
    assert_eq!(game.halfmove_clock(), 0);

    assert_eq!(game.undo(), Some(Move::with_promotion(sq("a7"), Square::B8, PieceKind::Knight)));
    assert_eq!(game.board().piece_at(Square::B8), piece(PieceKind::Knight, Color::Black));
    assert_eq!(game.board().piece_at(sq("a7")), piece(PieceKind::Pawn, Color::White));
}

#[test]
fn illegal_moves_are_rejected_without_side_effects() {
    let mut game = Game::new();
    let before = game.clone();

    assert!(matches!(
        game.play_uci("e1e2"),
        Err(GameError::IllegalMove { side: Color::White, .. })
    ));
    assert_eq!(game.play_uci("e3e4"), Err(GameError::MissingPiece(sq("e3"))));
    assert_eq!(
        game.play_uci("e2"),
        Err(GameError::InvalidMoveText("e2".to_string()))
    );
    assert_eq!(game, before);
}

#[test]
fn pinned_pieces_match_the_oracle() {
    for fen in [
        "4k3/8/8/b7/8/8/3BN3/4K2r w - - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "4k3/4r3/8/8/8/2q5/3Q4/4K3 w - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ] {
        let game = Game::from_fen(fen).unwrap();
        let color = game.side_to_move();
        let king = game.board().king_square(color).unwrap();
        for pinned in game.board().pinned(color) {
            let line = attacks::line(king, pinned);
            let moves = game.moves_bitboard_from(pinned);
            assert_eq!(moves & line, moves, "{fen}: {pinned} leaves its line");
        }
    }
}

#[test]
fn pinned_queen_can_slide_along_the_pin() {
    let game = Game::from_fen("4k3/8/8/8/8/2q5/3Q4/4K3 w - - 0 1").unwrap();
    assert_eq!(game.board().pinned(Color::White), Bitboard::from_square(sq("d2")));
    assert_eq!(
        game.moves_bitboard_from(sq("d2")),
        [sq("c3")].into_iter().collect::<Bitboard>()
    );
}

#[test]
fn fifty_move_clock_stops_generation() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 98 70").unwrap();
    game.play_uci("a1a2").unwrap();
    game.play_uci("e8d8").unwrap();
    assert_eq!(game.halfmove_clock(), 100);

    for square in Square::ALL {
        assert!(game.moves_bitboard_from(square).is_empty());
    }
    assert!(game.is_finished());
    assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::FiftyMoveRule)));

    game.undo();
    assert!(!game.is_finished());
}

#[test]
fn position_snapshot_round_trips_through_fen() {
    let mut game = Game::new();
    for mov in ["e2e4", "c7c5", "g1f3", "d7d6", "f1b5", "c8d7"] {
        game.play_uci(mov).unwrap();
    }
    let position = game.position();
    let fen = position.to_fen();
    assert_eq!(fen, game.to_fen());
    assert_eq!(Position::from_fen(&fen).unwrap(), position);

    let resumed = Game::from_fen(&fen).unwrap();
    assert_eq!(resumed.legal_moves().len(), game.legal_moves().len());
}

#[test]
fn perft_through_public_api() {
    let mut game = Game::new();
    assert_eq!(perft(&mut game, 3), 8902);
    assert_eq!(game, Game::new());
}
