//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Moves are played and taken back on a single game, so a correct count also
//! exercises execution and undo.

use crate::Game;
use chess_core::{Move, PieceKind};

fn apply(game: &mut Game, mov: Move) -> bool {
    game.execute_unchecked(mov, mov.promotion().unwrap_or(PieceKind::Queen))
        .is_ok()
}

/// Counts the number of leaf nodes at the given depth.
pub fn perft(game: &mut Game, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = game.legal_moves();

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for mov in moves {
        if apply(game, mov) {
            nodes += perft(game, depth - 1);
            game.undo();
        }
    }
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(game: &mut Game, depth: u32) -> Vec<(Move, u64)> {
    let moves = game.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for mov in moves {
        if !apply(game, mov) {
            continue;
        }
        let nodes = if depth > 1 {
            perft(game, depth - 1)
        } else {
            1
        };
        game.undo();
        results.push((mov, nodes));
    }

    results.sort_by_key(|(mov, _)| mov.to_uci());
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str =
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn game(fen: &str) -> Game {
        Game::from_fen(fen).unwrap()
    }

    // Starting position perft values (well-known and verified)
    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(perft(&mut Game::new(), 1), 20);
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(perft(&mut Game::new(), 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&mut Game::new(), 3), 8902);
    }

    // Depth 4 and beyond are slower, run them with --ignored
    #[test]
    #[ignore]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&mut Game::new(), 4), 197281);
    }

    // Kiwipete - a position with lots of special moves
    #[test]
    fn perft_kiwipete_depth_1() {
        assert_eq!(perft(&mut game(KIWIPETE), 1), 48);
    }

    #[test]
    fn perft_kiwipete_depth_2() {
        assert_eq!(perft(&mut game(KIWIPETE), 2), 2039);
    }

    #[test]
    #[ignore]
    fn perft_kiwipete_depth_3() {
        assert_eq!(perft(&mut game(KIWIPETE), 3), 97862);
    }

    // Position 3: Check evasion, en passant, promotion
    #[test]
    fn perft_position3_depth_1() {
        assert_eq!(perft(&mut game(POSITION_3), 1), 14);
    }

    #[test]
    fn perft_position3_depth_2() {
        assert_eq!(perft(&mut game(POSITION_3), 2), 191);
    }

    #[test]
    fn perft_position3_depth_3() {
        assert_eq!(perft(&mut game(POSITION_3), 3), 2812);
    }

    #[test]
    #[ignore]
    fn perft_position3_depth_4() {
        assert_eq!(perft(&mut game(POSITION_3), 4), 43238);
    }

    // Position 4: Promotions, castling rights lost by captures
    #[test]
    fn perft_position4_depth_1() {
        assert_eq!(perft(&mut game(POSITION_4), 1), 6);
    }

    #[test]
    fn perft_position4_depth_2() {
        assert_eq!(perft(&mut game(POSITION_4), 2), 264);
    }

    #[test]
    fn perft_position4_depth_3() {
        assert_eq!(perft(&mut game(POSITION_4), 3), 9467);
    }

    // Position 5: Promotion with discovered check
    #[test]
    fn perft_position5_depth_1() {
        assert_eq!(perft(&mut game(POSITION_5), 1), 44);
    }

    #[test]
    fn perft_position5_depth_2() {
        assert_eq!(perft(&mut game(POSITION_5), 2), 1486);
    }

    #[test]
    #[ignore]
    fn perft_position5_depth_3() {
        assert_eq!(perft(&mut game(POSITION_5), 3), 62379);
    }

    #[test]
    fn perft_leaves_game_unchanged() {
        let mut game = game(KIWIPETE);
        let before = game.clone();
        perft(&mut game, 2);
        assert_eq!(game, before);
    }

    #[test]
    fn perft_divide_startpos() {
        let results = perft_divide(&mut Game::new(), 2);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(results[0].0.to_uci(), "a2a3");

        let total: u64 = results.iter().map(|(_, nodes)| nodes).sum();
        assert_eq!(total, 400);
    }
}
