//! Chess rules engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit board representation with efficient operations
//! - [`Board`] - piece placement with attack and pin queries
//! - [`Position`] - Full game state including piece positions, castling rights, etc.
//! - [`Game`] - legal move generation, execution and exact undo
//! - [`perft`] - node counting to validate move generation
//!
//! # Architecture
//!
//! The engine uses bitboards for piece representation - each piece type/color
//! combination has a 64-bit integer where each bit represents a square.
//! Sliding attacks are computed with occluded fills, and a move is legal when
//! playing it on a copy of the game leaves the mover's king unattacked.
//!
//! # Example
//!
//! ```
//! use chess_rules::{Game, Outcome};
//!
//! let mut game = Game::new();
//! assert_eq!(game.legal_moves().len(), 20);
//!
//! for mov in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     game.play_uci(mov).unwrap();
//! }
//! assert!(game.is_finished());
//! assert_eq!(game.outcome().map(|o| o.to_string()), Some("0-1".to_string()));
//!
//! game.undo();
//! assert_eq!(game.outcome(), None::<Outcome>);
//! ```

pub mod attacks;
mod bitboard;
mod board;
mod castling;
mod game;
mod movegen;
mod outcome;
pub mod perft;
mod position;

pub use bitboard::{Bitboard, BitboardIter, Direction};
pub use board::Board;
pub use castling::{CastleSide, CastlingRight, CastlingRights};
pub use game::{Game, GameError, UndoRecord};
pub use outcome::{DrawReason, Outcome};
pub use perft::{perft, perft_divide};
pub use position::{Position, PositionError};
