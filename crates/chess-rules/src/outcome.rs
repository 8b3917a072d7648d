//! How a finished game ended.

use chess_core::Color;
use std::fmt;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The side to move is checkmated.
    Checkmate { winner: Color },
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// Stalemate - no legal moves but not in check.
    Stalemate,
    /// 50-move rule (100 half-moves without pawn move or capture).
    FiftyMoveRule,
}

impl Outcome {
    /// Returns the winning color, or `None` for a draw.
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            Outcome::Draw(_) => None,
        }
    }

    #[inline]
    pub const fn is_draw(self) -> bool {
        matches!(self, Outcome::Draw(_))
    }
}

impl fmt::Display for Outcome {
    /// Formats the outcome as PGN result text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Checkmate {
                winner: Color::White,
            } => "1-0",
            Outcome::Checkmate {
                winner: Color::Black,
            } => "0-1",
            Outcome::Draw(_) => "1/2-1/2",
        };
        f.write_str(text)
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::Stalemate => write!(f, "stalemate"),
            DrawReason::FiftyMoveRule => write!(f, "fifty-move rule"),
        }
    }
}
