//! Type definitions for the draughts engine.
//!
//! ## Modules
//!
//! - `draughts` - Core rule types (Team, Piece, Coord, Move)
//! - `game` - Session record types (GameCode, GamePhase, GameSession)

pub mod draughts;
pub mod game;

// Re-export commonly used types
pub use draughts::{Coord, Move, Piece, Team, BOARD_SIZE};
pub use game::{GameCode, GamePhase, GameSession};
