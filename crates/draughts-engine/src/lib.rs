//! # Draughts Engine
//!
//! A checkers (draughts) rules engine with a game-session state machine and
//! pluggable session stores.
//!
//! ## Pieces
//!
//! - **Rules** (`rules`): board model, legal-move generation (including
//!   forced multi-jump chains), and move execution with crowning and win
//!   detection.
//! - **Sessions** (`session`, `types::game`): the host/join/start lifecycle,
//!   turn ownership, and the forced-continuation protocol over a
//!   serializable session record.
//! - **Stores** (`store`): the narrow persistence contract a request layer
//!   implements, with in-memory and JSON-file reference stores.
//!
//! The engine holds no state between calls and performs no I/O: a
//! collaborator loads a session by its game code, invokes one operation, and
//! saves the updated record. Operations on the same code must be serialized
//! by the caller; distinct sessions are fully independent.

pub mod rules;
pub mod session;
pub mod store;
pub mod types;

pub use rules::{Board, MatchStatus, MoveError, MoveOutcome};
pub use session::{MoveReport, SessionError};
pub use store::{JsonSessionStore, MemorySessionStore, SessionStore, StoreError};
pub use types::{Coord, GameCode, GamePhase, GameSession, Move, Piece, Team};
