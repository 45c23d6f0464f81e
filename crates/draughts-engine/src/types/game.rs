//! Session record types: game codes, the lifecycle phase machine, and the
//! session itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::rules::Board;
use crate::types::{Coord, Team};

/// Opaque identifier collaborators use to locate a session record. The
/// engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameCode(String);

impl GameCode {
    /// Mint a fresh random code.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap an existing code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GameCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GameCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Lifecycle phase of a session.
///
/// The forced-continuation square and the turn holder live inside `Running`,
/// so they exist exactly when the game does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Created by a host, waiting for a second player.
    Hosted,
    /// Second player joined; the host has not started the game yet.
    AwaitingStart,
    /// Game in progress.
    Running {
        /// Team whose turn it is.
        turn: Team,
        /// Square a prior capture obliges the turn holder to keep jumping
        /// from, if any.
        must_continue: Option<Coord>,
    },
    /// Terminal: one team has no pieces left.
    Finished {
        /// Team that captured the opponent's last piece.
        winner: Team,
    },
}

impl GamePhase {
    /// Returns true while moves are being accepted.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Returns true once the game has ended.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }

    /// The winning team, if the game has ended.
    #[must_use]
    pub const fn winner(&self) -> Option<Team> {
        match self {
            Self::Finished { winner } => Some(*winner),
            _ => None,
        }
    }
}

/// A game session record: the board plus seating and lifecycle metadata.
///
/// The record is owned by the persistence collaborator. Engine operations
/// receive a loaded copy, mutate it (or leave it untouched on rejection), and
/// the collaborator saves it back. Seats are fixed at creation: the host
/// plays Red, the joining player plays White.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    /// Identifier the collaborator files this record under.
    pub code: GameCode,
    /// Username of the hosting player, seated as Red.
    pub host: String,
    /// Username of the joining player, seated as White once present.
    pub guest: Option<String>,
    /// Lifecycle phase, including turn and forced-continuation state.
    pub phase: GamePhase,
    /// Current position.
    pub board: Board,
    /// When the session was hosted.
    pub created_at: DateTime<Utc>,
    /// When the last move was executed.
    pub last_move_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Create a session in `Hosted` with a fresh start position.
    pub fn new(code: GameCode, host: impl Into<String>) -> Self {
        Self {
            code,
            host: host.into(),
            guest: None,
            phase: GamePhase::Hosted,
            board: Board::new(),
            created_at: Utc::now(),
            last_move_at: None,
        }
    }

    /// The team a username is seated as, if they are in this game.
    #[must_use]
    pub fn team_of(&self, username: &str) -> Option<Team> {
        if username == self.host {
            Some(Team::Red)
        } else if self.guest.as_deref() == Some(username) {
            Some(Team::White)
        } else {
            None
        }
    }

    /// The username seated as the given team, if anyone is.
    #[must_use]
    pub fn player_for(&self, team: Team) -> Option<&str> {
        match team {
            Team::Red => Some(&self.host),
            Team::White => self.guest.as_deref(),
        }
    }

    /// Username of the player whose turn it is, while running.
    #[must_use]
    pub fn current_player(&self) -> Option<&str> {
        match self.phase {
            GamePhase::Running { turn, .. } => self.player_for(turn),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_code_round_trip() {
        let code = GameCode::generate();
        assert!(!code.as_str().is_empty());
        assert_eq!(GameCode::new(code.as_str()), code);
        assert_eq!(code.to_string(), code.as_str());
    }

    #[test]
    fn fresh_codes_differ() {
        assert_ne!(GameCode::generate(), GameCode::generate());
    }

    #[test]
    fn phase_helpers() {
        assert!(!GamePhase::Hosted.is_running());
        assert!(GamePhase::Running {
            turn: Team::Red,
            must_continue: None
        }
        .is_running());
        assert!(GamePhase::Finished { winner: Team::Red }.is_finished());
        assert_eq!(
            GamePhase::Finished { winner: Team::Red }.winner(),
            Some(Team::Red)
        );
        assert_eq!(GamePhase::Hosted.winner(), None);
    }

    #[test]
    fn new_session_starts_hosted() {
        let session = GameSession::new(GameCode::generate(), "alice");
        assert_eq!(session.phase, GamePhase::Hosted);
        assert_eq!(session.guest, None);
        assert_eq!(session.board, Board::new());
        assert_eq!(session.last_move_at, None);
    }

    #[test]
    fn seating_is_fixed_at_creation() {
        let mut session = GameSession::new(GameCode::generate(), "alice");
        session.guest = Some("bob".to_string());

        assert_eq!(session.team_of("alice"), Some(Team::Red));
        assert_eq!(session.team_of("bob"), Some(Team::White));
        assert_eq!(session.team_of("mallory"), None);
        assert_eq!(session.player_for(Team::Red), Some("alice"));
        assert_eq!(session.player_for(Team::White), Some("bob"));
    }

    #[test]
    fn current_player_follows_turn() {
        let mut session = GameSession::new(GameCode::generate(), "alice");
        session.guest = Some("bob".to_string());
        assert_eq!(session.current_player(), None);

        session.phase = GamePhase::Running {
            turn: Team::White,
            must_continue: None,
        };
        assert_eq!(session.current_player(), Some("bob"));
    }

    #[test]
    fn session_survives_json_round_trip() {
        let session = GameSession::new(GameCode::new("abc123"), "alice");
        let json = serde_json::to_string(&session).unwrap();
        let parsed: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
