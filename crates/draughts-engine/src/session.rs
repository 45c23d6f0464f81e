//! Game-session operations: hosting, joining, starting, moving, and turn
//! transfer.
//!
//! Every operation validates against the current phase, seating, and jump
//! constraint before touching anything, so a rejected call leaves the session
//! exactly as it was. The operations perform no I/O; a collaborator loads the
//! session by game code, invokes one operation, and saves the updated record.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rules::{self, Board, MatchStatus, MoveError};
use crate::types::{Coord, GamePhase, GameSession, Move, Team};

/// Rejections from session operations. State is never modified on error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SessionError {
    /// The destination is not among the legal moves for the start square.
    #[error("no legal move from {from} to {to}")]
    IllegalMove {
        /// Square the move started from.
        from: Coord,
        /// Requested destination.
        to: Coord,
    },

    /// The acting player is not the current player.
    #[error("it is not {username}'s turn")]
    OutOfTurn {
        /// Player who tried to act.
        username: String,
    },

    /// A prior capture obliges the player to keep jumping with the same
    /// piece, and the move started elsewhere.
    #[error("the capture must be continued from {at}")]
    MustContinueJump {
        /// Square the capturing piece now stands on.
        at: Coord,
    },

    /// The session is not in the `Running` phase.
    #[error("game is not running")]
    GameNotRunning,

    /// Start was requested without a second player present.
    #[error("cannot start without a second player")]
    CannotStart,

    /// Join was requested on a session that already has both players, or by
    /// a player who is already seated.
    #[error("game is not open to join")]
    AlreadyJoined,

    /// The acting username is not seated in this game.
    #[error("{username} is not a player in this game")]
    UnknownPlayer {
        /// The unrecognized username.
        username: String,
    },
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::Illegal { from, to } => Self::IllegalMove { from, to },
        }
    }
}

/// Report returned by a successful move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Square of the captured piece, if the move was a jump.
    pub captured: Option<Coord>,
    /// Whether the moved piece was crowned.
    pub promoted: bool,
    /// Set when the same player must jump again from this square before the
    /// turn passes.
    pub continuation: Option<Coord>,
    /// Whether the move ended the match.
    pub finished: bool,
    /// Username of the winner when the match ended.
    pub winner: Option<String>,
}

impl GameSession {
    /// Seat the second player. Allowed only while the session is freshly
    /// hosted; the host cannot join their own game.
    pub fn join(&mut self, username: &str) -> Result<(), SessionError> {
        if self.phase != GamePhase::Hosted || username == self.host {
            return Err(SessionError::AlreadyJoined);
        }

        self.guest = Some(username.to_string());
        self.phase = GamePhase::AwaitingStart;
        debug!(code = %self.code, guest = username, "player joined");
        Ok(())
    }

    /// Begin play. Requires a seated second player; Red (the host) moves
    /// first.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase != GamePhase::AwaitingStart || self.guest.is_none() {
            return Err(SessionError::CannotStart);
        }

        self.phase = GamePhase::Running {
            turn: Team::Red,
            must_continue: None,
        };
        debug!(code = %self.code, "game started");
        Ok(())
    }

    /// The current position, for a seated player of a running game.
    pub fn board_for(&self, acting: &str) -> Result<&Board, SessionError> {
        self.running_turn()?;
        self.seat_of(acting)?;
        Ok(&self.board)
    }

    /// Legal destinations for the piece on `from`, honoring the acting
    /// player's turn and any forced-continuation constraint.
    ///
    /// Only the actor's own pieces produce moves; an empty or opposing
    /// square yields an empty list. While a continuation is pending, the
    /// obliged square yields its jumps and every other square yields nothing.
    pub fn available_moves(&self, from: Coord, acting: &str) -> Result<Vec<Move>, SessionError> {
        let (turn, must_continue) = self.running_turn()?;
        let team = self.seat_of(acting)?;
        if team != turn {
            return Err(SessionError::OutOfTurn {
                username: acting.to_string(),
            });
        }

        if !self.board.piece_at(from).is_some_and(|p| p.team == team) {
            return Ok(Vec::new());
        }
        match must_continue {
            Some(at) if at != from => Ok(Vec::new()),
            Some(_) => Ok(rules::available_moves(&self.board, from, true)),
            None => Ok(rules::available_moves(&self.board, from, false)),
        }
    }

    /// Execute a move for the acting player.
    ///
    /// On success the session advances. The turn passes to the opponent,
    /// unless the move captured and left the same piece a further jump, in
    /// which case the turn stays and the continuation square is recorded. A
    /// move that ends the match finishes the session with the winner.
    pub fn make_move(
        &mut self,
        from: Coord,
        to: Coord,
        acting: &str,
    ) -> Result<MoveReport, SessionError> {
        let (turn, must_continue) = self.running_turn()?;
        let team = self.seat_of(acting)?;
        if team != turn {
            return Err(SessionError::OutOfTurn {
                username: acting.to_string(),
            });
        }
        if let Some(at) = must_continue {
            if at != from {
                return Err(SessionError::MustContinueJump { at });
            }
        }
        // Only the player's own pieces may be moved.
        if !self.board.piece_at(from).is_some_and(|p| p.team == team) {
            return Err(SessionError::IllegalMove { from, to });
        }

        let outcome = rules::apply_move(&mut self.board, from, to, must_continue.is_some())?;
        self.last_move_at = Some(Utc::now());

        let report = match outcome.status {
            MatchStatus::Won(winner) => {
                self.phase = GamePhase::Finished { winner };
                debug!(code = %self.code, %winner, "game finished");
                MoveReport {
                    captured: outcome.captured,
                    promoted: outcome.promoted,
                    continuation: None,
                    finished: true,
                    winner: self.player_for(winner).map(str::to_string),
                }
            }
            MatchStatus::Ongoing => {
                self.phase = match outcome.continuation {
                    Some(at) => GamePhase::Running {
                        turn,
                        must_continue: Some(at),
                    },
                    None => GamePhase::Running {
                        turn: turn.opposite(),
                        must_continue: None,
                    },
                };
                debug!(
                    code = %self.code,
                    player = acting,
                    %from,
                    %to,
                    captured = outcome.captured.is_some(),
                    "move executed"
                );
                MoveReport {
                    captured: outcome.captured,
                    promoted: outcome.promoted,
                    continuation: outcome.continuation,
                    finished: false,
                    winner: None,
                }
            }
        };
        Ok(report)
    }

    /// Pass the turn without moving, clearing any forced-continuation
    /// constraint.
    pub fn end_turn(&mut self, acting: &str) -> Result<(), SessionError> {
        let (turn, _) = self.running_turn()?;
        let team = self.seat_of(acting)?;
        if team != turn {
            return Err(SessionError::OutOfTurn {
                username: acting.to_string(),
            });
        }

        self.phase = GamePhase::Running {
            turn: turn.opposite(),
            must_continue: None,
        };
        debug!(code = %self.code, player = acting, "turn passed");
        Ok(())
    }

    fn running_turn(&self) -> Result<(Team, Option<Coord>), SessionError> {
        match self.phase {
            GamePhase::Running {
                turn,
                must_continue,
            } => Ok((turn, must_continue)),
            _ => Err(SessionError::GameNotRunning),
        }
    }

    fn seat_of(&self, username: &str) -> Result<Team, SessionError> {
        self.team_of(username)
            .ok_or_else(|| SessionError::UnknownPlayer {
                username: username.to_string(),
            })
    }
}
