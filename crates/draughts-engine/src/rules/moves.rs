//! Legal-move generation and move execution.
//!
//! Non-king pieces step along their team's two forward diagonals; kings use
//! all four. A jump is a move over an adjacent opposing piece into the empty
//! square beyond it. Execution validates everything up front, so a rejected
//! move leaves the board untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Coord, Move, Piece, Team};

use super::board::Board;

const RED_DELTAS: [(i8, i8); 2] = [(-1, -1), (-1, 1)];
const WHITE_DELTAS: [(i8, i8); 2] = [(1, -1), (1, 1)];
const KING_DELTAS: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, -1), (-1, 1)];

/// Rejection from the move executor. The board is never modified on error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The destination is not among the legal moves for the start square
    /// under the given jump constraint.
    #[error("no legal move from {from} to {to}")]
    Illegal {
        /// Square the move started from.
        from: Coord,
        /// Requested destination.
        to: Coord,
    },
}

/// Match status recomputed after every executed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Both teams still have pieces.
    Ongoing,
    /// The named team captured the opponent's last piece.
    Won(Team),
}

/// What a successfully executed move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Square of the captured piece, if the move was a jump.
    pub captured: Option<Coord>,
    /// Whether the piece was crowned by this move.
    pub promoted: bool,
    /// Landing square, set when the move captured and the same piece has a
    /// further jump available from there.
    pub continuation: Option<Coord>,
    /// Match status after the move.
    pub status: MatchStatus,
}

fn deltas(piece: Piece) -> &'static [(i8, i8)] {
    if piece.is_king {
        &KING_DELTAS
    } else {
        match piece.team {
            Team::Red => &RED_DELTAS,
            Team::White => &WHITE_DELTAS,
        }
    }
}

/// Legal moves for the piece on `from`, in delta order.
///
/// With `jump_required` set, simple diagonal steps are suppressed and only
/// capturing moves are returned. An empty square yields an empty list, not an
/// error.
#[must_use]
pub fn available_moves(board: &Board, from: Coord, jump_required: bool) -> Vec<Move> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    for &(row_delta, col_delta) in deltas(piece) {
        let Some(target) = from.offset(row_delta, col_delta) else {
            continue;
        };
        match board.piece_at(target) {
            None => {
                if !jump_required {
                    moves.push(Move {
                        from,
                        to: target,
                        captures: None,
                    });
                }
            }
            Some(other) if other.team != piece.team => {
                // Jump lands two deltas away, over the opposing piece.
                if let Some(landing) = target.offset(row_delta, col_delta) {
                    if board.piece_at(landing).is_none() {
                        moves.push(Move {
                            from,
                            to: landing,
                            captures: Some(target),
                        });
                    }
                }
            }
            Some(_) => {}
        }
    }
    moves
}

/// Squares holding a `team` piece that has at least one legal move.
#[must_use]
pub fn movable_pieces(board: &Board, team: Team) -> Vec<Coord> {
    Coord::all()
        .filter(|&at| {
            board.piece_at(at).is_some_and(|piece| piece.team == team)
                && !available_moves(board, at, false).is_empty()
        })
        .collect()
}

/// Execute the move from `from` to `to` under the given jump constraint.
///
/// The destination must be one the generator produces for `from`; anything
/// else is rejected with the board byte-for-byte unchanged. A successful move
/// relocates the piece, removes a jumped opponent, crowns the piece on
/// reaching the opposite back rank, recounts both teams to detect a win, and
/// probes for a continuation jump from the landing square.
pub fn apply_move(
    board: &mut Board,
    from: Coord,
    to: Coord,
    jump_required: bool,
) -> Result<MoveOutcome, MoveError> {
    let Some(chosen) = available_moves(board, from, jump_required)
        .into_iter()
        .find(|candidate| candidate.to == to)
    else {
        return Err(MoveError::Illegal { from, to });
    };

    let Some(mut piece) = board.piece_at(from) else {
        return Err(MoveError::Illegal { from, to });
    };

    // Invariant check before any mutation: a jumped square must hold an
    // opponent.
    if let Some(captured) = chosen.captures {
        match board.piece_at(captured) {
            Some(other) if other.team != piece.team => {}
            _ => return Err(MoveError::Illegal { from, to }),
        }
    }

    board.remove(from);
    if let Some(captured) = chosen.captures {
        board.remove(captured);
    }

    let promoted = !piece.is_king && to.row() == piece.team.crowning_row();
    if promoted {
        piece.is_king = true;
    }
    board.place(to, piece);

    let status = if board.count(Team::Red) == 0 {
        MatchStatus::Won(Team::White)
    } else if board.count(Team::White) == 0 {
        MatchStatus::Won(Team::Red)
    } else {
        MatchStatus::Ongoing
    };

    let continuation = (chosen.captures.is_some()
        && status == MatchStatus::Ongoing
        && !available_moves(board, to, true).is_empty())
    .then_some(to);

    Ok(MoveOutcome {
        captured: chosen.captures,
        promoted,
        continuation,
        status,
    })
}
