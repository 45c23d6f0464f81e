//! Board model: the 8x8 grid and the standard start position.

use serde::{Deserialize, Serialize};

use crate::types::{Coord, Piece, Team, BOARD_SIZE};

const SIZE: usize = BOARD_SIZE as usize;

/// Fixed 8x8 grid of squares, row-major. Each square is empty or holds one
/// piece; no two pieces ever share a square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; SIZE]; SIZE],
}

impl Board {
    /// The standard start position: 12 White men on rows 0-2 and 12 Red men
    /// on rows 5-7, on the dark squares (even rows use even columns, odd rows
    /// odd columns).
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        for at in Coord::all() {
            if (at.row() + at.col()) % 2 != 0 {
                continue;
            }
            if at.row() < 3 {
                board.place(at, Piece::man(Team::White));
            } else if at.row() > 4 {
                board.place(at, Piece::man(Team::Red));
            }
        }
        board
    }

    /// A board with no pieces on it.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            squares: [[None; SIZE]; SIZE],
        }
    }

    /// What occupies the square, if anything.
    #[must_use]
    pub fn piece_at(&self, at: Coord) -> Option<Piece> {
        self.squares[at.row() as usize][at.col() as usize]
    }

    /// Put a piece on a square, replacing any previous occupant.
    pub fn place(&mut self, at: Coord, piece: Piece) {
        self.squares[at.row() as usize][at.col() as usize] = Some(piece);
    }

    /// Clear a square, returning the piece that was on it.
    pub fn remove(&mut self, at: Coord) -> Option<Piece> {
        self.squares[at.row() as usize][at.col() as usize].take()
    }

    /// Number of pieces the team has left on the board.
    #[must_use]
    pub fn count(&self, team: Team) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|square| square.is_some_and(|piece| piece.team == team))
            .count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.squares {
            for square in row {
                let glyph = match square {
                    None => '.',
                    Some(Piece {
                        team: Team::Red,
                        is_king: false,
                    }) => 'r',
                    Some(Piece {
                        team: Team::Red,
                        is_king: true,
                    }) => 'R',
                    Some(Piece {
                        team: Team::White,
                        is_king: false,
                    }) => 'w',
                    Some(Piece {
                        team: Team::White,
                        is_king: true,
                    }) => 'W',
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn start_position_has_twelve_pieces_per_team() {
        let board = Board::new();
        assert_eq!(board.count(Team::White), 12);
        assert_eq!(board.count(Team::Red), 12);
    }

    #[test]
    fn start_position_layout() {
        let board = Board::new();

        // White occupies the dark squares of rows 0-2.
        assert_eq!(board.piece_at(at(0, 0)), Some(Piece::man(Team::White)));
        assert_eq!(board.piece_at(at(1, 1)), Some(Piece::man(Team::White)));
        assert_eq!(board.piece_at(at(2, 6)), Some(Piece::man(Team::White)));
        assert_eq!(board.piece_at(at(0, 1)), None);

        // Red occupies the dark squares of rows 5-7.
        assert_eq!(board.piece_at(at(5, 1)), Some(Piece::man(Team::Red)));
        assert_eq!(board.piece_at(at(6, 0)), Some(Piece::man(Team::Red)));
        assert_eq!(board.piece_at(at(7, 7)), Some(Piece::man(Team::Red)));
        assert_eq!(board.piece_at(at(5, 0)), None);

        // The middle rows start empty.
        assert_eq!(board.piece_at(at(3, 3)), None);
        assert_eq!(board.piece_at(at(4, 4)), None);

        // Nobody starts crowned.
        for coord in Coord::all() {
            if let Some(piece) = board.piece_at(coord) {
                assert!(!piece.is_king);
            }
        }
    }

    #[test]
    fn place_and_remove_round_trip() {
        let mut board = Board::empty();
        let square = at(3, 4);

        board.place(square, Piece::king(Team::Red));
        assert_eq!(board.piece_at(square), Some(Piece::king(Team::Red)));
        assert_eq!(board.count(Team::Red), 1);

        assert_eq!(board.remove(square), Some(Piece::king(Team::Red)));
        assert_eq!(board.piece_at(square), None);
        assert_eq!(board.count(Team::Red), 0);
    }

    #[test]
    fn display_renders_start_position() {
        let rendered = Board::new().to_string();
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0], "w.w.w.w.");
        assert_eq!(rows[1], ".w.w.w.w");
        assert_eq!(rows[3], "........");
        assert_eq!(rows[7], ".r.r.r.r");
    }

    #[test]
    fn board_survives_json_round_trip() {
        let board = Board::new();
        let json = serde_json::to_string(&board).unwrap();
        let parsed: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, board);
    }
}
