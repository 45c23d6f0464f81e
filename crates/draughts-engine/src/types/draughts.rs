//! Core rule types: teams, pieces, squares, and candidate moves.
//!
//! These are the serializable building blocks shared by the rules engine and
//! the session record. Rows run 0-7 from White's back rank to Red's back
//! rank; columns run 0-7 left to right.

use serde::{Deserialize, Serialize};

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 8;

/// One of the two sides, Red or White.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Red pieces, starting on rows 5-7 and moving toward row 0.
    Red,
    /// White pieces, starting on rows 0-2 and moving toward row 7.
    White,
}

impl Team {
    /// Get the opposing team.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::White,
            Self::White => Self::Red,
        }
    }

    /// The opposite back rank, where a piece of this team is crowned.
    #[must_use]
    pub const fn crowning_row(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::White => BOARD_SIZE - 1,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::White => write!(f, "white"),
        }
    }
}

/// A single checker. The team never changes; only the king flag does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Which side the piece belongs to.
    pub team: Team,
    /// Whether the piece has been crowned.
    pub is_king: bool,
}

impl Piece {
    /// A regular (uncrowned) piece.
    #[must_use]
    pub const fn man(team: Team) -> Self {
        Self {
            team,
            is_king: false,
        }
    }

    /// A crowned piece.
    #[must_use]
    pub const fn king(team: Team) -> Self {
        Self {
            team,
            is_king: true,
        }
    }
}

/// A square position on the board. Construction is bounds-checked, so a
/// `Coord` always names a real square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Create a coordinate, or `None` when it falls outside the board.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Get the row (0-7).
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Get the column (0-7).
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// The square one step away along a diagonal, or `None` off the board.
    #[must_use]
    pub fn offset(self, row_delta: i8, col_delta: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(row_delta);
        let col = i16::from(self.col) + i16::from(col_delta);
        if (0..i16::from(BOARD_SIZE)).contains(&row) && (0..i16::from(BOARD_SIZE)).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Iterate every square on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).filter_map(move |col| Self::new(row, col)))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// A candidate transition for the piece on `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Square the piece starts on.
    pub from: Coord,
    /// Square the piece lands on.
    pub to: Coord,
    /// Square of the opposing piece this move jumps, present only for
    /// capturing moves.
    pub captures: Option<Coord>,
}

impl Move {
    /// Returns true if this move captures a piece.
    #[must_use]
    pub const fn is_jump(&self) -> bool {
        self.captures.is_some()
    }
}
