//! Shared vocabulary for chess positions on boards of any size

use core::{fmt, str::FromStr};

pub mod config;
pub mod fen;
pub mod start_position;

pub use config::{GameConfig, Preset};
pub use fen::{FenFields, Placement};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The narrowest board a position may be built on
pub const MIN_WIDTH: usize = 5;
/// The shortest board a position may be built on
pub const MIN_HEIGHT: usize = 4;
/// Files are lettered `a` through `z`, so no more than that
pub const MAX_WIDTH: usize = 26;
pub const MAX_HEIGHT: usize = 255;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("malformed position: {0}")]
    MalformedPosition(String),
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("invalid square reference `{0}`")]
    InvalidSquareReference(String),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
    /// Moves to any empty square, attacks nothing, and changes sides instead of leaving the board
    /// when captured
    Bureaucrat,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 7] = [
        Self::Pawn,
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
        Self::King,
        Self::Bureaucrat,
    ];

    /// The capitalized version of the letter used for this piece in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
            Self::Bureaucrat => 'C',
        }
    }

    /// Reads the kind from a FEN letter of either case
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(Self::Pawn),
            'R' => Some(Self::Rook),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            'C' => Some(Self::Bureaucrat),
            _ => None,
        }
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row step a pawn of this color advances by
    ///
    /// Rows count down from the top of the board, so white moves towards smaller rows.
    pub const fn forward(self) -> i16 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The letter used for the side to move in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// A piece, without any knowledge of where it stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}
impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    pub const fn fen_letter(self) -> char {
        match self.color {
            Color::White => self.kind.fen_letter().to_ascii_uppercase(),
            Color::Black => self.kind.fen_letter().to_ascii_lowercase(),
        }
    }

    /// Uppercase letters are white, lowercase are black
    pub const fn from_fen_letter(letter: char) -> Option<Self> {
        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match PieceKind::from_fen_letter(letter) {
            Some(kind) => Some(Self { kind, color }),
            None => None,
        }
    }
}

/// The possible outcomes of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    /// White checkmated black
    WhiteCheckmate,
    /// Black checkmated white
    BlackCheckmate,
    /// The side to move isn't in check but has no legal move
    Stalemate,
}
impl GameOutcome {
    pub const fn checkmate(winner: Color) -> Self {
        match winner {
            Color::White => Self::WhiteCheckmate,
            Color::Black => Self::BlackCheckmate,
        }
    }

    pub const fn winner(self) -> Option<Color> {
        match self {
            Self::WhiteCheckmate => Some(Color::White),
            Self::BlackCheckmate => Some(Color::Black),
            Self::Stalemate => None,
        }
    }
}
impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WhiteCheckmate => f.write_str("checkmate, white wins"),
            Self::BlackCheckmate => f.write_str("checkmate, black wins"),
            Self::Stalemate => f.write_str("stalemate"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CheckStatus {
    None,
    Check,
    Checkmate,
}
/// Returns the status as appended to a move in algebraic notation
impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "",
            Self::Check => "+",
            Self::Checkmate => "#",
        })
    }
}

/// A square on the board
///
/// The origin is the top-left corner: `file` grows to the right and `row` grows downwards, so
/// white's back rank is the row `height - 1`. Squares know nothing about the board's size, so
/// bounds are checked against a board with [`Self::in_bounds`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardSquare {
    pub file: i16,
    pub row: i16,
}
impl BoardSquare {
    /// An invalid square
    ///
    /// Please use this instead of making your own so it's obvious if a deliberately-invalid square
    /// appeared.
    pub const INVALID: Self = Self { file: -1, row: -1 };

    pub const fn new(file: i16, row: i16) -> Self {
        Self { file, row }
    }

    /// Returns if this square could be on some board
    ///
    /// ```
    /// # use board::BoardSquare;
    /// assert!(!BoardSquare::INVALID.is_valid());
    /// assert!(BoardSquare::new(0, 0).is_valid());
    /// ```
    pub const fn is_valid(self) -> bool {
        self.file >= 0 && self.row >= 0
    }

    /// Returns if this square is on a board of the given size
    pub const fn in_bounds(self, width: usize, height: usize) -> bool {
        self.is_valid() && (self.file as usize) < width && (self.row as usize) < height
    }

    /// Offset by the given step
    ///
    /// ```
    /// # use board::{BoardSquare, BoardSquareOffset};
    /// let square = BoardSquare::new(4, 6);
    /// assert_eq!(square.offset(BoardSquareOffset::new(1, -2)), BoardSquare::new(5, 4));
    /// ```
    pub const fn offset(self, offset: BoardSquareOffset) -> Self {
        Self {
            file: self.file + offset.file as i16,
            row: self.row + offset.row as i16,
        }
    }

    /// Index into a row-major grid of the given width
    ///
    /// Only meaningful for squares that are [`Self::in_bounds`].
    pub const fn index(self, width: usize) -> usize {
        self.row as usize * width + self.file as usize
    }

    /// The name of this square on a board of the given size, like `e4` or `j10`
    pub fn notation(self, width: usize, height: usize) -> Option<String> {
        if !self.in_bounds(width, height) {
            return None;
        }
        let file = char::from(b'a' + self.file as u8);
        let rank = height - self.row as usize;
        Some(format!("{file}{rank}"))
    }

    /// Parse a square name for a board of the given size
    ///
    /// ```
    /// # use board::BoardSquare;
    /// assert_eq!(BoardSquare::from_notation("a8", 8, 8), Ok(BoardSquare::new(0, 0)));
    /// assert_eq!(BoardSquare::from_notation("j10", 10, 10), Ok(BoardSquare::new(9, 0)));
    /// assert!(BoardSquare::from_notation("i1", 8, 8).is_err());
    /// assert!(BoardSquare::from_notation("-", 8, 8).is_err());
    /// ```
    pub fn from_notation(s: &str, width: usize, height: usize) -> Result<Self> {
        let err = || Error::InvalidSquareReference(s.to_string());
        let mut chars = s.chars();
        let file = match chars.next() {
            Some(c @ 'a'..='z') => (c as u8 - b'a') as usize,
            _ => return Err(err()),
        };
        let rank_str = chars.as_str();
        if rank_str.is_empty() || !rank_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let rank: usize = rank_str.parse().map_err(|_| err())?;
        if file >= width || rank == 0 || rank > height {
            return Err(err());
        }
        Ok(Self::new(file as i16, (height - rank) as i16))
    }
}
impl fmt::Debug for BoardSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "BoardSquare({}, {})", self.file, self.row)
        } else {
            f.write_str("BoardSquare(invalid)")
        }
    }
}

/// Parses `"file,row"` coordinates, as handed over by a click on a rendered board
impl FromStr for BoardSquare {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || Error::InvalidSquareReference(s.to_string());
        let (file, row) = s.split_once(',').ok_or_else(err)?;
        let file = file.trim().parse().map_err(|_| err())?;
        let row = row.trim().parse().map_err(|_| err())?;
        Ok(Self::new(file, row))
    }
}

/// A step across the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardSquareOffset {
    pub file: i8,
    pub row: i8,
}
impl BoardSquareOffset {
    /// The offsets corresponding to all possible knight moves
    pub const KNIGHT_MOVES: [BoardSquareOffset; 8] = [
        Self::new(1, 2),
        Self::new(-1, 2),
        Self::new(1, -2),
        Self::new(-1, -2),
        Self::new(2, 1),
        Self::new(-2, 1),
        Self::new(2, -1),
        Self::new(-2, -1),
    ];

    /// The offsets corresponding to all possible king moves
    ///
    /// These are also the directions a queen slides in.
    pub const KING_MOVES: [BoardSquareOffset; 8] = [
        Self::new(1, 1),
        Self::new(0, 1),
        Self::new(-1, 1),
        Self::new(1, 0),
        Self::new(-1, 0),
        Self::new(1, -1),
        Self::new(0, -1),
        Self::new(-1, -1),
    ];

    /// The directions a rook slides in
    pub const ROOK_DIRECTIONS: [BoardSquareOffset; 4] = [
        Self::new(1, 0),
        Self::new(-1, 0),
        Self::new(0, 1),
        Self::new(0, -1),
    ];

    /// The directions a bishop slides in
    pub const BISHOP_DIRECTIONS: [BoardSquareOffset; 4] = [
        Self::new(1, 1),
        Self::new(-1, 1),
        Self::new(1, -1),
        Self::new(-1, -1),
    ];

    pub const fn new(file: i8, row: i8) -> Self {
        Self { file, row }
    }
}
