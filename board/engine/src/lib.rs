//! A chess rules engine for boards of any size
//!
//! The [`Board`] owns every piece in an arena addressed by [`PieceId`], so a piece keeps its
//! identity through captures, transformations, and the simulate/revert check detection. Moves go
//! through [`Board::apply`], which runs the board's [`Rule`]s in five fixed phases.

use core::fmt;

use board::{BoardSquare, CheckStatus, Color, GameOutcome, Piece, PieceKind};

mod check;
mod fen;
mod move_context;
pub mod pieces;
pub mod rules;

pub use crate::move_context::{MoveContext, MoveResult};
pub use crate::rules::{build_rules, Rule};

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Board(#[from] board::Error),
    #[error("no piece at {0}")]
    NoPieceAtSource(String),
    #[error("it is {expected}'s turn, not {found}'s")]
    WrongTurn { expected: Color, found: Color },
    #[error("{to} is not a legal target for the piece on {from}{}", exposure_note(.exposes_king))]
    IllegalDestination {
        from: String,
        to: String,
        exposes_king: bool,
    },
    #[error("invalid special move: {0}")]
    InvalidSpecialMove(&'static str),
    #[error("checkmate, {winner} wins")]
    Checkmate { winner: Color, applied: MoveResult },
    #[error("stalemate")]
    Stalemate { applied: MoveResult },
    #[error("the game is already over")]
    GameFinished,
}
fn exposure_note(exposes_king: &bool) -> &'static str {
    if *exposes_king {
        " (would leave own king in check)"
    } else {
        ""
    }
}

impl Error {
    /// Whether this ends the game after the move was applied, rather than rejecting the move
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Checkmate { .. } | Self::Stalemate { .. })
    }

    /// The move that was applied before a terminal signal was raised
    pub const fn applied(&self) -> Option<MoveResult> {
        match self {
            Self::Checkmate { applied, .. } | Self::Stalemate { applied } => Some(*applied),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Which castles a king may still make (it and the corner rook haven't moved yet)
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        const Kingside = 0b0000_0001;
        const Queenside = 0b0000_0010;
    }
}

/// A handle to a piece on a [`Board`]
///
/// Handles stay valid for the life of the board, including after the piece has been captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

/// A piece as the board tracks it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPiece {
    pub piece: Piece,
    /// Where the piece stands, or `None` once it has been captured
    pub square: Option<BoardSquare>,
    /// Only ever set on kings
    pub castle: CastleRights,
}
impl BoardPiece {
    pub const fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    pub const fn color(&self) -> Color {
        self.piece.color
    }
}

/// A position together with the rules it is played by
#[derive(Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    pub(crate) pieces: Vec<BoardPiece>,
    /// Which piece stands on each square, row-major
    grid: Vec<Option<PieceId>>,
    pub(crate) active: Color,
    /// Where a pawn may capture en passant, or [`BoardSquare::INVALID`]
    pub(crate) en_passant: BoardSquare,
    /// Number of half-moves since a pawn was moved or a piece was captured
    pub(crate) halfmove: u32,
    pub(crate) fullmove: u32,
    rules: Vec<Rule>,
    pub(crate) outcome: Option<GameOutcome>,
}

impl Board {
    /// A board with nothing on it and no rules
    pub(crate) fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pieces: Vec::new(),
            grid: vec![None; width * height],
            active: Color::White,
            en_passant: BoardSquare::INVALID,
            halfmove: 0,
            fullmove: 1,
            rules: Vec::new(),
            outcome: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The side to move
    pub fn active(&self) -> Color {
        self.active
    }

    pub fn en_passant(&self) -> BoardSquare {
        self.en_passant
    }

    pub fn halfmove(&self) -> u32 {
        self.halfmove
    }

    pub fn fullmove(&self) -> u32 {
        self.fullmove
    }

    /// How the game ended, if it has
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Replace the rules this board is played by, starting them on the current position
    pub fn set_rules(&mut self, mut rules: Vec<Rule>) {
        for rule in &mut rules {
            rule.hooks_mut().on_game_start(self);
        }
        self.rules = rules;
    }

    pub fn in_bounds(&self, square: BoardSquare) -> bool {
        square.in_bounds(self.width, self.height)
    }

    /// The name of a square on this board, or `-` if it isn't on it
    pub fn notation(&self, square: BoardSquare) -> String {
        square
            .notation(self.width, self.height)
            .unwrap_or_else(|| "-".to_string())
    }

    /// Parse a square name like `e4` on this board
    pub fn square(&self, notation: &str) -> Result<BoardSquare> {
        Ok(BoardSquare::from_notation(
            notation,
            self.width,
            self.height,
        )?)
    }

    /// The row a side's back rank starts on
    pub(crate) fn home_row(&self, color: Color) -> i16 {
        match color {
            Color::White => self.height as i16 - 1,
            Color::Black => 0,
        }
    }

    /// The row a side's pawns may push two squares from
    pub(crate) fn pawn_row(&self, color: Color) -> i16 {
        self.home_row(color) + color.forward()
    }

    pub fn piece(&self, id: PieceId) -> &BoardPiece {
        &self.pieces[id.0]
    }

    pub fn piece_at(&self, square: BoardSquare) -> Option<PieceId> {
        if self.in_bounds(square) {
            self.grid[square.index(self.width)]
        } else {
            None
        }
    }

    /// Every piece still on the board
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &BoardPiece)> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| piece.square.is_some())
            .map(|(idx, piece)| (PieceId(idx), piece))
    }

    /// Every piece still on the board belonging to the given side
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (PieceId, &BoardPiece)> {
        self.pieces().filter(move |(_, piece)| piece.color() == color)
    }

    pub fn king(&self, color: Color) -> Option<PieceId> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind() == PieceKind::King)
            .map(|(id, _)| id)
    }

    /// Put a new piece on an empty square
    pub(crate) fn place(&mut self, piece: Piece, square: BoardSquare) -> PieceId {
        let id = PieceId(self.pieces.len());
        debug_assert!(self.piece_at(square).is_none());
        self.pieces.push(BoardPiece {
            piece,
            square: Some(square),
            castle: CastleRights::empty(),
        });
        self.grid[square.index(self.width)] = Some(id);
        id
    }

    /// Move a piece to a square
    ///
    /// The square it leaves is only cleared if the piece is the one recorded there, so a piece
    /// that was moved onto during a capture can be relocated or removed afterwards without
    /// disturbing the capturer.
    pub(crate) fn relocate(&mut self, id: PieceId, to: BoardSquare) {
        if let Some(from) = self.pieces[id.0].square {
            let idx = from.index(self.width);
            if self.grid[idx] == Some(id) {
                self.grid[idx] = None;
            }
        }
        self.grid[to.index(self.width)] = Some(id);
        self.pieces[id.0].square = Some(to);
    }

    /// Take a piece off the board, keeping its handle alive
    pub(crate) fn remove(&mut self, id: PieceId) {
        if let Some(square) = self.pieces[id.0].square.take() {
            let idx = square.index(self.width);
            if self.grid[idx] == Some(id) {
                self.grid[idx] = None;
            }
        }
    }

    /// Put a removed piece back where it was
    pub(crate) fn restore(&mut self, id: PieceId, square: BoardSquare) {
        self.pieces[id.0].square = Some(square);
        self.grid[square.index(self.width)] = Some(id);
    }

    /// Whether any piece of the given side attacks the square
    pub fn is_square_attacked(&self, by: Color, square: BoardSquare) -> bool {
        self.pieces_of(by)
            .any(|(id, _)| pieces::attacks(self, id).contains(&square))
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.king(color)
            .and_then(|king| self.piece(king).square)
            .is_some_and(|square| self.is_square_attacked(color.other(), square))
    }

    /// Whether the side to move is in check, and whether it can get out of it
    pub fn check_status(&mut self) -> CheckStatus {
        let active = self.active;
        match (self.is_in_check(active), self.has_no_legal_moves(active)) {
            (false, _) => CheckStatus::None,
            (true, false) => CheckStatus::Check,
            (true, true) => CheckStatus::Checkmate,
        }
    }

    /// Apply the move of the piece on `from` to `to`
    ///
    /// On success the move has been made and the turn has advanced. A validation failure leaves the
    /// board untouched, while [`Error::Checkmate`] and [`Error::Stalemate`] mean the move was made
    /// and ended the game.
    pub fn apply(&mut self, from: BoardSquare, to: BoardSquare) -> Result<MoveResult> {
        for square in [from, to] {
            if !self.in_bounds(square) {
                return Err(board::Error::InvalidSquareReference(format!("{square:?}")).into());
            }
        }
        let piece = self
            .piece_at(from)
            .ok_or_else(|| Error::NoPieceAtSource(self.notation(from)))?;
        let mut ctx = MoveContext::new(self, piece, from, to);
        let mut rules = core::mem::take(&mut self.rules);
        let result = self.run_rules(&mut rules, &mut ctx);
        self.rules = rules;
        result
    }

    /// Apply a move given by square names, like `("e2", "e4")`
    pub fn apply_notation(&mut self, from: &str, to: &str) -> Result<MoveResult> {
        let from = self.square(from)?;
        let to = self.square(to)?;
        self.apply(from, to)
    }

    fn run_rules(&mut self, rules: &mut [Rule], ctx: &mut MoveContext) -> Result<MoveResult> {
        for rule in rules.iter() {
            rule.hooks().validate(self, ctx)?;
        }
        for rule in rules.iter_mut() {
            rule.hooks_mut().before_move(self, ctx)?;
        }

        self.relocate(ctx.piece, ctx.to);

        // Once the piece has moved there's no going back, so every rule gets to run and the first
        // signal raised is reported at the end
        let mut signal = None;
        for rule in rules.iter_mut() {
            if let Err(err) = rule.hooks_mut().after_move(self, ctx) {
                signal.get_or_insert(err);
            }
        }
        for rule in rules.iter_mut() {
            if let Err(err) = rule.hooks_mut().after_turn(self, ctx) {
                signal.get_or_insert(err);
            }
        }
        log::debug!(
            "{} moved {:?} {}-{}",
            ctx.mover.color,
            ctx.mover.kind,
            self.notation(ctx.from),
            self.notation(ctx.to)
        );
        match signal {
            Some(err) => Err(err),
            None => Ok(ctx.result()),
        }
    }
}

/// Draws the board with white at the bottom, uppercase for white and lowercase for black
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            write!(f, "{:>3} ", self.height - row)?;
            for file in 0..self.width {
                let square = BoardSquare::new(file as i16, row as i16);
                let letter = self
                    .piece_at(square)
                    .map_or('.', |id| self.piece(id).piece.fen_letter());
                write!(f, " {letter}")?;
            }
            writeln!(f)?;
        }
        f.write_str("    ")?;
        for file in 0..self.width {
            write!(f, " {}", char::from(b'a' + file as u8))?;
        }
        writeln!(f)
    }
}
