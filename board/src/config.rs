//! The configuration a game is started from

use core::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{Error, MIN_HEIGHT, MIN_WIDTH};

/// The standard chess starting position
pub const STANDARD_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
/// The standard starting position with a bureaucrat in front of each side's pawns
pub const BUREAUCRAT_FEN: &str = "rnbqkbnr/pppppppp/3c4/8/8/4C3/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Everything that decides how a game is set up
///
/// This is fixed once the game starts. Any field left out of a config file takes its default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Start from this position instead of the preset one
    pub fen: Option<String>,
    /// Whether bureaucrats are in play
    pub bureaucrat: bool,
    pub white_moves_per_turn: u32,
    pub black_moves_per_turn: u32,
    /// Requested number of files, or 0 to keep the width of the starting position
    pub board_width: usize,
    /// Requested number of ranks, or 0 to keep the height of the starting position
    pub board_height: usize,
    /// Put pieces on files added when widening the board
    pub fill_expanded_files: bool,
    /// Shuffle the back ranks, Chess960 style
    pub randomize_back_rank: bool,
}
impl GameConfig {
    /// Clamp the values into the ranges a game can be started with
    ///
    /// Moves per turn become at least one, and a requested size becomes at least the smallest
    /// board allowed. A size of 0 is left alone, since it means "don't resize".
    pub fn normalized(mut self) -> Self {
        self.white_moves_per_turn = self.white_moves_per_turn.max(1);
        self.black_moves_per_turn = self.black_moves_per_turn.max(1);
        if self.board_width != 0 {
            self.board_width = self.board_width.max(MIN_WIDTH);
        }
        if self.board_height != 0 {
            self.board_height = self.board_height.max(MIN_HEIGHT);
        }
        if self.fen.as_deref().is_some_and(|fen| fen.trim().is_empty()) {
            self.fen = None;
        }
        self
    }

    /// The position the game is built from, before any resizing
    pub fn base_fen(&self) -> &str {
        match self.fen.as_deref() {
            Some(fen) if !fen.trim().is_empty() => fen,
            _ if self.bureaucrat => BUREAUCRAT_FEN,
            _ => STANDARD_FEN,
        }
    }

    /// Whether either side gets more than one move per turn
    pub fn is_multi_move(&self) -> bool {
        self.white_moves_per_turn > 1 || self.black_moves_per_turn > 1
    }
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fen: None,
            bureaucrat: false,
            white_moves_per_turn: 1,
            black_moves_per_turn: 1,
            board_width: 0,
            board_height: 0,
            fill_expanded_files: false,
            randomize_back_rank: false,
        }
    }
}

/// The games that can be picked without writing a config by hand
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Standard,
    DoubleMove,
    Bureaucrat,
    BureaucratDoubleMove,
}
impl Preset {
    pub const PRESETS: [Preset; 4] = [
        Self::Standard,
        Self::DoubleMove,
        Self::Bureaucrat,
        Self::BureaucratDoubleMove,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::DoubleMove => "double-move",
            Self::Bureaucrat => "bureaucrat",
            Self::BureaucratDoubleMove => "bureaucrat-double-move",
        }
    }

    pub fn config(self) -> GameConfig {
        let (bureaucrat, moves) = match self {
            Self::Standard => (false, 1),
            Self::DoubleMove => (false, 2),
            Self::Bureaucrat => (true, 1),
            Self::BureaucratDoubleMove => (true, 2),
        };
        GameConfig {
            bureaucrat,
            white_moves_per_turn: moves,
            black_moves_per_turn: moves,
            ..GameConfig::default()
        }
    }
}
impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PRESETS
            .into_iter()
            .find(|preset| preset.name() == s)
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}
