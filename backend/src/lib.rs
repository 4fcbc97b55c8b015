//! Turns square clicks into moves on a [`Board`], and builds games from a [`GameConfig`]

use std::{fs, path::Path};

use board::{start_position, BoardSquare, CheckStatus, GameConfig, GameOutcome};
use engine::{build_rules, Board, MoveResult, PieceId};
use log::{debug, info};
use rand::Rng;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] engine::Error),
    #[error(transparent)]
    Board(#[from] board::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Read a game configuration from a TOML file
///
/// Missing keys take their defaults, and the result is normalized.
pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig> {
    let text = fs::read_to_string(path)?;
    let config: GameConfig = toml::from_str(&text)?;
    Ok(config.normalized())
}

/// Set up a game ready to be played
///
/// The starting position comes from the config's base position, resized and shuffled as asked,
/// and the board plays by the rules the config picks.
pub fn new_game<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Controller> {
    let config = config.clone().normalized();
    let fen = start_position::build(config.base_fen(), &config, rng)?;
    let mut board = Board::from_fen(&fen)?;
    board.set_rules(build_rules(&config));
    info!("new game from {fen}");
    Ok(Controller::new(board))
}

/// What a click did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing happened
    Noop,
    /// A piece was picked up, and can go to any of `targets`
    Selection {
        square: BoardSquare,
        targets: Vec<BoardSquare>,
    },
    /// The selected piece moved
    MoveApplied {
        from: BoardSquare,
        to: BoardSquare,
        captured: Option<PieceId>,
        /// Set if this move ended the game
        terminal: Option<GameOutcome>,
    },
    /// The move wasn't allowed, and the board is unchanged
    MoveRejected { reason: String },
}

/// A snapshot of everything a renderer needs besides the board itself
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub selected: Option<BoardSquare>,
    pub targets: Vec<BoardSquare>,
    pub last_move: Option<(BoardSquare, BoardSquare)>,
    /// Moves so far, like `e2-e4`, with `+` or `#` appended for check and mate
    pub history: Vec<String>,
    pub last_error: Option<String>,
    pub outcome: Option<GameOutcome>,
}

/// Click-driven play on a board: the first click picks a piece, the second moves it
#[derive(Debug)]
pub struct Controller {
    board: Board,
    selected: Option<BoardSquare>,
    /// Legal targets of the selected piece
    targets: Vec<BoardSquare>,
    last_move: Option<(BoardSquare, BoardSquare)>,
    history: Vec<String>,
    last_error: Option<String>,
}

impl Controller {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            selected: None,
            targets: Vec::new(),
            last_move: None,
            history: Vec::new(),
            last_error: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Handle a click on a square
    ///
    /// With nothing selected, a piece of the side to move is selected. With a piece selected,
    /// clicking another piece of its side selects that one instead, and anything else attempts the
    /// move and drops the selection either way.
    pub fn handle_click(&mut self, square: BoardSquare) -> ClickOutcome {
        self.last_error = None;

        let Some(selected) = self.selected else {
            return match self.board.piece_at(square) {
                Some(id) if self.board.piece(id).color() == self.board.active() => {
                    self.select(id, square)
                }
                _ => ClickOutcome::Noop,
            };
        };
        let Some(selected_id) = self.board.piece_at(selected) else {
            self.clear_selection();
            return ClickOutcome::Noop;
        };
        if let Some(clicked) = self.board.piece_at(square) {
            if self.board.piece(clicked).color() == self.board.piece(selected_id).color() {
                return self.select(clicked, square);
            }
        }

        self.clear_selection();
        match self.board.apply(selected, square) {
            Ok(result) => self.record(result, None),
            Err(err) => match err.applied() {
                Some(result) => self.record(result, self.board.outcome()),
                None => {
                    let reason = err.to_string();
                    debug!("rejected click: {reason}");
                    self.last_error = Some(reason.clone());
                    ClickOutcome::MoveRejected { reason }
                }
            },
        }
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            selected: self.selected,
            targets: self.targets.clone(),
            last_move: self.last_move,
            history: self.history.clone(),
            last_error: self.last_error.clone(),
            outcome: self.board.outcome(),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.targets.clear();
    }

    fn select(&mut self, id: PieceId, square: BoardSquare) -> ClickOutcome {
        self.selected = Some(square);
        self.targets = self.board.legal_targets(id);
        ClickOutcome::Selection {
            square,
            targets: self.targets.clone(),
        }
    }

    fn record(&mut self, result: MoveResult, terminal: Option<GameOutcome>) -> ClickOutcome {
        let status = match terminal {
            Some(GameOutcome::Stalemate) => CheckStatus::None,
            Some(_) => CheckStatus::Checkmate,
            None => self.board.check_status(),
        };
        self.history.push(format!(
            "{}-{}{status}",
            self.board.notation(result.from),
            self.board.notation(result.to)
        ));
        self.last_move = Some((result.from, result.to));
        ClickOutcome::MoveApplied {
            from: result.from,
            to: result.to,
            captured: result.captured,
            terminal,
        }
    }
}
