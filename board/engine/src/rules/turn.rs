use board::Color;

use crate::{rules::RuleHooks, Board, MoveContext, Result};

/// Advance the half-move clock, or reset it after a pawn move or capture
fn tick_halfmove(board: &mut Board, ctx: &MoveContext) {
    if ctx.is_irreversible() {
        board.halfmove = 0;
    } else {
        board.halfmove += 1;
    }
}

/// Hand the turn to the other side, counting a full move once black has moved
fn pass_turn(board: &mut Board) {
    if board.active == Color::Black {
        board.fullmove += 1;
    }
    board.active = board.active.other();
}

/// One move per turn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardTurn;

impl RuleHooks for StandardTurn {
    fn after_turn(&mut self, board: &mut Board, ctx: &mut MoveContext) -> Result<()> {
        tick_halfmove(board, ctx);
        pass_turn(board);
        Ok(())
    }
}

/// Each side makes a fixed number of moves before the turn passes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultipleMoveTurn {
    white_moves: u32,
    black_moves: u32,
    /// Moves the side to move has left this turn
    moves_left: u32,
}

impl MultipleMoveTurn {
    /// Both budgets are at least one move
    pub fn new(white_moves: u32, black_moves: u32) -> Self {
        let white_moves = white_moves.max(1);
        Self {
            white_moves,
            black_moves: black_moves.max(1),
            moves_left: white_moves,
        }
    }

    pub fn budget(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white_moves,
            Color::Black => self.black_moves,
        }
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }
}

impl RuleHooks for MultipleMoveTurn {
    fn on_game_start(&mut self, board: &Board) {
        self.moves_left = self.budget(board.active());
    }

    fn after_turn(&mut self, board: &mut Board, ctx: &mut MoveContext) -> Result<()> {
        tick_halfmove(board, ctx);
        if self.moves_left == 0 {
            self.moves_left = self.budget(board.active());
        }
        self.moves_left -= 1;
        if self.moves_left == 0 {
            pass_turn(board);
            self.moves_left = self.budget(board.active());
        }
        Ok(())
    }
}
