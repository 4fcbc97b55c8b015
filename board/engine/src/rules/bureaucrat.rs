use board::{BoardSquare, PieceKind};
use log::debug;

use crate::{rules::RuleHooks, Board, MoveContext, Result};

/// A captured bureaucrat isn't removed: it changes sides and moves to the first empty square
///
/// Squares are scanned file by file from the left, top to bottom within each file. If the board
/// is full the bureaucrat is removed after all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BureaucratCapture;

impl RuleHooks for BureaucratCapture {
    fn after_move(&mut self, board: &mut Board, ctx: &mut MoveContext) -> Result<()> {
        if !ctx.is_capture || ctx.capture_handled {
            return Ok(());
        }
        let Some(victim) = ctx.captured else {
            return Ok(());
        };
        if board.piece(victim).kind() != PieceKind::Bureaucrat {
            return Ok(());
        }

        let color = board.piece(victim).color().other();
        board.pieces[victim.0].piece.color = color;
        match first_empty_square(board) {
            Some(square) => {
                board.relocate(victim, square);
                debug!("bureaucrat defected to {color} on {}", board.notation(square));
            }
            None => board.remove(victim),
        }
        ctx.capture_handled = true;
        Ok(())
    }
}

fn first_empty_square(board: &Board) -> Option<BoardSquare> {
    (0..board.width() as i16)
        .flat_map(|file| (0..board.height() as i16).map(move |row| BoardSquare::new(file, row)))
        .find(|&square| board.piece_at(square).is_none())
}
