use board::{GameOutcome, PieceKind};
use log::info;

use crate::{rules::RuleHooks, Board, Error, MoveContext, Result};

/// Ends the game when the mover's opponent has no legal move left
///
/// With the opponent in check that is checkmate, otherwise stalemate. A side with several moves a
/// turn can also take the king outright, which counts as checkmate. Either way the outcome is
/// recorded on the board, which refuses any further moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndCondition;

impl RuleHooks for EndCondition {
    fn after_turn(&mut self, board: &mut Board, ctx: &mut MoveContext) -> Result<()> {
        let winner = ctx.mover.color;
        let opponent = winner.other();
        let king_taken = ctx
            .captured
            .is_some_and(|victim| board.piece(victim).kind() == PieceKind::King);
        if !king_taken && !board.has_no_legal_moves(opponent) {
            return Ok(());
        }
        let applied = ctx.result();
        let (outcome, signal) = if king_taken || board.is_in_check(opponent) {
            (
                GameOutcome::checkmate(winner),
                Error::Checkmate { winner, applied },
            )
        } else {
            (GameOutcome::Stalemate, Error::Stalemate { applied })
        };
        info!("game over: {outcome}");
        board.outcome = Some(outcome);
        Err(signal)
    }
}
