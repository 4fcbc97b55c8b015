use crate::{pieces, rules::RuleHooks, Board, Error, MoveContext, Result};

/// Rejects moves by the wrong side, moves a piece can't make, and moves into check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Legality;

impl RuleHooks for Legality {
    fn validate(&self, board: &mut Board, ctx: &MoveContext) -> Result<()> {
        if board.outcome().is_some() {
            return Err(Error::GameFinished);
        }
        let active = board.active();
        if ctx.mover.color != active {
            return Err(Error::WrongTurn {
                expected: active,
                found: ctx.mover.color,
            });
        }
        if !pieces::targets(board, ctx.piece).contains(&ctx.to) {
            return Err(illegal(board, ctx, false));
        }
        if board.would_leave_own_king_in_check(ctx.piece, ctx.from, ctx.to) {
            return Err(illegal(board, ctx, true));
        }
        Ok(())
    }
}

fn illegal(board: &Board, ctx: &MoveContext, exposes_king: bool) -> Error {
    Error::IllegalDestination {
        from: board.notation(ctx.from),
        to: board.notation(ctx.to),
        exposes_king,
    }
}
