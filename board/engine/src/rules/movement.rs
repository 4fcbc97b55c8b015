use board::{BoardSquare, Color, PieceKind};
use log::debug;

use crate::{pieces, rules::RuleHooks, Board, CastleRights, Error, MoveContext, Result};

/// How pieces move in standard chess: captures, castling, en passant, and castling rights
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Movement;

impl RuleHooks for Movement {
    fn before_move(&mut self, board: &mut Board, ctx: &mut MoveContext) -> Result<()> {
        let kind = ctx.mover.kind;
        let color = ctx.mover.color;

        if kind == PieceKind::King && (ctx.to.file - ctx.from.file).abs() == 2 {
            let direction = (ctx.to.file - ctx.from.file).signum();
            let rook = pieces::castling_rook(board, ctx.from, direction, color)
                .ok_or(Error::InvalidSpecialMove("castling without a rook to castle with"))?;
            ctx.is_castling = true;
            ctx.castle_rook = Some((
                rook,
                BoardSquare::new(ctx.from.file + direction, ctx.from.row),
            ));
        }

        if kind == PieceKind::Pawn && ctx.from.file != ctx.to.file && ctx.captured.is_none() {
            if ctx.to != board.en_passant() {
                return Err(Error::InvalidSpecialMove(
                    "diagonal pawn move without a capture",
                ));
            }
            let victim = pieces::en_passant_victim(board, ctx.from, ctx.to, color)
                .ok_or(Error::InvalidSpecialMove("en passant without a pawn to capture"))?;
            board.remove(victim);
            ctx.is_en_passant = true;
            ctx.is_capture = true;
            ctx.captured = Some(victim);
            ctx.capture_handled = true;
        }
        Ok(())
    }

    fn after_move(&mut self, board: &mut Board, ctx: &mut MoveContext) -> Result<()> {
        if let Some((rook, square)) = ctx.castle_rook {
            board.relocate(rook, square);
            debug!("{} castled", ctx.mover.color);
        }

        if ctx.is_capture && !ctx.capture_handled {
            if let Some(victim) = ctx.captured {
                board.remove(victim);
            }
            ctx.capture_handled = true;
        }

        board.en_passant = if ctx.mover.kind == PieceKind::Pawn
            && (ctx.to.row - ctx.from.row).abs() == 2
        {
            BoardSquare::new(ctx.from.file, ctx.from.row + ctx.mover.color.forward())
        } else {
            BoardSquare::INVALID
        };

        update_castle_rights(board, ctx);
        Ok(())
    }
}

/// Take away castling rights that this move ended
///
/// A king that moves loses both. A rook leaving its side's corner ends the castle towards that
/// corner, and so does a rook being captured on it. Other pieces come and go from the corners
/// freely.
fn update_castle_rights(board: &mut Board, ctx: &MoveContext) {
    if ctx.mover.kind == PieceKind::King {
        board.pieces[ctx.piece.0].castle = CastleRights::empty();
    }
    let captured_rook = ctx
        .captured
        .map(|victim| board.piece(victim).piece)
        .filter(|piece| piece.kind == PieceKind::Rook);
    let last_file = board.width() as i16 - 1;
    for color in [Color::White, Color::Black] {
        let Some(king) = board.king(color) else {
            continue;
        };
        let row = board.home_row(color);
        for (file, right) in [(0, CastleRights::Queenside), (last_file, CastleRights::Kingside)] {
            let corner = BoardSquare::new(file, row);
            let rook_left = ctx.mover.kind == PieceKind::Rook
                && ctx.mover.color == color
                && ctx.from == corner;
            let rook_taken =
                ctx.to == corner && captured_rook.is_some_and(|rook| rook.color == color);
            if rook_left || rook_taken {
                board.pieces[king.0].castle.remove(right);
            }
        }
    }
}
