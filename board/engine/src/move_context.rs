use board::{BoardSquare, Piece, PieceKind};

use crate::{Board, PieceId};

/// What a successfully applied move did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveResult {
    pub from: BoardSquare,
    pub to: BoardSquare,
    /// The piece that was captured, if any
    ///
    /// A captured piece may still be on the board if a rule transformed it instead of removing it.
    pub captured: Option<PieceId>,
}

/// All the details of a move being applied, shared between the rules as it goes through them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveContext {
    pub piece: PieceId,
    /// The moving piece as it was when the move started
    pub mover: Piece,
    pub from: BoardSquare,
    pub to: BoardSquare,
    pub is_capture: bool,
    pub captured: Option<PieceId>,
    /// Set by whichever rule dealt with the captured piece, so no other rule removes it again
    pub capture_handled: bool,
    pub is_en_passant: bool,
    pub is_castling: bool,
    /// The rook that moves alongside a castling king, and where it goes
    pub castle_rook: Option<(PieceId, BoardSquare)>,
}
impl MoveContext {
    /// Start the details for a move, knowing only what is on the two squares
    pub fn new(board: &Board, piece: PieceId, from: BoardSquare, to: BoardSquare) -> Self {
        let captured = board.piece_at(to).filter(|&victim| victim != piece);
        Self {
            piece,
            mover: board.piece(piece).piece,
            from,
            to,
            is_capture: captured.is_some(),
            captured,
            capture_handled: false,
            is_en_passant: false,
            is_castling: false,
            castle_rook: None,
        }
    }

    /// Whether this resets the half-move clock
    pub fn is_irreversible(&self) -> bool {
        self.is_capture || self.mover.kind == PieceKind::Pawn
    }

    pub fn result(&self) -> MoveResult {
        MoveResult {
            from: self.from,
            to: self.to,
            captured: self.captured,
        }
    }
}
