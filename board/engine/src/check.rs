//! Check detection by trying moves out on the board and taking them back

use board::{BoardSquare, Color, PieceKind};

use crate::{pieces, Board, PieceId};

/// One change made while simulating a move, recorded so it can be undone
#[derive(Clone, Copy, Debug)]
enum Undo {
    Moved { id: PieceId, from: BoardSquare },
    Removed { id: PieceId, square: BoardSquare },
}

impl Board {
    /// Whether moving the piece from `from` to `to` would leave its own king attacked
    ///
    /// The move is made on this board, with any capture (including en passant) and the rook of a
    /// castle, then undone in reverse. Castling rights and every other flag are left alone, so the
    /// board is exactly as it was afterwards, with captured pieces restored under the same handle.
    pub fn would_leave_own_king_in_check(
        &mut self,
        id: PieceId,
        from: BoardSquare,
        to: BoardSquare,
    ) -> bool {
        let mover = self.piece(id).piece;
        let mut undo = Vec::with_capacity(3);

        let en_passant = mover.kind == PieceKind::Pawn
            && from.file != to.file
            && self.piece_at(to).is_none();
        let victim = if en_passant {
            pieces::en_passant_victim(self, from, to, mover.color)
        } else {
            self.piece_at(to).filter(|&victim| victim != id)
        };
        if let Some(victim) = victim {
            if let Some(square) = self.piece(victim).square {
                self.remove(victim);
                undo.push(Undo::Removed { id: victim, square });
            }
        }

        if mover.kind == PieceKind::King && (to.file - from.file).abs() == 2 {
            let direction = (to.file - from.file).signum();
            if let Some(rook) = pieces::castling_rook(self, from, direction, mover.color) {
                if let Some(rook_from) = self.piece(rook).square {
                    self.relocate(rook, BoardSquare::new(from.file + direction, from.row));
                    undo.push(Undo::Moved {
                        id: rook,
                        from: rook_from,
                    });
                }
            }
        }

        self.relocate(id, to);
        undo.push(Undo::Moved { id, from });

        let exposed = self.is_in_check(mover.color);

        for change in undo.into_iter().rev() {
            match change {
                Undo::Moved { id, from } => self.relocate(id, from),
                Undo::Removed { id, square } => self.restore(id, square),
            }
        }
        exposed
    }

    /// The squares the piece can move to without leaving its own king in check
    pub fn legal_targets(&mut self, id: PieceId) -> Vec<BoardSquare> {
        let Some(from) = self.piece(id).square else {
            return Vec::new();
        };
        pieces::targets(self, id)
            .into_iter()
            .filter(|&to| !self.would_leave_own_king_in_check(id, from, to))
            .collect()
    }

    /// Whether none of the side's pieces has a legal move
    pub fn has_no_legal_moves(&mut self, color: Color) -> bool {
        let ids: Vec<PieceId> = self.pieces_of(color).map(|(id, _)| id).collect();
        ids.into_iter().all(|id| self.legal_targets(id).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use board::config::STANDARD_FEN;

    fn piece_on(board: &Board, square: &str) -> PieceId {
        board.piece_at(board.square(square).unwrap()).unwrap()
    }

    #[test]
    fn test_pinned_piece_cannot_leave_the_line() {
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        let bishop = piece_on(&board, "e2");
        assert!(board.legal_targets(bishop).is_empty());
        assert!(!board.has_no_legal_moves(Color::White));
    }

    #[test]
    fn test_simulation_restores_captures() {
        let fen = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        let pawn = piece_on(&board, "e4");
        let victim = piece_on(&board, "d5");
        let (from, to) = (board.square("e4").unwrap(), board.square("d5").unwrap());
        assert!(!board.would_leave_own_king_in_check(pawn, from, to));
        assert_eq!(board.piece_at(to), Some(victim));
        assert_eq!(board, Board::from_fen(fen).unwrap());
    }

    #[test]
    fn test_en_passant_discovering_check_is_illegal() {
        // Taking en passant would empty the fifth rank between the rook and the king
        let fen = "8/8/8/K2pP2r/8/8/8/7k w - d6 0 2";
        let mut board = Board::from_fen(fen).unwrap();
        let pawn = piece_on(&board, "e5");
        let targets: Vec<String> = board
            .legal_targets(pawn)
            .into_iter()
            .map(|sq| board.notation(sq))
            .collect();
        assert_eq!(targets, ["e6"]);
        assert_eq!(board, Board::from_fen(fen).unwrap());
    }

    #[test]
    fn test_legal_targets_leave_board_untouched() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let king = piece_on(&board, "e1");
        let targets = board.legal_targets(king);
        assert!(targets.contains(&board.square("g1").unwrap()));
        assert!(targets.contains(&board.square("c1").unwrap()));
        assert_eq!(
            board,
            Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap()
        );
    }

    #[test]
    fn test_opening_has_moves() {
        let mut board = Board::from_fen(STANDARD_FEN).unwrap();
        assert!(!board.has_no_legal_moves(Color::White));
        assert!(!board.has_no_legal_moves(Color::Black));
        assert!(!board.is_in_check(Color::White));
    }
}
