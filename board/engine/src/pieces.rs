//! Where each kind of piece can move and what it attacks
//!
//! [`targets`] are pseudo-legal: they ignore whether the move would leave the mover's own king in
//! check, which [`Board::legal_targets`] filters out. [`attacks`] are the squares a piece threatens
//! and are only used for attack detection.

use board::{BoardSquare, BoardSquareOffset, Color, PieceKind};

use crate::{Board, CastleRights, PieceId};

/// The squares the piece can move to, ignoring the safety of its own king
///
/// Returns nothing for a piece that has been captured.
pub fn targets(board: &Board, id: PieceId) -> Vec<BoardSquare> {
    let piece = board.piece(id);
    let Some(from) = piece.square else {
        return Vec::new();
    };
    let color = piece.color();
    match piece.kind() {
        PieceKind::Pawn => pawn_targets(board, from, color),
        PieceKind::Knight => steps(board, from, color, &BoardSquareOffset::KNIGHT_MOVES),
        PieceKind::Bishop => slides(board, from, color, &BoardSquareOffset::BISHOP_DIRECTIONS),
        PieceKind::Rook => slides(board, from, color, &BoardSquareOffset::ROOK_DIRECTIONS),
        PieceKind::Queen => slides(board, from, color, &BoardSquareOffset::KING_MOVES),
        PieceKind::King => king_targets(board, id, from, color),
        PieceKind::Bureaucrat => empty_squares(board).collect(),
    }
}

/// The squares the piece threatens
///
/// Unlike [`targets`] this doesn't care what is on the square, and a slide includes the first piece
/// it runs into whatever its color.
pub fn attacks(board: &Board, id: PieceId) -> Vec<BoardSquare> {
    let piece = board.piece(id);
    let Some(from) = piece.square else {
        return Vec::new();
    };
    match piece.kind() {
        PieceKind::Pawn => {
            let forward = piece.color().forward() as i8;
            [-1, 1]
                .into_iter()
                .map(|file| from.offset(BoardSquareOffset::new(file, forward)))
                .filter(|&square| board.in_bounds(square))
                .collect()
        }
        PieceKind::Knight => ring(board, from, &BoardSquareOffset::KNIGHT_MOVES),
        PieceKind::King => ring(board, from, &BoardSquareOffset::KING_MOVES),
        PieceKind::Bishop => rays(board, from, &BoardSquareOffset::BISHOP_DIRECTIONS),
        PieceKind::Rook => rays(board, from, &BoardSquareOffset::ROOK_DIRECTIONS),
        PieceKind::Queen => rays(board, from, &BoardSquareOffset::KING_MOVES),
        PieceKind::Bureaucrat => Vec::new(),
    }
}

fn is_color(board: &Board, square: BoardSquare, color: Color) -> bool {
    board
        .piece_at(square)
        .is_some_and(|id| board.piece(id).color() == color)
}

fn empty_squares(board: &Board) -> impl Iterator<Item = BoardSquare> + '_ {
    (0..board.height() as i16)
        .flat_map(move |row| (0..board.width() as i16).map(move |file| BoardSquare::new(file, row)))
        .filter(|&square| board.piece_at(square).is_none())
}

/// Every offset square on the board
fn ring(board: &Board, from: BoardSquare, offsets: &[BoardSquareOffset]) -> Vec<BoardSquare> {
    offsets
        .iter()
        .map(|&offset| from.offset(offset))
        .filter(|&square| board.in_bounds(square))
        .collect()
}

/// Every offset square on the board that doesn't hold a piece of the mover's side
fn steps(
    board: &Board,
    from: BoardSquare,
    color: Color,
    offsets: &[BoardSquareOffset],
) -> Vec<BoardSquare> {
    ring(board, from, offsets)
        .into_iter()
        .filter(|&square| !is_color(board, square, color))
        .collect()
}

/// Walk each direction, stopping before a friendly piece or on an enemy one
fn slides(
    board: &Board,
    from: BoardSquare,
    color: Color,
    directions: &[BoardSquareOffset],
) -> Vec<BoardSquare> {
    let mut squares = Vec::new();
    for &direction in directions {
        let mut square = from.offset(direction);
        while board.in_bounds(square) {
            match board.piece_at(square) {
                None => squares.push(square),
                Some(blocker) => {
                    if board.piece(blocker).color() != color {
                        squares.push(square);
                    }
                    break;
                }
            }
            square = square.offset(direction);
        }
    }
    squares
}

/// Walk each direction, stopping on the first piece of either side
fn rays(board: &Board, from: BoardSquare, directions: &[BoardSquareOffset]) -> Vec<BoardSquare> {
    let mut squares = Vec::new();
    for &direction in directions {
        let mut square = from.offset(direction);
        while board.in_bounds(square) {
            squares.push(square);
            if board.piece_at(square).is_some() {
                break;
            }
            square = square.offset(direction);
        }
    }
    squares
}

fn pawn_targets(board: &Board, from: BoardSquare, color: Color) -> Vec<BoardSquare> {
    let mut squares = Vec::new();
    let forward = color.forward();

    let one = BoardSquare::new(from.file, from.row + forward);
    if board.in_bounds(one) && board.piece_at(one).is_none() {
        squares.push(one);
        let two = BoardSquare::new(from.file, from.row + 2 * forward);
        if from.row == board.pawn_row(color) && board.in_bounds(two) && board.piece_at(two).is_none()
        {
            squares.push(two);
        }
    }

    for file in [from.file - 1, from.file + 1] {
        let diagonal = BoardSquare::new(file, from.row + forward);
        if !board.in_bounds(diagonal) {
            continue;
        }
        if is_color(board, diagonal, color.other()) {
            squares.push(diagonal);
        } else if diagonal == board.en_passant()
            && board.piece_at(diagonal).is_none()
            && en_passant_victim(board, from, diagonal, color).is_some()
        {
            squares.push(diagonal);
        }
    }
    squares
}

/// The enemy pawn an en passant capture onto `to` would take: the one beside the capturing pawn
pub(crate) fn en_passant_victim(
    board: &Board,
    from: BoardSquare,
    to: BoardSquare,
    color: Color,
) -> Option<PieceId> {
    board
        .piece_at(BoardSquare::new(to.file, from.row))
        .filter(|&id| {
            let victim = board.piece(id);
            victim.kind() == PieceKind::Pawn && victim.color() != color
        })
}

/// The rook a king castling towards `direction` (+1 or -1 files) would castle with
///
/// This is the first piece along the king's row in that direction, if it is a rook of the king's
/// own side.
pub(crate) fn castling_rook(
    board: &Board,
    from: BoardSquare,
    direction: i16,
    color: Color,
) -> Option<PieceId> {
    let step = BoardSquareOffset::new(direction as i8, 0);
    let mut square = from.offset(step);
    while board.in_bounds(square) {
        if let Some(id) = board.piece_at(square) {
            let piece = board.piece(id);
            return (piece.kind() == PieceKind::Rook && piece.color() == color).then_some(id);
        }
        square = square.offset(step);
    }
    None
}

fn king_targets(board: &Board, id: PieceId, from: BoardSquare, color: Color) -> Vec<BoardSquare> {
    let enemy = color.other();
    let mut squares: Vec<BoardSquare> = steps(board, from, color, &BoardSquareOffset::KING_MOVES)
        .into_iter()
        .filter(|&square| !board.is_square_attacked(enemy, square))
        .collect();

    let rights = board.piece(id).castle;
    for (right, direction) in [(CastleRights::Kingside, 1), (CastleRights::Queenside, -1)] {
        if !rights.contains(right) {
            continue;
        }
        let crossed = BoardSquare::new(from.file + direction, from.row);
        let landing = BoardSquare::new(from.file + 2 * direction, from.row);
        let path_clear = [crossed, landing]
            .into_iter()
            .all(|square| board.in_bounds(square) && board.piece_at(square).is_none());
        if path_clear
            && castling_rook(board, from, direction, color).is_some()
            && [from, crossed, landing]
                .into_iter()
                .all(|square| !board.is_square_attacked(enemy, square))
        {
            squares.push(landing);
        }
    }
    squares
}
