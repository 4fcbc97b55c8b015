use board::{
    fen::compress_rank, BoardSquare, Color, FenFields, GameConfig, PieceKind, Placement,
    MAX_HEIGHT, MAX_WIDTH,
};

use crate::{rules::build_rules, Board, CastleRights, Error, Result};

fn malformed(message: impl Into<String>) -> Error {
    Error::Board(board::Error::MalformedPosition(message.into()))
}

impl Board {
    /// Parse a board from the given FEN
    ///
    /// The board is played by the standard rules until [`Board::set_rules`] says otherwise.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let fields = FenFields::split(fen)?;
        let placement = Placement::parse(&fields.placement)?;
        let (width, height) = (placement.width(), placement.height());
        if width > MAX_WIDTH || height > MAX_HEIGHT {
            return Err(malformed(format!("{width}x{height} board is too large")));
        }

        let mut board = Self::empty(width, height);
        for (file, row, piece) in placement.pieces() {
            if piece.kind == PieceKind::King && board.king(piece.color).is_some() {
                return Err(malformed(format!("more than one {} king", piece.color)));
            }
            board.place(piece, BoardSquare::new(file as i16, row as i16));
        }

        board.active = match fields.active.as_str() {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(malformed(format!("unknown side to move `{other}`"))),
        };

        if fields.castling != "-" {
            for letter in fields.castling.chars() {
                let (color, right) = match letter {
                    'K' => (Color::White, CastleRights::Kingside),
                    'Q' => (Color::White, CastleRights::Queenside),
                    'k' => (Color::Black, CastleRights::Kingside),
                    'q' => (Color::Black, CastleRights::Queenside),
                    other => return Err(malformed(format!("unknown castling letter `{other}`"))),
                };
                // Rights for a missing king have nobody to belong to
                if let Some(king) = board.king(color) {
                    board.pieces[king.0].castle |= right;
                }
            }
        }

        board.en_passant = match fields.en_passant.as_str() {
            "-" => BoardSquare::INVALID,
            square => BoardSquare::from_notation(square, width, height)
                .map_err(|_| malformed(format!("bad en passant square `{square}`")))?,
        };
        board.halfmove = fields
            .halfmove
            .parse()
            .map_err(|_| malformed(format!("bad half-move clock `{}`", fields.halfmove)))?;
        board.fullmove = match fields.fullmove.parse() {
            Ok(fullmove) if fullmove >= 1 => fullmove,
            _ => {
                return Err(malformed(format!(
                    "bad full-move counter `{}`",
                    fields.fullmove
                )))
            }
        };

        board.set_rules(build_rules(&GameConfig::default()));
        Ok(board)
    }

    /// Convert to a FEN string
    pub fn to_fen(&self) -> String {
        let placement = (0..self.height())
            .map(|row| {
                let squares: Vec<_> = (0..self.width())
                    .map(|file| {
                        self.piece_at(BoardSquare::new(file as i16, row as i16))
                            .map(|id| self.piece(id).piece)
                    })
                    .collect();
                compress_rank(&squares)
            })
            .collect::<Vec<String>>()
            .join("/");
        let castling = {
            let mut options = String::with_capacity(4);
            for (color, kingside, queenside) in [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')]
            {
                let rights = self
                    .king(color)
                    .map_or(CastleRights::empty(), |king| self.piece(king).castle);
                if rights.contains(CastleRights::Kingside) {
                    options.push(kingside);
                }
                if rights.contains(CastleRights::Queenside) {
                    options.push(queenside);
                }
            }
            if options.is_empty() {
                options.push('-');
            }
            options
        };
        let fields = FenFields {
            placement,
            active: self.active.fen_letter().to_string(),
            castling,
            en_passant: self.notation(self.en_passant),
            halfmove: self.halfmove.to_string(),
            fullmove: self.fullmove.to_string(),
        };
        fields.to_string()
    }
}
