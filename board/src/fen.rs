//! Text-level handling of FEN: splitting the six fields apart and working with the placement
//! field as a grid
//!
//! Nothing in here knows about the rules of the game, so both the start-position builder and the
//! engine's codec are built on top of it.

use core::fmt;

use crate::{Error, Piece, Result};

/// The six fields of a FEN string, unparsed beyond being split apart
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FenFields {
    pub placement: String,
    pub active: String,
    pub castling: String,
    pub en_passant: String,
    pub halfmove: String,
    pub fullmove: String,
}
impl FenFields {
    /// Split on whitespace, requiring exactly six fields
    ///
    /// ```
    /// # use board::FenFields;
    /// let fields = FenFields::split("8/8/8/8 w - - 0 1").unwrap();
    /// assert_eq!(fields.placement, "8/8/8/8");
    /// assert!(FenFields::split("8/8/8/8 w - - 0").is_err());
    /// ```
    pub fn split(text: &str) -> Result<Self> {
        let terms: Vec<&str> = text.split_whitespace().collect();
        let [placement, active, castling, en_passant, halfmove, fullmove] = terms[..] else {
            return Err(Error::MalformedPosition(format!(
                "expected 6 fields, found {}",
                terms.len()
            )));
        };
        Ok(Self {
            placement: placement.to_string(),
            active: active.to_string(),
            castling: castling.to_string(),
            en_passant: en_passant.to_string(),
            halfmove: halfmove.to_string(),
            fullmove: fullmove.to_string(),
        })
    }
}
/// Joins the fields back together, separated by single spaces
impl fmt::Display for FenFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.placement,
            self.active,
            self.castling,
            self.en_passant,
            self.halfmove,
            self.fullmove
        )
    }
}

/// The placement field, expanded into rows of squares
///
/// Rows are stored top to bottom, as they appear in FEN. Every row has the same width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    rows: Vec<Vec<Option<Piece>>>,
}
impl Placement {
    /// An empty grid of the given size
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            rows: vec![vec![None; width]; height],
        }
    }

    /// Expand a placement field
    ///
    /// Runs of empty squares may take more than one digit, so boards wider than nine files can be
    /// written down.
    ///
    /// ```
    /// # use board::Placement;
    /// let placement = Placement::parse("r9/10/10/9K").unwrap();
    /// assert_eq!((placement.width(), placement.height()), (10, 4));
    /// assert!(Placement::parse("8/7").is_err());
    /// ```
    pub fn parse(field: &str) -> Result<Self> {
        let rows = field
            .split('/')
            .map(expand_rank)
            .collect::<Result<Vec<_>>>()?;
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(Error::MalformedPosition(format!(
                "placement `{field}` has no squares"
            )));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(Error::MalformedPosition(format!(
                "placement rows differ in width ({} and {})",
                width,
                row.len()
            )));
        }
        Ok(Self { rows })
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, file: usize, row: usize) -> Option<Piece> {
        self.rows.get(row).and_then(|r| r.get(file).copied().flatten())
    }

    /// Set a square, ignoring coordinates that are off the grid
    pub fn set(&mut self, file: usize, row: usize, piece: Option<Piece>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(file)) {
            *cell = piece;
        }
    }

    /// The squares of one row, left to right
    pub fn row(&self, row: usize) -> &[Option<Piece>] {
        &self.rows[row]
    }

    /// Iterate over every occupied square as `(file, row, piece)`
    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Piece)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row_idx, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(file_idx, cell)| cell.map(|piece| (file_idx, row_idx, piece)))
        })
    }

    pub fn file_is_empty(&self, file: usize) -> bool {
        self.rows.iter().all(|row| row[file].is_none())
    }

    pub fn row_is_empty(&self, row: usize) -> bool {
        self.rows[row].iter().all(Option::is_none)
    }

    /// Insert an empty file so that it ends up at index `file`
    pub fn insert_file(&mut self, file: usize) {
        for row in &mut self.rows {
            row.insert(file, None);
        }
    }

    pub fn remove_file(&mut self, file: usize) {
        for row in &mut self.rows {
            row.remove(file);
        }
    }

    /// Insert an empty row so that it ends up at index `row`
    pub fn insert_row(&mut self, row: usize) {
        let width = self.width();
        self.rows.insert(row, vec![None; width]);
    }

    pub fn remove_row(&mut self, row: usize) {
        self.rows.remove(row);
    }
}
/// Compresses back into a placement field
impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.rows.iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            f.write_str(&compress_rank(row))?;
        }
        Ok(())
    }
}

/// Expand one rank of the placement field into its squares
pub fn expand_rank(rank: &str) -> Result<Vec<Option<Piece>>> {
    let mut squares = Vec::new();
    let mut run: usize = 0;
    for c in rank.chars() {
        if let Some(digit) = c.to_digit(10) {
            run = run * 10 + digit as usize;
            if run == 0 || run > crate::MAX_WIDTH {
                return Err(Error::MalformedPosition(format!(
                    "bad empty-square count in rank `{rank}`"
                )));
            }
            continue;
        }
        squares.extend(core::iter::repeat(None).take(run));
        run = 0;
        let piece = Piece::from_fen_letter(c).ok_or_else(|| {
            Error::MalformedPosition(format!("unknown piece letter `{c}` in rank `{rank}`"))
        })?;
        squares.push(Some(piece));
    }
    squares.extend(core::iter::repeat(None).take(run));
    Ok(squares)
}

/// Compress a rank's squares into FEN, counting runs of empty squares
pub fn compress_rank(squares: &[Option<Piece>]) -> String {
    let mut rank = String::with_capacity(squares.len());
    let mut run = 0;
    for square in squares {
        match square {
            Some(piece) => {
                if run > 0 {
                    rank.push_str(&run.to_string());
                    run = 0;
                }
                rank.push(piece.fen_letter());
            }
            None => run += 1,
        }
    }
    if run > 0 {
        rank.push_str(&run.to_string());
    }
    rank
}
