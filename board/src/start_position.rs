//! Building the position a game starts from
//!
//! A base FEN is resized to the configured dimensions, keeping its material centered, and the back
//! ranks are optionally shuffled in the style of Chess960.

use log::{info, warn};
use rand::{seq::SliceRandom, Rng};

use crate::{
    Color, Error, FenFields, GameConfig, Piece, PieceKind, Placement, Result, MAX_HEIGHT,
    MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH,
};

/// Build the starting FEN for a game from the base FEN and the config
///
/// A requested width or height of 0 keeps the base position's size. Any other request smaller than
/// the smallest allowed board is an [`Error::InvalidDimensions`]. Shrinking only ever removes empty
/// files and ranks: when that isn't possible the dimension is left as it was.
pub fn build<R: Rng + ?Sized>(base: &str, config: &GameConfig, rng: &mut R) -> Result<String> {
    let mut fields = FenFields::split(base)?;
    let mut placement = Placement::parse(&fields.placement)?;
    let (base_width, base_height) = (placement.width(), placement.height());
    let width = if config.board_width == 0 {
        base_width
    } else {
        config.board_width
    };
    let height = if config.board_height == 0 {
        base_height
    } else {
        config.board_height
    };
    if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) || !(MIN_HEIGHT..=MAX_HEIGHT).contains(&height) {
        return Err(Error::InvalidDimensions { width, height });
    }

    resize_width(&mut placement, width, config.fill_expanded_files);
    resize_height(&mut placement, height);
    if (placement.width(), placement.height()) != (base_width, base_height) {
        // The old square name no longer refers to the same square
        fields.en_passant = "-".to_string();
    }
    if config.randomize_back_rank {
        randomize_back_ranks(&mut placement, rng);
    }

    fields.placement = placement.to_string();
    let fen = fields.to_string();
    info!("built start position {fen}");
    Ok(fen)
}

/// The rows holding each side's pawns and back rank, as found in a position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SideRows {
    back: Option<usize>,
    pawns: Option<usize>,
}

/// Find a side's rows by scanning from its own edge of the board
fn side_rows(placement: &Placement, color: Color) -> SideRows {
    let height = placement.height();
    let scan_order: Vec<usize> = match color {
        Color::White => (0..height).rev().collect(),
        Color::Black => (0..height).collect(),
    };
    let find = |pawn: bool| {
        scan_order.iter().copied().find(|&row| {
            placement.row(row).iter().flatten().any(|piece| {
                piece.color == color && (piece.kind == PieceKind::Pawn) == pawn
            })
        })
    };
    let back = find(false);
    let pawns = find(true).or_else(|| {
        let row = back? as i64 + color.forward() as i64;
        (0..height as i64).contains(&row).then_some(row as usize)
    });
    SideRows { back, pawns }
}

/// The piece put on the back ranks of the `nth` file added
///
/// Knights and bishops outnumber rooks, which outnumber queens, however many files are added.
fn fill_kind(nth: usize) -> PieceKind {
    match nth {
        0 => PieceKind::Knight,
        1 => PieceKind::Bishop,
        2 => PieceKind::Rook,
        3 => PieceKind::Queen,
        n if n % 2 == 0 => PieceKind::Knight,
        _ => PieceKind::Bishop,
    }
}

/// Grow or shrink to the given width, alternating between the right and left edges
fn resize_width(placement: &mut Placement, width: usize, fill: bool) {
    let current = placement.width();
    if width > current {
        let white = side_rows(placement, Color::White);
        let black = side_rows(placement, Color::Black);
        for nth in 0..width - current {
            let file = if nth % 2 == 0 {
                placement.width()
            } else {
                0
            };
            placement.insert_file(file);
            if !fill {
                continue;
            }
            for (rows, color) in [(white, Color::White), (black, Color::Black)] {
                if let Some(row) = rows.pawns {
                    placement.set(file, row, Some(Piece::new(PieceKind::Pawn, color)));
                }
                if let Some(row) = rows.back {
                    placement.set(file, row, Some(Piece::new(fill_kind(nth), color)));
                }
            }
        }
    } else if width < current {
        let remove = current - width;
        let from_right = (remove + 1) / 2;
        let from_left = remove / 2;
        let removable = (current - from_right..current)
            .chain(0..from_left)
            .all(|file| placement.file_is_empty(file));
        if !removable {
            warn!("cannot shrink from {current} to {width} files without removing pieces");
            return;
        }
        for _ in 0..from_right {
            placement.remove_file(placement.width() - 1);
        }
        for _ in 0..from_left {
            placement.remove_file(0);
        }
    }
}

/// Grow by adding empty ranks in the middle, or shrink by removing the empty ranks nearest it
fn resize_height(placement: &mut Placement, height: usize) {
    let current = placement.height();
    if height > current {
        let middle = current / 2;
        for _ in current..height {
            placement.insert_row(middle);
        }
    } else if height < current {
        let mut empty: Vec<usize> = (0..current)
            .filter(|&row| placement.row_is_empty(row))
            .collect();
        if empty.len() < current - height {
            warn!("cannot shrink from {current} to {height} ranks without removing pieces");
            return;
        }
        // Distance to the middle, doubled so it stays an integer
        empty.sort_by_key(|&row| ((2 * row + 1) as i64 - current as i64).abs());
        let mut chosen = empty[..current - height].to_vec();
        chosen.sort_unstable_by(|a, b| b.cmp(a));
        for row in chosen {
            placement.remove_row(row);
        }
    }
}

/// Generate a shuffled back rank for a board of the given width
///
/// The bishops stand on files of opposite parity, the king stands somewhere between the two rooks,
/// one queen takes a leftover file if there is one, and knights fill the rest.
pub fn random_back_rank<R: Rng + ?Sized>(width: usize, rng: &mut R) -> Vec<PieceKind> {
    debug_assert!(width >= MIN_WIDTH);
    let mut rank = vec![None; width];

    let even: Vec<usize> = (0..width).step_by(2).collect();
    let odd: Vec<usize> = (1..width).step_by(2).collect();
    for files in [&even, &odd] {
        if let Some(&file) = files.choose(rng) {
            rank[file] = Some(PieceKind::Bishop);
        }
    }

    let mut remaining: Vec<usize> = (0..width).filter(|&file| rank[file].is_none()).collect();
    remaining.shuffle(rng);
    let mut triple = remaining.split_off(remaining.len().saturating_sub(3));
    triple.sort_unstable();
    for (file, kind) in triple
        .into_iter()
        .zip([PieceKind::Rook, PieceKind::King, PieceKind::Rook])
    {
        rank[file] = Some(kind);
    }

    let mut rest = remaining.into_iter();
    if let Some(file) = rest.next() {
        rank[file] = Some(PieceKind::Queen);
    }
    for file in rest {
        rank[file] = Some(PieceKind::Knight);
    }
    rank.into_iter()
        .map(|kind| kind.unwrap_or(PieceKind::Knight))
        .collect()
}

/// Overwrite both back ranks with one shuffled layout
///
/// Black's rank is the same layout as white's, file for file.
fn randomize_back_ranks<R: Rng + ?Sized>(placement: &mut Placement, rng: &mut R) {
    let height = placement.height();
    let white_row = side_rows(placement, Color::White).back.unwrap_or(height - 1);
    let black_row = side_rows(placement, Color::Black).back.unwrap_or(0);
    let layout = random_back_rank(placement.width(), rng);
    for (file, kind) in layout.into_iter().enumerate() {
        placement.set(file, white_row, Some(Piece::new(kind, Color::White)));
        placement.set(file, black_row, Some(Piece::new(kind, Color::Black)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BUREAUCRAT_FEN, STANDARD_FEN};

    use quickcheck::quickcheck;
    use rand::{rngs::SmallRng, SeedableRng};

    fn build_with(base: &str, config: GameConfig) -> Result<String> {
        build(base, &config, &mut SmallRng::seed_from_u64(7))
    }

    fn sized(width: usize, height: usize) -> GameConfig {
        GameConfig {
            board_width: width,
            board_height: height,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_zero_means_no_change() {
        assert_eq!(build_with(STANDARD_FEN, sized(0, 0)).unwrap(), STANDARD_FEN);
        assert_eq!(build_with(STANDARD_FEN, sized(8, 8)).unwrap(), STANDARD_FEN);
    }

    #[test]
    fn test_too_small_is_rejected() {
        assert_eq!(
            build_with(STANDARD_FEN, sized(4, 0)),
            Err(Error::InvalidDimensions {
                width: 4,
                height: 8
            })
        );
        assert_eq!(
            build_with(STANDARD_FEN, sized(0, 3)),
            Err(Error::InvalidDimensions {
                width: 8,
                height: 3
            })
        );
        assert!(build_with(STANDARD_FEN, sized(27, 8)).is_err());
    }

    #[test]
    fn test_malformed_base_is_rejected() {
        assert!(matches!(
            build_with("8/8/8/8 w - -", sized(0, 0)),
            Err(Error::MalformedPosition(_))
        ));
    }

    #[test]
    fn test_widen_with_fill_keeps_material_centered() {
        let config = GameConfig {
            board_width: 10,
            fill_expanded_files: true,
            ..GameConfig::default()
        };
        let fen = build_with(STANDARD_FEN, config).unwrap();
        let placement = Placement::parse(&FenFields::split(&fen).unwrap().placement).unwrap();
        let original = Placement::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(placement.width(), 10);
        for row in 0..8 {
            for file in 0..8 {
                assert_eq!(placement.get(file + 1, row), original.get(file, row));
            }
        }
        for (row, color) in [(1, Color::Black), (6, Color::White)] {
            for file in [0, 9] {
                assert_eq!(
                    placement.get(file, row),
                    Some(Piece::new(PieceKind::Pawn, color))
                );
            }
        }
        // The first added file goes on the right and gets a knight, the second a bishop
        assert_eq!(
            fen,
            "brnbqkbnrn/pppppppppp/10/10/10/10/PPPPPPPPPP/BRNBQKBNRN w KQkq - 0 1"
        );
    }

    #[test]
    fn test_widen_without_fill_adds_empty_files() {
        let fen = build_with(STANDARD_FEN, sized(11, 0)).unwrap();
        assert_eq!(
            fen,
            "1rnbqkbnr2/1pppppppp2/11/11/11/11/1PPPPPPPP2/1RNBQKBNR2 w KQkq - 0 1"
        );
    }

    #[test]
    fn test_fill_composition_keeps_minor_pieces_ahead() {
        let kinds: Vec<PieceKind> = (0..10).map(fill_kind).collect();
        let count = |kind: PieceKind| kinds.iter().filter(|&&k| k == kind).count();
        let minors = count(PieceKind::Knight) + count(PieceKind::Bishop);
        assert!(minors > count(PieceKind::Rook));
        assert!(count(PieceKind::Rook) >= count(PieceKind::Queen));
        assert_eq!(
            kinds[..4],
            [
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Rook,
                PieceKind::Queen
            ]
        );
    }

    #[test]
    fn test_shrink_only_removes_empty_files() {
        let base = "1k5/7/7/5K1 w - - 0 1";
        // Removing one file from each side is fine
        assert_eq!(
            build_with(base, sized(5, 0)).unwrap(),
            "k4/5/5/4K w - - 0 1"
        );
        // The standard position has pieces on every file
        assert_eq!(build_with(STANDARD_FEN, sized(6, 0)).unwrap(), STANDARD_FEN);
    }

    #[test]
    fn test_taller_inserts_ranks_in_the_middle() {
        let fen = build_with(STANDARD_FEN, sized(0, 10)).unwrap();
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_shorter_removes_empty_ranks_nearest_middle() {
        let fen = build_with(STANDARD_FEN, sized(0, 6)).unwrap();
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let fen = build_with(STANDARD_FEN, sized(0, 4)).unwrap();
        assert_eq!(fen, "rnbqkbnr/pppppppp/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let crowded = "k4/p4/n4/P4/4K w - - 0 1";
        assert_eq!(build_with(crowded, sized(0, 4)).unwrap(), crowded);
    }

    #[test]
    fn test_resizing_clears_en_passant() {
        let base = "rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 2";
        assert_eq!(build_with(base, sized(0, 0)).unwrap(), base);
        let fen = build_with(base, sized(9, 0)).unwrap();
        assert_eq!(FenFields::split(&fen).unwrap().en_passant, "-");
    }

    #[test]
    fn test_randomized_keeps_bureaucrats_and_pawns() {
        let config = GameConfig {
            randomize_back_rank: true,
            ..GameConfig::default()
        };
        let fen = build_with(BUREAUCRAT_FEN, config).unwrap();
        let placement = Placement::parse(&FenFields::split(&fen).unwrap().placement).unwrap();
        assert_eq!(
            placement.get(3, 2),
            Some(Piece::new(PieceKind::Bureaucrat, Color::Black))
        );
        assert_eq!(placement.row(1), &[Some(Piece::new(PieceKind::Pawn, Color::Black)); 8]);
        for file in 0..8 {
            let white = placement.get(file, 7).unwrap();
            let black = placement.get(file, 0).unwrap();
            assert_eq!(white.color, Color::White);
            assert_eq!(black, Piece::new(white.kind, Color::Black));
        }
    }

    fn assert_valid_back_rank(rank: &[PieceKind]) {
        let files = |kind: PieceKind| {
            rank.iter()
                .enumerate()
                .filter(move |&(_, &k)| k == kind)
                .map(|(file, _)| file)
                .collect::<Vec<_>>()
        };
        let bishops = files(PieceKind::Bishop);
        assert_eq!(bishops.len(), 2);
        assert_ne!(bishops[0] % 2, bishops[1] % 2);
        let rooks = files(PieceKind::Rook);
        let king = files(PieceKind::King);
        assert_eq!((rooks.len(), king.len()), (2, 1));
        assert!(rooks[0] < king[0] && king[0] < rooks[1]);
        let queens = files(PieceKind::Queen).len();
        assert_eq!(queens, usize::from(rank.len() > 5));
        assert_eq!(files(PieceKind::Knight).len(), rank.len() - 5 - queens);
    }

    #[test]
    fn test_random_back_rank_is_seeded() {
        let first = random_back_rank(8, &mut SmallRng::seed_from_u64(42));
        let second = random_back_rank(8, &mut SmallRng::seed_from_u64(42));
        assert_eq!(first, second);
        assert_valid_back_rank(&first);
    }

    quickcheck! {
        fn test_random_back_rank_constraints(seed: u64, width: u8) -> bool {
            let width = MIN_WIDTH + usize::from(width) % (MAX_WIDTH - MIN_WIDTH + 1);
            let rank = random_back_rank(width, &mut SmallRng::seed_from_u64(seed));
            assert_valid_back_rank(&rank);
            rank.len() == width
        }
    }
}
