use board::{
    config::{BUREAUCRAT_FEN, STANDARD_FEN},
    CheckStatus, Color, GameConfig, GameOutcome, PieceKind, Preset,
};
use engine::{build_rules, Board, CastleRights, Error, MoveResult, PieceId};

fn piece_on(board: &Board, square: &str) -> PieceId {
    board
        .piece_at(board.square(square).unwrap())
        .unwrap_or_else(|| panic!("no piece on {square}"))
}

fn target_names(board: &mut Board, square: &str) -> Vec<String> {
    let id = piece_on(board, square);
    let mut names: Vec<String> = board
        .legal_targets(id)
        .into_iter()
        .map(|sq| board.notation(sq))
        .collect();
    names.sort();
    names
}

#[track_caller]
fn play(board: &mut Board, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        if let Err(err) = board.apply_notation(from, to) {
            panic!("{from}-{to} failed: {err}\n{board}");
        }
    }
}

fn with_config(fen: &str, config: &GameConfig) -> Board {
    let mut board = Board::from_fen(fen).unwrap();
    board.set_rules(build_rules(config));
    board
}

#[test]
fn test_en_passant_removes_the_passed_pawn() {
    let mut board = Board::from_fen(STANDARD_FEN).unwrap();
    play(&mut board, &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")]);
    assert_eq!(board.notation(board.en_passant()), "d6");
    assert!(target_names(&mut board, "e5").contains(&"d6".to_string()));

    let passed = piece_on(&board, "d5");
    let result = board.apply_notation("e5", "d6").unwrap();
    assert_eq!(result.captured, Some(passed));
    assert_eq!(board.piece(passed).square, None);
    assert_eq!(board.piece_at(board.square("d5").unwrap()), None);
    assert_eq!(
        board.piece(piece_on(&board, "d6")).kind(),
        PieceKind::Pawn
    );
    assert_eq!(
        board.to_fen(),
        "rnbqkbnr/1pp1pppp/p2P4/8/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3"
    );
}

#[test]
fn test_en_passant_only_right_after_the_double_push() {
    let mut board = Board::from_fen(STANDARD_FEN).unwrap();
    play(
        &mut board,
        &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5"), ("h2", "h3"), ("h7", "h6")],
    );
    assert!(!target_names(&mut board, "e5").contains(&"d6".to_string()));
    assert!(matches!(
        board.apply_notation("e5", "d6"),
        Err(Error::IllegalDestination { exposes_king: false, .. })
    ));
}

#[test]
fn test_castling_both_ways() {
    let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    let targets = target_names(&mut board, "e1");
    assert!(targets.contains(&"g1".to_string()));
    assert!(targets.contains(&"c1".to_string()));

    let king = piece_on(&board, "e1");
    let rook = piece_on(&board, "h1");
    board.apply_notation("e1", "g1").unwrap();
    assert_eq!(board.piece(rook).square, Some(board.square("f1").unwrap()));
    assert_eq!(board.piece(king).castle, CastleRights::empty());

    let king = piece_on(&board, "e8");
    let rook = piece_on(&board, "a8");
    board.apply_notation("e8", "c8").unwrap();
    assert_eq!(board.piece(rook).square, Some(board.square("d8").unwrap()));
    assert_eq!(board.piece(king).castle, CastleRights::empty());
    assert_eq!(
        board.to_fen(),
        "2kr3r/pppppppp/8/8/8/8/PPPPPPPP/R4RK1 w - - 2 2"
    );
}

#[test]
fn test_rook_moves_and_captures_end_castling_rights() {
    let mut board = Board::from_fen("r3kb1r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play(&mut board, &[("h1", "h8")]);
    // White's rook left its corner, and black's rook was taken on its corner
    assert!(board.to_fen().contains(" b Qq "));
    play(&mut board, &[("a8", "a1")]);
    assert!(board.to_fen().contains(" w - "));
}

#[test]
fn test_other_pieces_leaving_corners_keep_castling_rights() {
    let fen = "brnbqkbnrn/pppppppppp/10/10/10/10/PPPPPPPPPP/BRNBQKBNRN w KQkq - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    play(&mut board, &[("j1", "i3")]);
    assert!(board.to_fen().contains(" b KQkq "));
    play(&mut board, &[("j8", "i6")]);
    assert!(board.to_fen().contains(" w KQkq "));
    // The rooks next to the corners never moved, so the king may still castle
    let king = piece_on(&board, "f1");
    assert_eq!(board.piece(king).castle, CastleRights::all());
}

#[test]
fn test_back_rank_mate() {
    let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let err = board.apply_notation("a1", "a8").unwrap_err();
    let a1 = board.square("a1").unwrap();
    let a8 = board.square("a8").unwrap();
    assert_eq!(
        err,
        Error::Checkmate {
            winner: Color::White,
            applied: MoveResult {
                from: a1,
                to: a8,
                captured: None
            }
        }
    );
    assert!(err.is_terminal());
    // The mating move stands and the turn still passed
    assert_eq!(board.piece_at(a8).map(|id| board.piece(id).kind()), Some(PieceKind::Rook));
    assert_eq!(board.active(), Color::Black);
    assert!(board.is_in_check(Color::Black));
    assert!(board.has_no_legal_moves(Color::Black));
    assert_eq!(board.check_status(), CheckStatus::Checkmate);
    assert_eq!(board.outcome(), Some(GameOutcome::WhiteCheckmate));
    assert_eq!(board.apply_notation("g8", "h8"), Err(Error::GameFinished));
}

#[test]
fn test_stalemate_is_not_checkmate() {
    let mut board = Board::from_fen("7k/8/5Q2/8/8/8/8/6K1 w - - 0 1").unwrap();
    let err = board.apply_notation("f6", "f7").unwrap_err();
    assert!(matches!(err, Error::Stalemate { .. }));
    assert_eq!(board.outcome(), Some(GameOutcome::Stalemate));
    assert!(!board.is_in_check(Color::Black));
}

#[test]
fn test_rejections_leave_the_board_untouched() {
    let mut board = Board::from_fen(STANDARD_FEN).unwrap();
    assert_eq!(
        board.apply_notation("e7", "e5"),
        Err(Error::WrongTurn {
            expected: Color::White,
            found: Color::Black
        })
    );
    assert!(matches!(
        board.apply_notation("e2", "e5"),
        Err(Error::IllegalDestination { exposes_king: false, .. })
    ));
    assert!(matches!(
        board.apply_notation("e4", "e5"),
        Err(Error::NoPieceAtSource(_))
    ));
    assert_eq!(board.to_fen(), STANDARD_FEN);

    // Moving the pinned knight would expose the king
    let fen = "4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    assert!(matches!(
        board.apply_notation("e2", "c3"),
        Err(Error::IllegalDestination { exposes_king: true, .. })
    ));
    assert_eq!(board.to_fen(), fen);
}

#[test]
fn test_clocks() {
    let mut board = Board::from_fen(STANDARD_FEN).unwrap();
    play(&mut board, &[("g1", "f3"), ("g8", "f6")]);
    assert_eq!((board.halfmove(), board.fullmove()), (2, 2));
    play(&mut board, &[("e2", "e4")]);
    assert_eq!((board.halfmove(), board.fullmove()), (0, 2));
    play(&mut board, &[("f6", "e4")]);
    assert_eq!((board.halfmove(), board.fullmove()), (0, 3));
}

#[test]
fn test_captured_bureaucrat_changes_sides() {
    let config = Preset::Bureaucrat.config();
    let mut board = with_config(BUREAUCRAT_FEN, &config);
    let bureaucrat = piece_on(&board, "d6");
    // Bureaucrats go anywhere empty
    play(&mut board, &[("e3", "a3"), ("d6", "d3")]);
    let result = board.apply_notation("e2", "d3").unwrap();
    assert_eq!(result.captured, Some(bureaucrat));
    let defector = board.piece(bureaucrat);
    assert_eq!(defector.color(), Color::White);
    // The first empty square going down the a-file
    assert_eq!(defector.square, Some(board.square("a6").unwrap()));
    assert_eq!(board.halfmove(), 0);
    assert_eq!(
        board.to_fen(),
        "rnbqkbnr/pppppppp/C7/8/8/C2P4/PPPP1PPP/RNBQKBNR b KQkq - 0 2"
    );
}

#[test]
fn test_without_the_rule_bureaucrats_are_simply_captured() {
    let mut board = Board::from_fen(BUREAUCRAT_FEN).unwrap();
    let bureaucrat = piece_on(&board, "d6");
    play(&mut board, &[("e3", "a3"), ("d6", "d3"), ("e2", "d3")]);
    assert_eq!(board.piece(bureaucrat).square, None);
}

#[test]
fn test_double_move_turns() {
    let config = Preset::DoubleMove.config();
    let mut board = with_config(STANDARD_FEN, &config);
    play(&mut board, &[("e2", "e4")]);
    assert_eq!(board.active(), Color::White);
    play(&mut board, &[("d2", "d4")]);
    assert_eq!(board.active(), Color::Black);
    assert_eq!(board.fullmove(), 1);
    play(&mut board, &[("e7", "e5"), ("d7", "d5")]);
    assert_eq!(board.active(), Color::White);
    assert_eq!(board.fullmove(), 2);
}

#[test]
fn test_taking_the_king_on_a_second_move_ends_the_game() {
    let config = Preset::DoubleMove.config();
    let fen = "rnbqkbnr/ppppp1pp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1";
    let mut board = with_config(fen, &config);
    let king = piece_on(&board, "e8");
    play(&mut board, &[("d1", "h5")]);
    assert!(board.is_in_check(Color::Black));
    assert_eq!(board.active(), Color::White);

    let err = board.apply_notation("h5", "e8").unwrap_err();
    assert!(matches!(
        err,
        Error::Checkmate {
            winner: Color::White,
            applied: MoveResult {
                captured: Some(taken),
                ..
            }
        } if taken == king
    ));
    assert_eq!(board.king(Color::Black), None);
    assert_eq!(board.outcome(), Some(GameOutcome::WhiteCheckmate));
    assert_eq!(board.apply_notation("a7", "a6"), Err(Error::GameFinished));
}

#[test]
fn test_uneven_move_budgets() {
    let config = GameConfig {
        white_moves_per_turn: 1,
        black_moves_per_turn: 3,
        ..GameConfig::default()
    };
    let mut board = with_config(STANDARD_FEN, &config);
    play(&mut board, &[("e2", "e4")]);
    assert_eq!(board.active(), Color::Black);
    play(&mut board, &[("a7", "a6"), ("b7", "b6")]);
    assert_eq!(board.active(), Color::Black);
    play(&mut board, &[("c7", "c6")]);
    assert_eq!(board.active(), Color::White);
    assert_eq!(board.fullmove(), 2);
}

#[test]
fn test_legal_moves_never_expose_the_movers_king() {
    let mut board = Board::from_fen(STANDARD_FEN).unwrap();
    let moves = [
        ("e2", "e4"),
        ("e7", "e5"),
        ("f1", "c4"),
        ("b8", "c6"),
        ("d1", "h5"),
        ("g8", "f6"),
    ];
    for (from, to) in moves {
        board.apply_notation(from, to).unwrap();
        let side = board.active();
        let ids: Vec<PieceId> = board.pieces_of(side).map(|(id, _)| id).collect();
        for id in ids {
            let from = board.piece(id).square.unwrap();
            for to in board.legal_targets(id) {
                assert!(!board.would_leave_own_king_in_check(id, from, to));
            }
        }
    }
    // Scholar's mate
    assert!(matches!(
        board.apply_notation("h5", "f7"),
        Err(Error::Checkmate {
            winner: Color::White,
            ..
        })
    ));
}

#[test]
fn test_wide_board_play() {
    let fen = "rnbqkbnrnb/pppppppppp/10/10/10/10/PPPPPPPPPP/RNBQKBNRNB w KQkq - 0 1";
    let mut board = Board::from_fen(fen).unwrap();
    play(&mut board, &[("j2", "j4"), ("i7", "i5"), ("j4", "i5")]);
    assert_eq!(
        board.to_fen(),
        "rnbqkbnrnb/pppppppp1p/10/8P1/10/10/PPPPPPPPP1/RNBQKBNRNB b KQkq - 0 2"
    );
}
