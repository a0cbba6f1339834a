use chess_engine::board::Board;
use chess_engine::uci::parse_position_command;

#[test]
fn perft_positions() {
    struct TestPosition {
        name: &'static str,
        fen: &'static str,
        depths: &'static [(usize, u64)],
    }

    const TEST_POSITIONS: &[TestPosition] = &[
        TestPosition {
            name: "Initial Position",
            fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            depths: &[(1, 20), (2, 400), (3, 8902), (4, 197281)],
        },
        TestPosition {
            name: "Kiwipete",
            fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            depths: &[(1, 48), (2, 2039), (3, 97862)],
        },
    ];

    for position in TEST_POSITIONS {
        let mut board = Board::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            let nodes = board.perft(depth);
            assert_eq!(
                nodes, expected,
                "Perft failed for {} at depth {}",
                position.name, depth
            );
        }
    }
}

#[test]
fn test_draw_detection_50_move() {
    let mut board = Board::from_fen("K6k/8/8/8/8/8/8/8 w - - 99 1");
    let parts = [
        "position",
        "fen",
        "K6k/8/8/8/8/8/8/8",
        "w",
        "-",
        "-",
        "99",
        "1",
        "moves",
        "a8a7",
    ];
    parse_position_command(&mut board, &parts);
    assert!(board.is_draw(), "halfmove clock of 100 should be a draw");
}

#[test]
fn test_insufficient_material_not_flagged_as_draw() {
    // Two kings and a lone bishop is a draw under is_theoretical_draw, but
    // not under the 50-move/repetition is_draw check alone.
    let board = Board::from_fen("8/8/8/4k3/8/4B3/4K3/8 w - - 0 1");
    assert!(!board.is_draw());
    assert!(board.is_theoretical_draw());
}
