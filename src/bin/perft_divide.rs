use std::env;
use std::time::Instant;

use chess_engine::board::Board;

fn main() {
    let args: Vec<String> = env::args().collect();
    let (fen, depth) = match args.len() {
        1 => (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1".to_string(),
            3,
        ),
        2 => (args[1].clone(), 3),
        _ => (args[1].clone(), args[2].parse().expect("depth must be a number")),
    };

    let mut board = Board::try_from_fen(&fen).expect("valid FEN");
    println!("Perft divide for \"{fen}\" depth {depth}");

    let start = Instant::now();
    let mut total = 0u64;
    let root_moves = board.generate_moves();
    for mv in &root_moves {
        let info = board.make_move(*mv);
        let cnt = board.perft(depth - 1);
        board.unmake_move(*mv, info);
        println!("  {mv}: {cnt}");
        total += cnt;
    }
    let dur = start.elapsed();
    println!("Total: {total} in {dur:?}");
}
