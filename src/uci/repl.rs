//! UCI read-eval-print loop.
//!
//! Reads commands from stdin on a dedicated reader thread, runs searches on a
//! worker thread so `stop` can interrupt them promptly, and writes UCI
//! responses to stdout.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::board::{search, Board, Move, SearchConfig, SearchIterationInfo, SearchParams, SearchState};

use super::command::{parse_go_params, parse_uci_command, UciCommand};
use super::options::{parse_setoption, UciOptionAction, UciOptions};
use super::print::print_perft_info;
use super::report::{print_bestmove, print_ready};
use super::time::{build_search_request, TimeConfig, TimeControl};
use super::{parse_position_command, format_uci_move};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Outcome of a finished search worker thread.
struct SearchOutcome {
    state: SearchState,
    best_move: Option<Move>,
    ponder_move: Option<Move>,
}

/// Tracks an in-flight search running on its own thread.
struct RunningSearch {
    handle: JoinHandle<SearchOutcome>,
    stop: Arc<AtomicBool>,
}

/// Engine state owned by the UCI loop.
pub struct UciEngine {
    board: Board,
    state: Option<SearchState>,
    options: UciOptions,
    time_config: TimeConfig,
    running: Option<RunningSearch>,
}

impl UciEngine {
    #[must_use]
    pub fn new() -> Self {
        let options = UciOptions::new(crate::board::DEFAULT_TT_MB);
        UciEngine {
            board: Board::new(),
            state: Some(SearchState::new(options.hash_mb)),
            time_config: TimeConfig {
                move_overhead_ms: options.move_overhead_ms,
                soft_time_percent: options.soft_time_percent,
                hard_time_percent: options.hard_time_percent,
                default_max_nodes: options.default_max_nodes,
            },
            options,
            running: None,
        }
    }

    fn sync_time_config(&mut self) {
        self.time_config = TimeConfig {
            move_overhead_ms: self.options.move_overhead_ms,
            soft_time_percent: self.options.soft_time_percent,
            hard_time_percent: self.options.hard_time_percent,
            default_max_nodes: self.options.default_max_nodes,
        };
    }

    fn take_state(&mut self) -> SearchState {
        self.state.take().unwrap_or_else(|| SearchState::new(self.options.hash_mb))
    }

    /// Stop and block until any in-flight search finishes, reclaiming its `SearchState`.
    ///
    /// Always signals `stop` first: callers use this to preempt a search before
    /// running a new command, and must never block on a search that only a
    /// `stop` command (still queued behind this one) would end.
    fn finish_running_search(&mut self, report: bool) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.stop.store(true, Ordering::Relaxed);
        let outcome = running.handle.join().unwrap_or_else(|_| SearchOutcome {
            state: SearchState::new(self.options.hash_mb),
            best_move: None,
            ponder_move: None,
        });
        self.state = Some(outcome.state);
        if report {
            print_bestmove(outcome.best_move);
            if let Some(ponder) = outcome.ponder_move {
                println!("info string ponder {}", format_uci_move(&ponder));
            }
        }
    }

    fn handle_go(&mut self, parts: &[&str]) {
        self.finish_running_search(true);

        let params = parse_go_params(parts);
        let white_to_move = self.board.white_to_move();

        let time_control = if let Some(movetime) = params.movetime {
            TimeControl::move_time_ms(movetime)
        } else if params.infinite || params.ponder {
            TimeControl::Infinite
        } else {
            let time_left_ms = if white_to_move { params.wtime } else { params.btime };
            let inc_ms = if white_to_move { params.winc } else { params.binc };
            match time_left_ms {
                Some(time_left_ms) => TimeControl::Incremental {
                    time_left_ms,
                    inc_ms: inc_ms.unwrap_or(0),
                    movestogo: params.movestogo,
                },
                None => TimeControl::Depth,
            }
        };

        let (request, _) = build_search_request(
            time_control,
            params.depth,
            params.nodes,
            params.ponder,
            params.infinite,
            &self.time_config,
        );

        let info_callback: crate::board::SearchInfoCallback = Arc::new(|info: &SearchIterationInfo| {
            print_search_info(info);
        });

        let time_limit_ms = if request.soft_time_ms == u64::MAX { 0 } else { request.soft_time_ms };

        let config = SearchConfig {
            max_depth: request.depth,
            time_limit_ms,
            node_limit: request.max_nodes,
            extract_ponder: self.options.ponder,
            info_callback: Some(info_callback),
        };

        let mut board = self.board.clone();
        let mut state = self.take_state();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = Arc::clone(&stop);

        let handle = std::thread::spawn(move || {
            let result = search(&mut board, &mut state, config, &stop_for_thread);
            SearchOutcome {
                state,
                best_move: result.best_move,
                ponder_move: result.ponder_move,
            }
        });

        self.running = Some(RunningSearch { handle, stop });
    }

    fn handle_stop(&mut self) {
        self.finish_running_search(true);
    }

    fn handle_setoption(&mut self, parts: &[&str]) {
        let Some((name, value)) = parse_setoption(parts) else {
            return;
        };
        // setoption must not race a running search's SearchState.
        self.finish_running_search(true);
        let mut state = self.take_state();
        let action = self.options.apply_setoption(&name, value.as_deref(), &mut state);
        self.state = Some(state);
        self.sync_time_config();

        match action {
            Some(UciOptionAction::ReinitHash(mb)) => {
                if let Some(state) = &mut self.state {
                    state.reset_tables(mb);
                }
            }
            Some(UciOptionAction::SetThreads(_)) => {
                // Single-threaded search only; accepted for UCI compatibility.
            }
            None => {}
        }
    }

    fn handle_perft(&mut self, depth: usize) {
        self.finish_running_search(true);
        let start = Instant::now();
        let nodes = self.board.perft(depth);
        print_perft_info(depth, nodes, start.elapsed());
    }

    fn handle_position(&mut self, parts: &[&str]) {
        if self.running.is_some() {
            #[cfg(feature = "logging")]
            log::warn!(
                "{}",
                super::UciError::ProtocolViolation("position received during an active search".into())
            );
            return;
        }
        parse_position_command(&mut self.board, parts);
    }

    fn handle_ucinewgame(&mut self) {
        self.finish_running_search(false);
        self.board = Board::new();
        if let Some(state) = &mut self.state {
            state.reset_tables(self.options.hash_mb);
        }
    }

    /// Run the loop, reading commands from `reader` until `quit` or EOF.
    pub fn run<R: BufRead>(&mut self, reader: R) {
        let (tx, rx) = mpsc::channel::<String>();
        std::thread::spawn(move || {
            for line in reader.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        loop {
            let line = if self.running.is_some() {
                match self.wait_for_line_or_search_done(&rx) {
                    Some(line) => line,
                    None => continue,
                }
            } else {
                match rx.recv() {
                    Ok(line) => line,
                    Err(_) => break,
                }
            };

            let Some(command) = parse_uci_command(&line) else {
                continue;
            };

            match command {
                UciCommand::Uci => {
                    let params = self.state.as_ref().map_or_else(SearchParams::default, |s| s.params().clone());
                    self.options.print(&params);
                }
                UciCommand::IsReady => print_ready(),
                UciCommand::UciNewGame => self.handle_ucinewgame(),
                UciCommand::Position(parts) => {
                    let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                    self.handle_position(&parts);
                }
                UciCommand::Go(parts) => {
                    let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                    self.handle_go(&parts);
                }
                UciCommand::Perft(depth) => self.handle_perft(depth),
                UciCommand::SetOption(parts) => {
                    let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
                    self.handle_setoption(&parts);
                }
                UciCommand::Debug(_) => {}
                UciCommand::Stop => self.handle_stop(),
                UciCommand::PonderHit => {}
                UciCommand::Quit => {
                    self.handle_stop();
                    break;
                }
                UciCommand::Unknown(text) => {
                    eprintln!("info string unknown command: {text}");
                }
            }

            let _ = io::stdout().flush();
        }
    }

    /// While a search runs, poll stdin for `stop`/control commands without
    /// blocking indefinitely, so the search thread's completion is noticed
    /// promptly too.
    fn wait_for_line_or_search_done(&mut self, rx: &mpsc::Receiver<String>) -> Option<String> {
        loop {
            if self
                .running
                .as_ref()
                .is_some_and(|r| r.handle.is_finished())
            {
                self.finish_running_search(true);
                return None;
            }
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return Some(line),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }
}

impl Default for UciEngine {
    fn default() -> Self {
        UciEngine::new()
    }
}

fn print_search_info(info: &SearchIterationInfo) {
    let score_str = match info.mate_in {
        Some(mate) => format!("mate {mate}"),
        None => format!("cp {}", info.score),
    };
    print!(
        "info depth {} seldepth {} multipv {} score {} nodes {} nps {} time {}",
        info.depth, info.seldepth, info.multipv, score_str, info.nodes, info.nps, info.time_ms,
    );
    if !info.pv.is_empty() {
        print!(" pv {}", info.pv);
    }
    println!();
}

/// Run the UCI loop against real stdin/stdout.
pub fn run_uci_loop() {
    let stdin = io::stdin();
    let mut engine = UciEngine::new();
    engine.run(stdin.lock());
}
