//! Stockfish chess engine adapter
//!
//! Spawns a UCI-speaking engine as a subprocess and communicates over
//! stdin/stdout. One process per adapter instance; the process is told
//! to quit (and killed if necessary) when the adapter is dropped, so the
//! OS process is released on every exit path.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use shakmaty::fen::Fen;
use shakmaty::{Chess, EnPassantMode};
use tracing::debug;

use super::analysis::{CandidateMove, Evaluation, PositionEvaluation};
use super::PositionEvaluator;
use crate::error::{Error, Result};

/// How many plies of each candidate's principal variation are kept.
const PV_PLIES: usize = 5;

/// Wrapper around a UCI engine process (Stockfish or compatible).
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StockfishEngine {
    /// Launches the engine and completes the UCI handshake.
    ///
    /// `path` is the engine binary, or a name resolvable via PATH.
    /// `threads` is handed to the engine once at startup.
    pub fn new(path: &str, threads: u32) -> Result<Self> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::EngineUnavailable(format!("{}: {}", path, e)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::EngineUnavailable("failed to open engine stdin".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::EngineUnavailable("failed to open engine stdout".into()))?;

        let mut engine = StockfishEngine {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };
        engine.init_uci(threads)?;
        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> Result<()> {
        debug!(cmd, "uci send");
        writeln!(self.stdin, "{}", cmd).map_err(comm)?;
        self.stdin.flush().map_err(comm)?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line).map_err(comm)?;
        if read == 0 {
            return Err(Error::EngineCommunication(
                "engine closed its output stream".into(),
            ));
        }
        Ok(line.trim().to_string())
    }

    fn read_until(&mut self, expected: &str) -> Result<()> {
        loop {
            let line = self.read_line()?;
            if line.starts_with(expected) {
                return Ok(());
            }
        }
    }

    fn init_uci(&mut self, threads: u32) -> Result<()> {
        self.send("uci")?;
        self.read_until("uciok")?;
        self.send(&format!("setoption name Threads value {}", threads))?;
        self.send("isready")?;
        self.read_until("readyok")?;
        Ok(())
    }

    fn set_position(&mut self, position: &Chess) -> Result<()> {
        let fen = Fen::from_position(position, EnPassantMode::Legal);
        self.send(&format!("position fen {}", fen))
    }

    /// Runs one search, feeding every parsed info line to `on_info`, and
    /// returns the move from the final `bestmove` line.
    fn search(&mut self, depth: u8, mut on_info: impl FnMut(&InfoLine)) -> Result<String> {
        self.send(&format!("go depth {}", depth))?;
        loop {
            let line = self.read_line()?;
            if line.starts_with("bestmove") {
                let mut parts = line.split_whitespace();
                parts.next();
                return Ok(parts.next().unwrap_or("(none)").to_string());
            }
            if line.starts_with("info") {
                if let Some(info) = parse_info_line(&line) {
                    on_info(&info);
                }
            }
        }
    }

    /// Tells the engine to quit, then kills it if it is still running.
    pub fn shutdown(&mut self) -> Result<()> {
        self.send("quit")?;
        std::thread::sleep(Duration::from_millis(100));
        let _ = self.process.kill();
        Ok(())
    }
}

fn comm(e: std::io::Error) -> Error {
    Error::EngineCommunication(e.to_string())
}

impl PositionEvaluator for StockfishEngine {
    fn evaluate(&mut self, position: &Chess, depth: u8) -> Result<PositionEvaluation> {
        self.set_position(position)?;
        let mut evaluation = Evaluation::Centipawns(0);
        let best_move = self.search(depth, |info| {
            if info.multipv <= 1 {
                if let Some(score) = info.score {
                    evaluation = score;
                }
            }
        })?;
        // "(none)" is what engines answer on finished games
        let best_move = if best_move == "(none)" {
            String::new()
        } else {
            best_move
        };
        Ok(PositionEvaluation {
            score: evaluation.as_centipawns(),
            mate_in: evaluation.mate_in(),
            best_move,
            depth,
        })
    }

    fn top_moves(
        &mut self,
        position: &Chess,
        depth: u8,
        count: usize,
    ) -> Result<Vec<CandidateMove>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        self.set_position(position)?;
        self.send(&format!("setoption name MultiPV value {}", count))?;

        // The engine re-announces every line at each depth; keep the last
        // (deepest) report per multipv slot.
        let mut lines: Vec<Option<CandidateMove>> = vec![None; count];
        self.search(depth, |info| {
            let slot = info.multipv.max(1) - 1;
            if slot >= count {
                return;
            }
            if let (Some(score), Some(first)) = (info.score, info.pv.first()) {
                lines[slot] = Some(CandidateMove {
                    uci: first.clone(),
                    score: score.as_centipawns(),
                    pv: info.pv.iter().take(PV_PLIES).cloned().collect(),
                });
            }
        })?;
        self.send("setoption name MultiPV value 1")?;

        Ok(lines.into_iter().flatten().collect())
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

/// One parsed `info` line from the engine.
#[derive(Debug, Default)]
struct InfoLine {
    multipv: usize,
    score: Option<Evaluation>,
    pv: Vec<String>,
}

fn parse_info_line(line: &str) -> Option<InfoLine> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut info = InfoLine {
        multipv: 1,
        ..Default::default()
    };

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "multipv" => {
                if let Some(value) = parts.get(i + 1) {
                    info.multipv = value.parse().unwrap_or(1);
                }
                i += 2;
            }
            "score" => {
                if let (Some(kind), Some(value)) = (parts.get(i + 1), parts.get(i + 2)) {
                    match (*kind, value.parse::<i32>()) {
                        ("cp", Ok(cp)) => info.score = Some(Evaluation::Centipawns(cp)),
                        ("mate", Ok(n)) => info.score = Some(Evaluation::Mate(n)),
                        _ => {}
                    }
                }
                i += 3;
            }
            "pv" => {
                info.pv = parts[i + 1..].iter().map(|s| s.to_string()).collect();
                break;
            }
            _ => {
                i += 1;
            }
        }
    }

    if info.score.is_some() || !info.pv.is_empty() {
        Some(info)
    } else {
        None
    }
}
