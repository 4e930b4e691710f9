//! Chess engine integration
//!
//! Provides the evaluator capability interface and the UCI subprocess
//! binding to Stockfish-compatible engines.

pub mod analysis;
pub mod stockfish;

pub use analysis::{CandidateMove, Evaluation, PositionEvaluation, MATE_SCORE};
pub use stockfish::StockfishEngine;

use shakmaty::Chess;

use crate::error::Result;

/// Capability interface over a position-scoring engine.
///
/// `&mut self` is deliberate: an evaluator handles one request at a time
/// (the UCI adapter drives a single process), so calls against one
/// instance are serialized by the borrow checker rather than a mutex.
/// Separate instances own separate processes and may run in parallel.
pub trait PositionEvaluator {
    /// Scores a position with a fixed-depth search.
    fn evaluate(&mut self, position: &Chess, depth: u8) -> Result<PositionEvaluation>;

    /// Enumerates up to `count` candidate moves, best first by the
    /// engine's own ranking. May return fewer when fewer legal moves
    /// exist; an empty list means the game is over at this position.
    fn top_moves(
        &mut self,
        position: &Chess,
        depth: u8,
        count: usize,
    ) -> Result<Vec<CandidateMove>>;
}
