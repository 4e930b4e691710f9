//! Chess Risk Estimation Core Library
//!
//! Estimates how risky chess positions and moves are by combining
//! engine evaluation (a UCI subprocess, typically Stockfish) with
//! Monte Carlo continuation sampling and static positional features.
//!
//! Typical use goes through [`GameAnalyzer`]:
//!
//! ```no_run
//! use chess_risk_core::{AnalysisConfig, GameAnalyzer};
//!
//! # fn main() -> chess_risk_core::Result<()> {
//! let mut analyzer = GameAnalyzer::with_stockfish("stockfish", AnalysisConfig::default())?;
//! let moves = ["e4", "e5", "Nf3", "Nc6"];
//! let analyses = analyzer.analyze_game(&moves)?;
//! let report = chess_risk_core::generate_report(&analyses);
//! println!("white accuracy: {:.1}%", report.white.accuracy);
//! # Ok(())
//! # }
//! ```

use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess};

pub mod analyzer;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod risk;
pub mod samples;

pub use analyzer::{generate_report, GameAnalyzer, GameReport, MoveAnalysis, MoveClass, SideReport};
pub use config::{AnalysisConfig, ClassifyThresholds, RiskMode, RiskWeights};
pub use engine::{CandidateMove, PositionEvaluation, PositionEvaluator, StockfishEngine};
pub use error::{Error, Result};
pub use risk::{quick_risk_score, RiskCalculator, RiskMetrics};

/// Creates the standard starting position.
pub fn starting_position() -> Chess {
    Chess::default()
}

/// Parses a FEN string into a playable position.
pub fn position_from_fen(fen: &str) -> Result<Chess> {
    let fen: Fen = fen.parse()?;
    Ok(fen.into_position(CastlingMode::Standard)?)
}
