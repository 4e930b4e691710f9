//! Game and move analysis
//!
//! Walks a game move by move, classifying each move by centipawn loss
//! against the engine's best line and attaching a per-position risk
//! score, then folds the per-move records into a per-side report.

mod game;
mod types;

pub use game::{generate_report, GameAnalyzer};
pub use types::{GameReport, MoveAnalysis, MoveClass, SideReport};
