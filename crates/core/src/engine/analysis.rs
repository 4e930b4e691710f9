//! Types for engine evaluation results

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel centipawn value standing in for a forced mate.
pub const MATE_SCORE: i32 = 10_000;

/// Raw engine score for a position, relative to the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Centipawn score.
    Centipawns(i32),
    /// Forced mate in N moves (negative: the side to move gets mated).
    Mate(i32),
}

impl Evaluation {
    /// Collapses mate scores onto the +-10000 sentinel.
    pub fn as_centipawns(&self) -> i32 {
        match self {
            Evaluation::Centipawns(cp) => *cp,
            Evaluation::Mate(n) => {
                if *n > 0 {
                    MATE_SCORE
                } else {
                    -MATE_SCORE
                }
            }
        }
    }

    pub fn mate_in(&self) -> Option<i32> {
        match self {
            Evaluation::Mate(n) => Some(*n),
            Evaluation::Centipawns(_) => None,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => {
                let pawns = *cp as f32 / 100.0;
                if pawns >= 0.0 {
                    write!(f, "+{:.2}", pawns)
                } else {
                    write!(f, "{:.2}", pawns)
                }
            }
            Evaluation::Mate(n) => write!(f, "M{}", n),
        }
    }
}

/// Result of one fixed-depth engine search. Ephemeral; consumed by the
/// simulator and aggregator right after the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionEvaluation {
    /// Centipawns relative to the side to move; mates collapse to +-10000.
    pub score: i32,
    /// Moves until forced mate, if the engine found one.
    pub mate_in: Option<i32>,
    /// Best move in UCI notation; empty if the engine reported none.
    pub best_move: String,
    /// Depth the search was asked to reach.
    pub depth: u8,
}

/// One engine-ranked candidate move from a MultiPV search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateMove {
    /// The move in UCI notation.
    pub uci: String,
    /// Centipawns relative to the side to move; mates collapse to +-10000.
    pub score: i32,
    /// First few plies of this candidate's principal variation.
    pub pv: Vec<String>,
}
