//! Analysis configuration
//!
//! Every tunable knob and heuristic constant lives here so the same
//! thresholds and weights are used at every call site instead of being
//! re-derived inline.

use serde::{Deserialize, Serialize};

/// How much work to spend estimating per-position risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskMode {
    /// Monte Carlo continuation sampling plus the full weighted blend.
    Full,
    /// Single-evaluation fast path: half complexity, half tactical
    /// density. Cheaper and lower fidelity; the two modes disagree in
    /// general on the same position.
    Fast,
}

/// Centipawn-loss thresholds for move classification.
///
/// A loss at exactly a threshold falls into the worse bucket: -50 is an
/// inaccuracy, -150 a mistake, -300 a blunder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassifyThresholds {
    pub inaccuracy: i32,
    pub mistake: i32,
    pub blunder: i32,
}

impl Default for ClassifyThresholds {
    fn default() -> Self {
        Self {
            inaccuracy: 50,
            mistake: 150,
            blunder: 300,
        }
    }
}

/// Weights of the overall risk score blend. The edge weight is
/// subtractive: a wide gap to the second-best move lowers practical risk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskWeights {
    pub volatility: f64,
    pub downside: f64,
    pub complexity: f64,
    pub tactical: f64,
    pub edge: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            volatility: 0.3,
            downside: 0.25,
            complexity: 0.2,
            tactical: 0.15,
            edge: 0.1,
        }
    }
}

/// Knobs consumed at construction by the analyzer and risk calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Fixed engine search depth for every evaluation.
    pub depth: u8,
    /// Engine thread count, configured once at process startup.
    pub threads: u32,
    /// Number of Monte Carlo trials per position.
    pub simulations: u32,
    /// Lookahead horizon in full moves; each trial plays up to twice
    /// this many half-moves.
    pub lookahead_plies: u32,
    /// How many engine candidate moves feed the sampling distribution.
    pub candidate_moves: usize,
    /// Softmax temperature in centipawns.
    pub softmax_temperature: f64,
    /// Leaf samples strictly below this centipawn value count as downside.
    pub downside_threshold: f64,
    /// Percentile used for value-at-risk.
    pub var_percentile: f64,
    pub risk_mode: RiskMode,
    pub thresholds: ClassifyThresholds,
    pub weights: RiskWeights,
    /// Cap on analyzed moves per game, if any.
    pub max_moves: Option<usize>,
    /// Fixed RNG seed for reproducible continuation sampling.
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            depth: 12,
            threads: 2,
            simulations: 15,
            lookahead_plies: 2,
            candidate_moves: 5,
            softmax_temperature: 100.0,
            downside_threshold: -100.0,
            var_percentile: 5.0,
            risk_mode: RiskMode::Full,
            thresholds: ClassifyThresholds::default(),
            weights: RiskWeights::default(),
            max_moves: None,
            seed: None,
        }
    }
}
