//! Risk metric aggregation

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Position};

use crate::config::{AnalysisConfig, RiskMode, RiskWeights};
use crate::engine::{PositionEvaluation, PositionEvaluator};
use crate::error::Result;
use crate::features;

/// Named risk metrics for one position. Derived fresh per position and
/// never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Population standard deviation of the leaf samples.
    pub volatility: f64,
    /// Mean leaf sample, or the direct evaluation when no samples exist.
    pub expected_value: f64,
    /// Fraction of leaf samples below the downside threshold.
    pub downside_risk: f64,
    /// 5th-percentile leaf sample (value at risk).
    pub value_at_risk: f64,
    /// Position complexity on a 0-100 scale.
    pub complexity_risk: f64,
    /// Checks, captures and hanging pieces folded into a 0-100 score.
    pub tactical_density: f64,
    /// Centipawn gap between the two best candidate moves.
    pub best_move_edge: f64,
}

/// Population standard deviation; 0 with fewer than two samples.
pub fn volatility(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    (samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Linearly interpolated percentile of the samples; 0 with no samples.
pub fn percentile(samples: &[f64], pct: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (rank - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Fraction of samples strictly below `threshold`; 0 with no samples.
pub fn downside_risk(samples: &[f64], threshold: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let below = samples.iter().filter(|s| **s < threshold).count();
    below as f64 / samples.len() as f64
}

/// Tactical density: `min(checks*5 + captures*2 + hanging*3, 100)`.
///
/// Checks and captures are counted over the full legal-move list; a
/// piece is hanging when its enemy attackers strictly outnumber its
/// defenders and at least one attacker exists.
pub fn tactical_density(position: &Chess) -> f64 {
    let mut checks = 0u32;
    let mut captures = 0u32;
    for mv in position.legal_moves() {
        if mv.is_capture() {
            captures += 1;
        }
        if let Ok(child) = position.clone().play(mv) {
            if child.is_check() {
                checks += 1;
            }
        }
    }

    let board = position.board();
    let occupied = board.occupied();
    let mut hanging = 0u32;
    for square in occupied {
        if let Some(piece) = board.piece_at(square) {
            let attackers = board.attacks_to(square, !piece.color, occupied).count();
            let defenders = board.attacks_to(square, piece.color, occupied).count();
            if attackers > defenders && attackers > 0 {
                hanging += 1;
            }
        }
    }

    f64::from(checks * 5 + captures * 2 + hanging * 3).min(100.0)
}

/// Weighted blend of the metrics, clamped to [0, 100].
pub fn risk_score(metrics: &RiskMetrics, weights: &RiskWeights) -> f64 {
    let vol = (metrics.volatility / 10.0).min(100.0) * weights.volatility;
    let downside = metrics.downside_risk * 100.0 * weights.downside;
    let complexity = metrics.complexity_risk * weights.complexity;
    let tactical = metrics.tactical_density * weights.tactical;
    // one clearly best move lowers practical risk
    let edge = (metrics.best_move_edge / 100.0).min(1.0) * weights.edge * 100.0;

    (vol + downside + complexity + tactical - edge).clamp(0.0, 100.0)
}

/// Fast-path risk: half complexity, half tactical density, each already
/// on a 0-100 scale so each contributes at most 50. No simulation, no
/// engine. Lower fidelity than the Monte-Carlo blend.
pub fn quick_risk_score(position: &Chess) -> f64 {
    let complexity = features::complexity(position);
    let tactical = tactical_density(position);
    (0.5 * complexity + 0.5 * tactical).clamp(0.0, 100.0)
}

/// Computes risk metrics for positions by driving an evaluator.
///
/// Owns the evaluator and the sampling RNG; one instance serves one
/// analysis chain at a time.
pub struct RiskCalculator<E: PositionEvaluator> {
    pub(crate) evaluator: E,
    pub(crate) config: AnalysisConfig,
    pub(crate) rng: StdRng,
}

impl<E: PositionEvaluator> RiskCalculator<E> {
    pub fn new(evaluator: E, config: AnalysisConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            evaluator,
            config,
            rng,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Direct fixed-depth evaluation at the configured depth.
    pub fn evaluate(&mut self, position: &Chess) -> Result<PositionEvaluation> {
        self.evaluator.evaluate(position, self.config.depth)
    }

    /// Centipawn gap between the engine's two best candidate moves;
    /// 0 when fewer than two candidates exist.
    pub fn best_move_edge(&mut self, position: &Chess) -> Result<f64> {
        let candidates = self.evaluator.top_moves(position, self.config.depth, 3)?;
        if candidates.len() < 2 {
            return Ok(0.0);
        }
        Ok((f64::from(candidates[0].score) - f64::from(candidates[1].score)).abs())
    }

    /// Full Monte-Carlo risk metrics for a position.
    pub fn risk_metrics(&mut self, position: &Chess) -> Result<RiskMetrics> {
        let samples = self.simulate(position)?;
        let direct = self.evaluate(position)?;

        let expected_value = if samples.is_empty() {
            f64::from(direct.score)
        } else {
            samples.iter().sum::<f64>() / samples.len() as f64
        };

        Ok(RiskMetrics {
            volatility: volatility(&samples),
            expected_value,
            downside_risk: downside_risk(&samples, self.config.downside_threshold),
            value_at_risk: percentile(&samples, self.config.var_percentile),
            complexity_risk: features::complexity(position),
            tactical_density: tactical_density(position),
            best_move_edge: self.best_move_edge(position)?,
        })
    }

    /// Folds the metrics into one bounded risk score using the
    /// configured weights.
    pub fn risk_score(&self, metrics: &RiskMetrics) -> f64 {
        risk_score(metrics, &self.config.weights)
    }

    /// Risk score for a position in the configured mode, with the full
    /// metrics when the Monte-Carlo mode computed them.
    pub fn position_risk(&mut self, position: &Chess) -> Result<(f64, Option<RiskMetrics>)> {
        match self.config.risk_mode {
            RiskMode::Full => {
                let metrics = self.risk_metrics(position)?;
                let score = self.risk_score(&metrics);
                Ok((score, Some(metrics)))
            }
            RiskMode::Fast => Ok((quick_risk_score(position), None)),
        }
    }
}
