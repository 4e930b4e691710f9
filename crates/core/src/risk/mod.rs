//! Risk estimation
//!
//! Stochastic continuation sampling plus metric aggregation: leaf
//! evaluations from simulated continuations and static positional
//! signals are folded into named risk metrics and one bounded score.

mod metrics;
mod simulation;

pub use metrics::{
    downside_risk, percentile, quick_risk_score, risk_score, tactical_density, volatility,
    RiskCalculator, RiskMetrics,
};
