//! Stochastic continuation sampling
//!
//! Plays short continuations from a position by repeatedly sampling
//! among the engine's top candidate moves with a softmax distribution,
//! then scores the leaf from the original mover's perspective.

use rand::Rng;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Move, Position};
use tracing::debug;

use crate::engine::PositionEvaluator;
use crate::error::Result;

use super::metrics::RiskCalculator;

/// Softmax over candidate scores. Scores are shifted so the minimum
/// maps to 1 before dividing by the temperature, which keeps the
/// exponentials in a sane range for lopsided positions.
fn softmax_weights(scores: &[f64], temperature: f64) -> Vec<f64> {
    let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
    let exps: Vec<f64> = scores
        .iter()
        .map(|s| ((s - min + 1.0) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

impl<E: PositionEvaluator> RiskCalculator<E> {
    /// Engine candidates for one position, resolved to legal moves.
    /// Candidates whose UCI string fails to resolve are skipped.
    fn sample_pool(&mut self, position: &Chess) -> Result<Vec<(Move, f64)>> {
        let wanted = self.config.candidate_moves;
        let candidates = self.evaluator.top_moves(position, self.config.depth, wanted)?;
        let mut pool = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let Ok(uci) = candidate.uci.parse::<UciMove>() else {
                continue;
            };
            let Ok(mv) = uci.to_move(position) else {
                continue;
            };
            pool.push((mv, f64::from(candidate.score)));
        }
        Ok(pool)
    }

    /// Samples one move from the softmax distribution over the engine's
    /// candidates. `None` when the game is over or no candidate resolves.
    pub fn sample_move(&mut self, position: &Chess) -> Result<Option<Move>> {
        let pool = self.sample_pool(position)?;
        if pool.is_empty() {
            return Ok(None);
        }
        let scores: Vec<f64> = pool.iter().map(|(_, s)| *s).collect();
        let weights = softmax_weights(&scores, self.config.softmax_temperature);

        let draw = self.rng.random::<f64>();
        let mut cumulative = 0.0;
        for ((mv, _), weight) in pool.iter().zip(&weights) {
            cumulative += weight;
            if draw < cumulative {
                return Ok(Some(mv.clone()));
            }
        }
        // floating point shortfall at the tail
        Ok(pool.last().map(|(mv, _)| mv.clone()))
    }

    /// Runs the configured number of Monte Carlo trials and returns the
    /// leaf evaluations, signed from the perspective of the side to move
    /// in `position`. Trials whose leaf evaluation fails are dropped
    /// rather than failing the whole batch.
    pub fn simulate(&mut self, position: &Chess) -> Result<Vec<f64>> {
        let mut samples = Vec::with_capacity(self.config.simulations as usize);

        for trial in 0..self.config.simulations {
            let mut current = position.clone();
            for _ in 0..self.config.lookahead_plies * 2 {
                if current.is_game_over() {
                    break;
                }
                match self.sample_move(&current) {
                    Ok(Some(mv)) => match current.clone().play(mv) {
                        Ok(next) => current = next,
                        Err(_) => break,
                    },
                    Ok(None) => break,
                    Err(e) => {
                        debug!(trial, error = %e, "sampling failed, cutting trial short");
                        break;
                    }
                }
            }

            match self.evaluator.evaluate(&current, self.config.depth) {
                Ok(leaf) => {
                    // leaf scores are from the leaf mover's perspective
                    let mut score = f64::from(leaf.score);
                    if current.turn() != position.turn() {
                        score = -score;
                    }
                    samples.push(score);
                }
                Err(e) => {
                    debug!(trial, error = %e, "dropping simulation trial");
                }
            }
        }

        Ok(samples)
    }
}
