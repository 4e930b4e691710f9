use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::config::ClassifyThresholds;
use crate::risk::RiskMetrics;

/// Quality bucket for one played move, by centipawn loss against the
/// engine's preferred line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveClass {
    Excellent,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl MoveClass {
    /// Buckets a centipawn loss (non-positive for a worsening move).
    /// A loss landing exactly on a threshold takes the worse bucket.
    pub fn from_loss(loss: i32, is_best: bool, thresholds: &ClassifyThresholds) -> Self {
        if is_best {
            return MoveClass::Excellent;
        }
        if loss > -thresholds.inaccuracy {
            MoveClass::Good
        } else if loss > -thresholds.mistake {
            MoveClass::Inaccuracy
        } else if loss > -thresholds.blunder {
            MoveClass::Mistake
        } else {
            MoveClass::Blunder
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveClass::Excellent => "excellent",
            MoveClass::Good => "good",
            MoveClass::Inaccuracy => "inaccuracy",
            MoveClass::Mistake => "mistake",
            MoveClass::Blunder => "blunder",
        }
    }
}

/// Everything recorded about one played move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveAnalysis {
    /// Fullmove number the move was played on.
    pub move_number: u32,
    pub san: String,
    #[serde(with = "color_serde")]
    pub color: Color,
    pub fen_before: String,
    pub fen_after: String,
    /// Centipawns for the mover, before the move.
    pub eval_before: i32,
    /// Centipawns for the mover, after the move (sign-adjusted back to
    /// the mover's perspective).
    pub eval_after: i32,
    /// `eval_after - eval_before`; negative when the move lost ground.
    pub eval_delta: i32,
    pub is_best_move: bool,
    /// Engine's preferred move in UCI, empty on finished games.
    pub best_alternative: String,
    pub classification: MoveClass,
    /// Risk score of the position the move was played from.
    pub risk_score: f64,
    /// Full metrics when the calculator ran in full mode.
    pub risk_metrics: Option<RiskMetrics>,
}

/// Serde plumbing for [`shakmaty::Color`], which has `Display`/`FromStr`
/// ("white"/"black") but no serde impls of its own.
mod color_serde {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use shakmaty::Color;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(color)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }
}

/// Aggregates for one side of a game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideReport {
    pub moves: usize,
    pub excellent: usize,
    pub good: usize,
    pub inaccuracies: usize,
    pub mistakes: usize,
    pub blunders: usize,
    pub best_moves: usize,
    pub avg_risk_score: f64,
    pub max_risk_score: f64,
    /// Mean of the non-positive eval deltas, 0 when no move lost ground.
    pub avg_eval_loss: f64,
    /// Best-move rate as a percentage.
    pub accuracy: f64,
}

/// Per-game summary produced from the per-move records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameReport {
    pub total_moves: usize,
    pub white: SideReport,
    pub black: SideReport,
    /// SAN of the move played from the riskiest position, if any.
    pub highest_risk_move: Option<String>,
    pub total_blunders: usize,
    pub total_mistakes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_move_is_excellent_regardless_of_loss() {
        let thresholds = ClassifyThresholds::default();
        assert_eq!(
            MoveClass::from_loss(-500, true, &thresholds),
            MoveClass::Excellent
        );
    }

    #[test]
    fn loss_thresholds_bucket_to_the_worse_class() {
        let thresholds = ClassifyThresholds::default();
        assert_eq!(MoveClass::from_loss(0, false, &thresholds), MoveClass::Good);
        assert_eq!(
            MoveClass::from_loss(-49, false, &thresholds),
            MoveClass::Good
        );
        assert_eq!(
            MoveClass::from_loss(-50, false, &thresholds),
            MoveClass::Inaccuracy
        );
        assert_eq!(
            MoveClass::from_loss(-149, false, &thresholds),
            MoveClass::Inaccuracy
        );
        assert_eq!(
            MoveClass::from_loss(-150, false, &thresholds),
            MoveClass::Mistake
        );
        assert_eq!(
            MoveClass::from_loss(-299, false, &thresholds),
            MoveClass::Mistake
        );
        assert_eq!(
            MoveClass::from_loss(-300, false, &thresholds),
            MoveClass::Blunder
        );
        assert_eq!(
            MoveClass::from_loss(-1000, false, &thresholds),
            MoveClass::Blunder
        );
    }

    #[test]
    fn classes_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&MoveClass::Blunder).unwrap(),
            "\"blunder\""
        );
        assert_eq!(MoveClass::Inaccuracy.as_str(), "inaccuracy");
    }
}
