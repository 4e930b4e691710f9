use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::engine::{PositionEvaluator, StockfishEngine};
use crate::error::{Error, Result};
use crate::risk::RiskCalculator;

use super::types::{GameReport, MoveAnalysis, MoveClass, SideReport};

/// Move-by-move game analyzer over any evaluator.
pub struct GameAnalyzer<E: PositionEvaluator> {
    risk: RiskCalculator<E>,
}

impl GameAnalyzer<StockfishEngine> {
    /// Launches a Stockfish-compatible engine at `path` and wraps it.
    pub fn with_stockfish(path: &str, config: AnalysisConfig) -> Result<Self> {
        let engine = StockfishEngine::new(path, config.threads)?;
        Ok(Self::new(engine, config))
    }
}

impl<E: PositionEvaluator> GameAnalyzer<E> {
    pub fn new(evaluator: E, config: AnalysisConfig) -> Self {
        Self {
            risk: RiskCalculator::new(evaluator, config),
        }
    }

    pub fn risk_calculator(&mut self) -> &mut RiskCalculator<E> {
        &mut self.risk
    }

    /// Analyzes a game in SAN from the standard starting position.
    pub fn analyze_game<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<Vec<MoveAnalysis>> {
        self.analyze_game_from(Chess::default(), moves)
    }

    /// Analyzes a SAN move sequence from an arbitrary starting position.
    ///
    /// A move that fails to parse or is illegal in the running position
    /// is skipped with a warning; the position does not advance past it,
    /// so later moves are judged against the last position that was
    /// reached legally.
    pub fn analyze_game_from<S: AsRef<str>>(
        &mut self,
        start: Chess,
        moves: &[S],
    ) -> Result<Vec<MoveAnalysis>> {
        let cap = self.risk.config().max_moves.unwrap_or(usize::MAX);
        let mut analyses = Vec::new();
        let mut position = start;

        for san_str in moves.iter().take(cap).map(|s| s.as_ref()) {
            match self.analyze_move(&position, san_str) {
                Ok((analysis, next)) => {
                    debug!(
                        san = %analysis.san,
                        class = analysis.classification.as_str(),
                        risk = analysis.risk_score,
                        "move analyzed"
                    );
                    analyses.push(analysis);
                    position = next;
                }
                Err(e) => {
                    warn!(san = %san_str, error = %e, "skipping move");
                }
            }
        }

        Ok(analyses)
    }

    /// Analyzes one SAN move in `position`, returning the record and the
    /// position after the move.
    pub fn analyze_move(&mut self, position: &Chess, san_str: &str) -> Result<(MoveAnalysis, Chess)> {
        let fen_before = Fen::from_position(position, EnPassantMode::Legal).to_string();
        let illegal = || Error::IllegalMove(san_str.to_string(), fen_before.clone());

        let san: San = san_str.parse().map_err(|_| illegal())?;
        let mv = san.to_move(position).map_err(|_| illegal())?;

        let before = self.risk.evaluate(position)?;
        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        let is_best = !before.best_move.is_empty() && uci == before.best_move;

        let (risk_score, risk_metrics) = self.risk.position_risk(position)?;

        let after = position.clone().play(mv).map_err(|_| illegal())?;
        let fen_after = Fen::from_position(&after, EnPassantMode::Legal).to_string();

        // the score after the move is for the opponent to move
        let eval_after = -self.risk.evaluate(&after)?.score;
        let eval_delta = eval_after - before.score;
        let classification =
            MoveClass::from_loss(eval_delta, is_best, &self.risk.config().thresholds);

        let analysis = MoveAnalysis {
            move_number: position.fullmoves().get(),
            san: san_str.to_string(),
            color: position.turn(),
            fen_before,
            fen_after,
            eval_before: before.score,
            eval_after,
            eval_delta,
            is_best_move: is_best,
            best_alternative: before.best_move,
            classification,
            risk_score,
            risk_metrics,
        };
        Ok((analysis, after))
    }

    /// Convenience wrapper: analyze a game and fold the records into a
    /// report in one call.
    pub fn analyze_and_report<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<GameReport> {
        let analyses = self.analyze_game(moves)?;
        Ok(generate_report(&analyses))
    }
}

/// Folds per-move records into per-side aggregates. An empty slice
/// yields an all-zero report.
pub fn generate_report(analyses: &[MoveAnalysis]) -> GameReport {
    let white: Vec<&MoveAnalysis> = analyses
        .iter()
        .filter(|a| a.color == shakmaty::Color::White)
        .collect();
    let black: Vec<&MoveAnalysis> = analyses
        .iter()
        .filter(|a| a.color == shakmaty::Color::Black)
        .collect();

    let highest_risk_move = analyses
        .iter()
        .max_by(|a, b| a.risk_score.total_cmp(&b.risk_score))
        .filter(|a| a.risk_score > 0.0)
        .map(|a| a.san.clone());

    let white = side_report(&white);
    let black = side_report(&black);
    GameReport {
        total_moves: analyses.len(),
        total_blunders: white.blunders + black.blunders,
        total_mistakes: white.mistakes + black.mistakes,
        white,
        black,
        highest_risk_move,
    }
}

fn side_report(moves: &[&MoveAnalysis]) -> SideReport {
    let mut report = SideReport {
        moves: moves.len(),
        ..Default::default()
    };
    if moves.is_empty() {
        return report;
    }

    for analysis in moves {
        match analysis.classification {
            MoveClass::Excellent => report.excellent += 1,
            MoveClass::Good => report.good += 1,
            MoveClass::Inaccuracy => report.inaccuracies += 1,
            MoveClass::Mistake => report.mistakes += 1,
            MoveClass::Blunder => report.blunders += 1,
        }
        if analysis.is_best_move {
            report.best_moves += 1;
        }
    }

    let n = moves.len() as f64;
    report.avg_risk_score = moves.iter().map(|a| a.risk_score).sum::<f64>() / n;
    report.max_risk_score = moves.iter().fold(0.0, |acc, a| a.risk_score.max(acc));
    report.avg_eval_loss = moves
        .iter()
        .map(|a| f64::from(a.eval_delta.min(0)))
        .sum::<f64>()
        / n;
    report.accuracy = report.best_moves as f64 / n * 100.0;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalysisConfig, RiskMode};
    use crate::engine::testing::ScriptedEvaluator;
    use crate::engine::MATE_SCORE;
    use shakmaty::Color;

    fn fast_analyzer(default_score: i32) -> GameAnalyzer<ScriptedEvaluator> {
        fast_analyzer_with(default_score, |_| {})
    }

    fn fast_analyzer_with(
        default_score: i32,
        tweak: impl FnOnce(&mut AnalysisConfig),
    ) -> GameAnalyzer<ScriptedEvaluator> {
        let mut config = AnalysisConfig {
            risk_mode: RiskMode::Fast,
            seed: Some(1),
            ..Default::default()
        };
        tweak(&mut config);
        GameAnalyzer::new(ScriptedEvaluator::new(default_score), config)
    }

    const SCHOLARS_MATE: [&str; 7] = ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"];

    #[test]
    fn empty_game_yields_empty_report() {
        let mut analyzer = fast_analyzer(0);
        let analyses = analyzer.analyze_game::<&str>(&[]).unwrap();
        assert!(analyses.is_empty());

        let report = generate_report(&analyses);
        assert_eq!(report.total_moves, 0);
        assert_eq!(report.white.moves, 0);
        assert_eq!(report.black.moves, 0);
        assert_eq!(report.white.avg_risk_score, 0.0);
        assert!(report.highest_risk_move.is_none());
    }

    #[test]
    fn analyzes_a_full_short_game() {
        let mut analyzer = fast_analyzer(10);
        let analyses = analyzer.analyze_game(&SCHOLARS_MATE).unwrap();
        assert_eq!(analyses.len(), 7);

        // colors alternate starting from white
        for (i, analysis) in analyses.iter().enumerate() {
            let expected = if i % 2 == 0 {
                Color::White
            } else {
                Color::Black
            };
            assert_eq!(analysis.color, expected);
        }

        // the mating move leaves the opponent checkmated
        let last = analyses.last().unwrap();
        assert_eq!(last.san, "Qxf7#");
        assert_eq!(last.eval_after, MATE_SCORE);
        assert_eq!(last.move_number, 4);
    }

    #[test]
    fn max_moves_caps_the_walk() {
        let mut analyzer = fast_analyzer_with(10, |c| c.max_moves = Some(4));
        let analyses = analyzer.analyze_game(&SCHOLARS_MATE).unwrap();
        assert_eq!(analyses.len(), 4);
        assert_eq!(analyses.last().unwrap().san, "Nc6");
    }

    #[test]
    fn illegal_move_is_skipped_and_the_rest_analyzed() {
        // "e5" is illegal for white on move 3; the two surrounding moves
        // still go through
        let moves = ["e4", "e5", "e5", "Nf3", "Nc6"];
        let mut analyzer = fast_analyzer(0);
        let analyses = analyzer.analyze_game(&moves).unwrap();
        assert_eq!(analyses.len(), 4);
        assert_eq!(analyses[2].san, "Nf3");
    }

    #[test]
    fn unparseable_san_is_skipped() {
        let moves = ["e4", "not-a-move", "e5"];
        let mut analyzer = fast_analyzer(0);
        let analyses = analyzer.analyze_game(&moves).unwrap();
        assert_eq!(analyses.len(), 2);
    }

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn best_move_flag_follows_the_engine_choice() {
        let mut evaluator = ScriptedEvaluator::new(0);
        evaluator.script_eval(
            START_FEN,
            crate::engine::PositionEvaluation {
                score: 20,
                mate_in: None,
                best_move: "e2e4".into(),
                depth: 12,
            },
        );
        let config = AnalysisConfig {
            risk_mode: RiskMode::Fast,
            seed: Some(1),
            ..Default::default()
        };
        let mut analyzer = GameAnalyzer::new(evaluator, config);
        let (analysis, _) = analyzer.analyze_move(&Chess::default(), "e4").unwrap();
        assert!(analysis.is_best_move);
        assert_eq!(analysis.best_alternative, "e2e4");
        assert_eq!(analysis.classification, MoveClass::Excellent);
    }

    #[test]
    fn eval_delta_is_from_the_mover_perspective() {
        let mut evaluator = ScriptedEvaluator::new(0);
        evaluator.script_eval(
            START_FEN,
            crate::engine::PositionEvaluation {
                score: 0,
                mate_in: None,
                best_move: "d2d4".into(),
                depth: 12,
            },
        );
        // after 1. e4 the reply position scores +30 for black
        evaluator.script_eval(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
            crate::engine::PositionEvaluation {
                score: 30,
                mate_in: None,
                best_move: "e7e5".into(),
                depth: 12,
            },
        );
        let config = AnalysisConfig {
            risk_mode: RiskMode::Fast,
            seed: Some(1),
            ..Default::default()
        };
        let mut analyzer = GameAnalyzer::new(evaluator, config);
        let (analysis, _) = analyzer.analyze_move(&Chess::default(), "e4").unwrap();
        assert_eq!(analysis.eval_before, 0);
        assert_eq!(analysis.eval_after, -30);
        assert_eq!(analysis.eval_delta, -30);
        assert_eq!(analysis.classification, MoveClass::Good);
    }

    #[test]
    fn report_counts_classes_per_side() {
        let mut analyzer = fast_analyzer(10);
        let analyses = analyzer.analyze_game(&SCHOLARS_MATE).unwrap();
        let report = generate_report(&analyses);

        assert_eq!(report.total_moves, 7);
        assert_eq!(report.white.moves, 4);
        assert_eq!(report.black.moves, 3);
        assert_eq!(
            report.white.excellent
                + report.white.good
                + report.white.inaccuracies
                + report.white.mistakes
                + report.white.blunders,
            report.white.moves
        );
        assert!(report.white.max_risk_score >= report.white.avg_risk_score);
        assert!((0.0..=100.0).contains(&report.white.accuracy));
        assert!(report.highest_risk_move.is_some());
        assert_eq!(
            report.total_blunders,
            report.white.blunders + report.black.blunders
        );
    }

    #[test]
    fn move_analysis_serializes_to_json() {
        let mut analyzer = fast_analyzer(0);
        let (analysis, _) = analyzer.analyze_move(&Chess::default(), "e4").unwrap();
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains("\"san\":\"e4\""));
        assert!(json.contains("\"classification\""));
    }
}
