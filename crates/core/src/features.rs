//! Static positional features
//!
//! Pure functions over a position: no engine calls, no I/O. The
//! complexity and king-safety formulas are deliberately crude linear
//! heuristics; treat them as rough signals, not ground truth.

use serde::{Deserialize, Serialize};
use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, File, FromSetup, Position, Rank, Role, Square,
};

/// Standard piece values in centipawns.
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 100,
        Role::Knight => 320,
        Role::Bishop => 330,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 0,
    }
}

/// Material totals per side, in centipawns.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MaterialBalance {
    pub white: i32,
    pub black: i32,
    /// white - black
    pub balance: i32,
}

impl MaterialBalance {
    pub fn total(&self) -> i32 {
        self.white + self.black
    }
}

pub fn material(position: &Chess) -> MaterialBalance {
    let board = position.board();
    let mut white = 0;
    let mut black = 0;
    for square in board.occupied() {
        if let Some(piece) = board.piece_at(square) {
            let value = piece_value(piece.role);
            match piece.color {
                Color::White => white += value,
                Color::Black => black += value,
            }
        }
    }
    MaterialBalance {
        white,
        black,
        balance: white - black,
    }
}

/// King safety signals for one side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KingSafety {
    /// `pawn_shield * 10 - attackers_near_king * 5`. Asymmetric on
    /// purpose: attackers are penalized, shield pawns rewarded.
    pub safety_score: i32,
    /// Opponent attacks on the 3x3 neighborhood of the king square,
    /// clipped at the board edges.
    pub attackers_near_king: u32,
    /// Own pawns on the three forward shield squares.
    pub pawn_shield: u32,
}

pub fn king_safety(position: &Chess, color: Color) -> KingSafety {
    let board = position.board();
    let Some(king) = board.king_of(color) else {
        return KingSafety::default();
    };

    let king_file = king.file() as i32;
    let king_rank = king.rank() as i32;
    let occupied = board.occupied();

    let mut attackers = 0u32;
    for file_offset in -1..=1 {
        for rank_offset in -1..=1 {
            let file = king_file + file_offset;
            let rank = king_rank + rank_offset;
            if (0..8).contains(&file) && (0..8).contains(&rank) {
                let square = Square::from_coords(File::new(file as u32), Rank::new(rank as u32));
                attackers += board.attacks_to(square, !color, occupied).count() as u32;
            }
        }
    }

    // The shield rank is clipped at the board edge, so a king on the last
    // rank looks for "shield" pawns on its own rank.
    let shield_rank = match color {
        Color::White => (king_rank + 1).min(7),
        Color::Black => (king_rank - 1).max(0),
    };
    let mut pawn_shield = 0u32;
    for file_offset in -1..=1 {
        let file = king_file + file_offset;
        if (0..8).contains(&file) {
            let square = Square::from_coords(File::new(file as u32), Rank::new(shield_rank as u32));
            if let Some(piece) = board.piece_at(square) {
                if piece.role == Role::Pawn && piece.color == color {
                    pawn_shield += 1;
                }
            }
        }
    }

    KingSafety {
        safety_score: pawn_shield as i32 * 10 - attackers as i32 * 5,
        attackers_near_king: attackers,
        pawn_shield,
    }
}

/// Legal-move counts for both sides.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Mobility {
    pub own: u32,
    pub opponent: u32,
    pub advantage: i32,
}

/// Counts legal moves for the side to move, and for the opponent by
/// flipping the side to move (a null move). When the mover is in check
/// no null move exists and the opponent count falls back to 0.
pub fn mobility(position: &Chess) -> Mobility {
    let own = position.legal_moves().len() as u32;
    let opponent = match null_move(position) {
        Some(flipped) => flipped.legal_moves().len() as u32,
        None => 0,
    };
    Mobility {
        own,
        opponent,
        advantage: own as i32 - opponent as i32,
    }
}

fn null_move(position: &Chess) -> Option<Chess> {
    let mut setup = position.clone().to_setup(EnPassantMode::Legal);
    setup.turn = !setup.turn;
    setup.ep_square = None;
    Chess::from_setup(setup, CastlingMode::Standard).ok()
}

/// Attack counts over the four central squares, with a +2 bonus for
/// occupying one.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CenterControl {
    pub white: u32,
    pub black: u32,
    pub advantage: i32,
}

const CENTER_SQUARES: [Square; 4] = [Square::D4, Square::D5, Square::E4, Square::E5];

pub fn center_control(position: &Chess) -> CenterControl {
    let board = position.board();
    let occupied = board.occupied();
    let mut white = 0u32;
    let mut black = 0u32;
    for square in CENTER_SQUARES {
        white += board.attacks_to(square, Color::White, occupied).count() as u32;
        black += board.attacks_to(square, Color::Black, occupied).count() as u32;
        if let Some(piece) = board.piece_at(square) {
            match piece.color {
                Color::White => white += 2,
                Color::Black => black += 2,
            }
        }
    }
    CenterControl {
        white,
        black,
        advantage: white as i32 - black as i32,
    }
}

/// Crude linear complexity proxy on a 0-100 scale:
/// `(pieces * 2 + total mobility / 10 + total material / 100) / 3`,
/// capped at 100.
pub fn complexity(position: &Chess) -> f64 {
    let total_material = f64::from(material(position).total());
    let mob = mobility(position);
    let total_mobility = f64::from(mob.own + mob.opponent);
    let piece_count = position.board().occupied().count() as f64;

    let score = (piece_count * 2.0 + total_mobility / 10.0 + total_material / 100.0) / 3.0;
    score.min(100.0)
}

/// Coarse game-phase label from move number and remaining material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

pub fn game_phase(position: &Chess) -> GamePhase {
    if position.fullmoves().get() < 10 {
        GamePhase::Opening
    } else if material(position).total() > 2500 {
        GamePhase::Middlegame
    } else {
        GamePhase::Endgame
    }
}

/// All static features of a position in one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionFeatures {
    pub material: MaterialBalance,
    pub white_king_safety: KingSafety,
    pub black_king_safety: KingSafety,
    pub mobility: Mobility,
    pub center_control: CenterControl,
    pub complexity: f64,
    pub piece_count: u32,
    pub game_phase: GamePhase,
}

pub fn extract_all(position: &Chess) -> PositionFeatures {
    PositionFeatures {
        material: material(position),
        white_king_safety: king_safety(position, Color::White),
        black_king_safety: king_safety(position, Color::Black),
        mobility: mobility(position),
        center_control: center_control(position),
        complexity: complexity(position),
        piece_count: position.board().occupied().count() as u32,
        game_phase: game_phase(position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position_from_fen;

    #[test]
    fn starting_material_is_even() {
        let mat = material(&Chess::default());
        assert_eq!(mat.white, 4000);
        assert_eq!(mat.black, 4000);
        assert_eq!(mat.balance, 0);
    }

    #[test]
    fn material_balance_is_antisymmetric() {
        // white missing the b1 knight, and the color-swapped twin
        let down_knight =
            position_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/R1BQKBNR w KQkq - 0 1").unwrap();
        let mirrored =
            position_from_fen("r1bqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(material(&down_knight).balance, -320);
        assert_eq!(
            material(&down_knight).balance,
            -material(&mirrored).balance
        );
    }

    #[test]
    fn starting_position_has_twenty_legal_moves_each() {
        let mob = mobility(&Chess::default());
        assert_eq!(mob.own, 20);
        assert_eq!(mob.opponent, 20);
        assert_eq!(mob.advantage, 0);
    }

    #[test]
    fn opponent_mobility_is_zero_when_in_check() {
        // 1. e4 d5 2. Bb5+ leaves black in check
        let position =
            position_from_fen("rnbqkbnr/ppp1pppp/8/1B1p4/4P3/8/PPPP1PPP/RNBQK1NR b KQkq - 1 2")
                .unwrap();
        let mob = mobility(&position);
        assert!(mob.own > 0);
        assert_eq!(mob.opponent, 0);
    }

    #[test]
    fn starting_king_safety_is_a_full_shield() {
        for color in [Color::White, Color::Black] {
            let safety = king_safety(&Chess::default(), color);
            assert_eq!(safety.pawn_shield, 3);
            assert_eq!(safety.attackers_near_king, 0);
            assert_eq!(safety.safety_score, 30);
        }
    }

    #[test]
    fn starting_center_control_is_balanced() {
        let center = center_control(&Chess::default());
        assert_eq!(center.white, center.black);
        assert_eq!(center.advantage, 0);
    }

    #[test]
    fn complexity_stays_bounded() {
        let start = complexity(&Chess::default());
        assert!(start > 0.0);
        assert!(start <= 100.0);
        // (32 pieces * 2 + 40 moves / 10 + 8000 material / 100) / 3
        assert!((start - 49.33).abs() < 0.1);
    }

    #[test]
    fn game_phase_thresholds() {
        assert_eq!(game_phase(&Chess::default()), GamePhase::Opening);

        let endgame = position_from_fen("8/5k2/8/8/8/8/5K2/4R3 w - - 0 40").unwrap();
        assert_eq!(game_phase(&endgame), GamePhase::Endgame);

        let middlegame = position_from_fen(
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 14",
        )
        .unwrap();
        assert_eq!(game_phase(&middlegame), GamePhase::Middlegame);
    }

    #[test]
    fn extract_all_on_starting_position() {
        let features = extract_all(&Chess::default());
        assert_eq!(features.material.balance, 0);
        assert_eq!(features.piece_count, 32);
        assert!(features.complexity > 0.0);
        assert_eq!(features.game_phase, GamePhase::Opening);
    }
}
