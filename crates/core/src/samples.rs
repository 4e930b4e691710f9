//! Bundled sample games in SAN, for demos and tests.

/// Scholar's Mate. 1-0.
pub const SCHOLARS_MATE: [&str; 7] = ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"];

/// Fool's Mate, the shortest possible checkmate. 0-1.
pub const FOOLS_MATE: [&str; 4] = ["f3", "e5", "g4", "Qh4#"];

/// Morphy vs Duke Karl / Count Isouard, Paris Opera 1858. 1-0.
#[rustfmt::skip]
pub const OPERA_GAME: [&str; 33] = [
    "e4", "e5", "Nf3", "d6", "d4", "Bg4", "dxe5", "Bxf3", "Qxf3", "dxe5",
    "Bc4", "Nf6", "Qb3", "Qe7", "Nc3", "c6", "Bg5", "b5", "Nxb5", "cxb5",
    "Bxb5+", "Nbd7", "O-O-O", "Rd8", "Rxd7", "Rxd7", "Rd1", "Qe6", "Bxd7+",
    "Nxd7", "Qb8+", "Nxb8", "Rd8#",
];

/// An Italian Game opening sequence, no forced finish.
#[rustfmt::skip]
pub const ITALIAN_GAME: [&str; 19] = [
    "e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3", "Nf6", "d4", "exd4",
    "cxd4", "Bb4+", "Bd2", "Bxd2+", "Nbxd2", "d5", "exd5", "Nxd5", "Qb3",
];

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::san::San;
    use shakmaty::{Chess, Position};

    fn replay(moves: &[&str]) -> Chess {
        let mut position = Chess::default();
        for san_str in moves {
            let san: San = san_str.parse().unwrap();
            let mv = san.to_move(&position).unwrap();
            position = position.play(mv).unwrap();
        }
        position
    }

    #[test]
    fn sample_games_are_legal() {
        replay(&ITALIAN_GAME);
    }

    #[test]
    fn mating_samples_end_in_checkmate() {
        assert!(replay(&SCHOLARS_MATE).is_checkmate());
        assert!(replay(&FOOLS_MATE).is_checkmate());
        assert!(replay(&OPERA_GAME).is_checkmate());
    }
}
