//! Error types for chess-risk-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The engine executable could not be located or launched.
    /// Fatal for the whole analysis; not retried.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The engine process died or produced an unparseable response
    /// mid-session. Surfaced per operation; the adapter does not restart
    /// the process on its own.
    #[error("engine communication failed: {0}")]
    EngineCommunication(String),

    /// A move in the supplied sequence is not legal in the current
    /// position. The analyzer drops the move and continues.
    #[error("illegal move '{0}': {1}")]
    IllegalMove(String, String),

    #[error("invalid FEN: {0}")]
    Fen(#[from] shakmaty::fen::ParseFenError),

    #[error("invalid position: {0}")]
    Position(#[from] shakmaty::PositionError<shakmaty::Chess>),
}

pub type Result<T> = std::result::Result<T, Error>;
