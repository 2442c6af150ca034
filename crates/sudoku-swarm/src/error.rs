use sudoku_board::InvalidBoard;
use thiserror::Error;

/// Failure of the queue transport
#[derive(Debug, Clone, Error)]
#[error("queue transport: {0}")]
pub struct TransportError(pub String);

/// Failure of the solve-state store
#[derive(Debug, Clone, Error)]
#[error("solve-state store: {0}")]
pub struct StoreError(pub String);

/// Failure of one protocol step.
///
/// A step that returns an error must not be acknowledged; queue redelivery
/// retries it. Malformed payloads are not errors — they are logged and
/// dropped, since redelivery cannot repair them.
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure to submit a new solve request
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The submitted puzzle is not a valid board — a caller error, surfaced
    /// at the submission boundary rather than inside the queue loop
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] InvalidBoard),
    #[error(transparent)]
    Swarm(#[from] SwarmError),
}
