use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use sudoku_board::Board;
use tokio::sync::Mutex;

/// Durable keyed state shared by all workers of a solve request: one
/// examined-board counter and at most one recorded solution.
///
/// Both writes must be safe under concurrent, possibly duplicated calls.
/// The counter is an atomic add and therefore approximate under redelivery;
/// the solution write is first-write-wins, so a duplicate "solved" step can
/// never overwrite an earlier result.
#[async_trait]
pub trait SolveStateStore: Send + Sync {
    /// Durably add `delta` to the request's examined-board counter.
    async fn increase_examined_board_count(
        &self,
        request_id: &str,
        delta: u64,
    ) -> Result<(), StoreError>;

    /// Record `board` as the solution unless one is already recorded.
    async fn set_solution(&self, request_id: &str, board: &Board) -> Result<(), StoreError>;

    /// The recorded solution, if any.
    async fn get_solution(&self, request_id: &str) -> Result<Option<Board>, StoreError>;

    /// Current value of the examined-board counter (zero if never touched).
    async fn examined_board_count(&self, request_id: &str) -> Result<u64, StoreError>;
}

#[derive(Default)]
struct RequestState {
    examined: u64,
    solution: Option<Board>,
}

/// In-process store modeling the contract for tests and single-machine runs.
#[derive(Default)]
pub struct MemoryStore {
    requests: Mutex<HashMap<String, RequestState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SolveStateStore for MemoryStore {
    async fn increase_examined_board_count(
        &self,
        request_id: &str,
        delta: u64,
    ) -> Result<(), StoreError> {
        let mut requests = self.requests.lock().await;
        requests.entry(request_id.to_string()).or_default().examined += delta;
        Ok(())
    }

    async fn set_solution(&self, request_id: &str, board: &Board) -> Result<(), StoreError> {
        let mut requests = self.requests.lock().await;
        let state = requests.entry(request_id.to_string()).or_default();
        if state.solution.is_none() {
            state.solution = Some(board.clone());
        }
        Ok(())
    }

    async fn get_solution(&self, request_id: &str) -> Result<Option<Board>, StoreError> {
        let requests = self.requests.lock().await;
        Ok(requests.get(request_id).and_then(|s| s.solution.clone()))
    }

    async fn examined_board_count(&self, request_id: &str) -> Result<u64, StoreError> {
        let requests = self.requests.lock().await;
        Ok(requests.get(request_id).map(|s| s.examined).unwrap_or(0))
    }
}
