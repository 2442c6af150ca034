//! Distributed Sudoku search over a durable message queue.
//!
//! Backtracking is encoded as data: each queue message carries one open
//! depth-first path as a stack of (board, width) frames. Any worker can pull
//! a message, advance the path by one step, and republish — either linearly
//! (children pushed onto the same stack) or as a fan-out into independent
//! messages, bounded by a configured parallelism budget. Delivery is
//! at-least-once and unordered; every step is safe to repeat, so queue
//! redelivery is the only retry mechanism.
//!
//! The queue transport and the solve-state store are collaborators behind
//! narrow async traits; [`MemoryQueue`] and [`MemoryStore`] model their
//! contracts in process for tests and single-machine runs.

mod config;
mod coordinator;
mod error;
mod message;
mod store;
mod transport;

pub use config::SwarmConfig;
pub use coordinator::SearchCoordinator;
pub use error::{StoreError, SubmitError, SwarmError, TransportError};
pub use message::{Frame, SearchMessage, DEFAULT_BRANCH_WIDTH};
pub use store::{MemoryStore, SolveStateStore};
pub use transport::{AckToken, Delivery, MemoryQueue, QueueTransport};
