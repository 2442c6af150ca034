use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Lease token identifying one pulled-but-unacknowledged delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AckToken(Uuid);

/// One leased message: the payload plus the token needed to settle it.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub token: AckToken,
    pub payload: Vec<u8>,
}

/// Durable at-least-once pub/sub channel, reduced to the three operations
/// the search protocol needs. Payloads are opaque bytes; no ordering is
/// guaranteed. Pulling leases a message; a lease that is never acked must
/// eventually be redelivered by the backend.
#[async_trait]
pub trait QueueTransport: Send + Sync {
    /// Publish one message to the topic.
    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Lease the next available message, if any.
    async fn pull(&self) -> Result<Option<Delivery>, TransportError>;

    /// Settle a leased message so it is never delivered again.
    async fn ack(&self, token: AckToken) -> Result<(), TransportError>;
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Vec<u8>>,
    in_flight: HashMap<AckToken, Vec<u8>>,
}

/// In-process queue modeling the transport contract: leased delivery,
/// ack-to-settle, and explicit redelivery of expired leases. Backs tests
/// and single-machine runs.
#[derive(Default)]
pub struct MemoryQueue {
    state: Mutex<QueueState>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages waiting to be pulled.
    pub async fn pending(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Messages leased but not yet acked.
    pub async fn in_flight(&self) -> usize {
        self.state.lock().await.in_flight.len()
    }

    /// Return every unacked lease to the pending queue — what a broker does
    /// when a lease deadline expires. Returns how many were redelivered.
    pub async fn redeliver_unacked(&self) -> usize {
        let mut state = self.state.lock().await;
        let redelivered = state.in_flight.len();
        let payloads: Vec<Vec<u8>> = state.in_flight.drain().map(|(_, p)| p).collect();
        state.pending.extend(payloads);
        redelivered
    }
}

#[async_trait]
impl QueueTransport for MemoryQueue {
    async fn publish(&self, payload: Vec<u8>) -> Result<(), TransportError> {
        self.state.lock().await.pending.push_back(payload);
        Ok(())
    }

    async fn pull(&self) -> Result<Option<Delivery>, TransportError> {
        let mut state = self.state.lock().await;
        let Some(payload) = state.pending.pop_front() else {
            return Ok(None);
        };
        let token = AckToken(Uuid::new_v4());
        state.in_flight.insert(token, payload.clone());
        Ok(Some(Delivery { token, payload }))
    }

    async fn ack(&self, token: AckToken) -> Result<(), TransportError> {
        // Acking an already-settled token is a no-op, matching broker
        // behavior for duplicate settles
        self.state.lock().await.in_flight.remove(&token);
        Ok(())
    }
}
