use crate::config::SwarmConfig;
use crate::error::{SubmitError, SwarmError};
use crate::message::{Frame, SearchMessage};
use crate::store::SolveStateStore;
use crate::transport::QueueTransport;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use sudoku_board::{Board, Solver};
use tokio::sync::watch;
use uuid::Uuid;

/// How long a worker sleeps when the queue comes up empty.
const IDLE_BACKOFF: Duration = Duration::from_millis(50);

/// Owns the distributed branching protocol: one step per queue message,
/// fan-out while the width budget allows, linear continuation otherwise.
///
/// Constructed once per process and shared by `Arc`; every operation takes
/// `&self` and the collaborators carry their own synchronization, so any
/// number of worker tasks can drive it concurrently.
pub struct SearchCoordinator {
    transport: Arc<dyn QueueTransport>,
    store: Arc<dyn SolveStateStore>,
    config: SwarmConfig,
    solver: Solver,
}

impl SearchCoordinator {
    pub fn new(
        transport: Arc<dyn QueueTransport>,
        store: Arc<dyn SolveStateStore>,
        config: SwarmConfig,
    ) -> Self {
        Self {
            transport,
            store,
            config,
            solver: Solver::new(),
        }
    }

    /// Validate a raw puzzle, submit it under a fresh request id, and
    /// return the id. Invalid input is the submitter's error and never
    /// reaches the queue.
    pub async fn submit_puzzle(&self, raw: &str) -> Result<String, SubmitError> {
        let board = Board::from_string(raw)?;
        let request_id = Uuid::new_v4().to_string();
        self.submit(&request_id, vec![board]).await?;
        Ok(request_id)
    }

    /// Root one search path per initial board, each a single default-width
    /// frame.
    pub async fn submit(
        &self,
        request_id: &str,
        initial_boards: Vec<Board>,
    ) -> Result<(), SwarmError> {
        for board in initial_boards {
            let msg = SearchMessage::rooted(request_id, Frame::new(board));
            self.transport.publish(msg.encode()).await?;
        }
        info!("submitted solve request {}", request_id);
        Ok(())
    }

    /// Execute one protocol step for one delivered payload.
    ///
    /// `Ok` means the message is settled and the caller must ack — including
    /// the malformed case, which is logged and dropped because redelivery
    /// cannot repair it. `Err` means some publish or store write did not
    /// commit; the caller must NOT ack, so the broker redelivers and the
    /// whole step re-runs. Every effect except the examined counter is
    /// idempotent under such re-runs.
    pub async fn process(&self, payload: &[u8]) -> Result<(), SwarmError> {
        let Some(mut msg) = SearchMessage::decode(payload) else {
            warn!("dropping malformed search message ({} bytes)", payload.len());
            return Ok(());
        };

        // decode guarantees a non-empty stack
        let Some(frame) = msg.stack.pop() else {
            return Ok(());
        };
        let width = frame.width();
        let request_id = msg.solve_request_id.clone();

        self.store
            .increase_examined_board_count(&request_id, 1)
            .await?;

        let exam = self.solver.examine(&frame.board);
        if exam.solved {
            // First-write-wins in the store makes duplicate deliveries of
            // this step harmless
            self.store.set_solution(&request_id, &frame.board).await?;
            info!("request {}: solution recorded", request_id);
            return Ok(());
        }
        if exam.next.is_empty() {
            // Prune the top frame only; suspended frames below are still
            // open work and ride on as a remainder message
            debug!("request {}: dead branch pruned", request_id);
            if !msg.stack.is_empty() {
                self.transport.publish(msg.encode()).await?;
            }
            return Ok(());
        }

        let children = exam.next.len() as u32;
        // Saturate rather than trust a wire-supplied width to stay small;
        // saturation lands in the linear arm, which never multiplies
        let aggregate_width = width.saturating_mul(1 + children);
        if aggregate_width > self.config.max_parallel_branches {
            self.continue_linear(msg, width, exam.next).await
        } else {
            self.fan_out(msg, aggregate_width, exam.next).await
        }
    }

    /// Push every child onto the remaining stack at the unchanged width and
    /// republish the same message exactly once.
    async fn continue_linear(
        &self,
        mut msg: SearchMessage,
        width: u32,
        children: Vec<Board>,
    ) -> Result<(), SwarmError> {
        debug!(
            "request {}: linear continuation, {} children at width {}",
            msg.solve_request_id,
            children.len(),
            width
        );
        for child in children {
            msg.stack.push(Frame::with_width(child, width));
        }
        self.transport.publish(msg.encode()).await?;
        Ok(())
    }

    /// One brand-new single-frame message per child at the multiplied
    /// width, plus one remainder message iff suspended frames remain below
    /// the popped top.
    async fn fan_out(
        &self,
        msg: SearchMessage,
        aggregate_width: u32,
        children: Vec<Board>,
    ) -> Result<(), SwarmError> {
        debug!(
            "request {}: fan-out into {} paths at width {}",
            msg.solve_request_id,
            children.len(),
            aggregate_width
        );
        for child in children {
            let branch = SearchMessage::rooted(
                msg.solve_request_id.clone(),
                Frame::with_width(child, aggregate_width),
            );
            self.transport.publish(branch.encode()).await?;
        }
        if !msg.stack.is_empty() {
            self.transport.publish(msg.encode()).await?;
        }
        Ok(())
    }

    /// Drain the subscription from a single worker: pull, process, and ack
    /// until the queue comes up empty. Sequential processing means an empty
    /// pull implies no work is left anywhere, which gives single-process
    /// runs and tests a natural exhaustion signal without changing the
    /// protocol.
    pub async fn run_until_idle(&self) -> Result<(), SwarmError> {
        while let Some(delivery) = self.transport.pull().await? {
            self.process(&delivery.payload).await?;
            self.transport.ack(delivery.token).await?;
        }
        Ok(())
    }

    /// Worker loop: pull, process, ack on success. A failed step is left
    /// unacked for the broker to redeliver. Flipping `shutdown` to `true`
    /// stops pulling; a step already in flight still runs to completion.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }
            match self.transport.pull().await {
                Ok(Some(delivery)) => match self.process(&delivery.payload).await {
                    Ok(()) => {
                        if let Err(e) = self.transport.ack(delivery.token).await {
                            warn!("ack failed, step will be redelivered: {}", e);
                        }
                    }
                    Err(e) => {
                        warn!("step failed, leaving message for redelivery: {}", e);
                    }
                },
                Ok(None) => {
                    // Idle: wait for either new work or shutdown
                    tokio::select! {
                        _ = tokio::time::sleep(IDLE_BACKOFF) => {}
                        _ = shutdown.changed() => {}
                    }
                }
                Err(e) => {
                    warn!("pull failed: {}", e);
                    tokio::time::sleep(IDLE_BACKOFF).await;
                }
            }
        }
    }
}
