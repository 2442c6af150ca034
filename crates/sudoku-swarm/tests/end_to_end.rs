//! Full-protocol tests: submission through queue-driven search to a
//! recorded solution, over the in-memory transport and store.

use std::sync::Arc;
use std::time::Duration;
use sudoku_board::Board;
use sudoku_swarm::{
    MemoryQueue, MemoryStore, QueueTransport, SearchCoordinator, SolveStateStore, SwarmConfig,
};
use tokio::sync::watch;

const PUZZLE: &str =
    "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
const SOLUTION: &str =
    "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

fn swarm(max_parallel_branches: u32) -> (Arc<MemoryQueue>, Arc<MemoryStore>, Arc<SearchCoordinator>) {
    let queue = Arc::new(MemoryQueue::new());
    let store = Arc::new(MemoryStore::new());
    let config = SwarmConfig {
        max_parallel_branches,
        ..SwarmConfig::default()
    };
    let coordinator = Arc::new(SearchCoordinator::new(
        queue.clone(),
        store.clone(),
        config,
    ));
    (queue, store, coordinator)
}

#[tokio::test]
async fn test_submitted_puzzle_is_solved() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (queue, store, coordinator) = swarm(10);

    let request_id = coordinator.submit_puzzle(PUZZLE).await.unwrap();
    coordinator.run_until_idle().await.unwrap();

    let solution = store.get_solution(&request_id).await.unwrap().unwrap();
    assert!(solution.is_complete());
    assert_eq!(solution, Board::from_string(SOLUTION).unwrap());

    // The whole tree was consumed and some work was counted
    assert_eq!(queue.pending().await, 0);
    assert_eq!(queue.in_flight().await, 0);
    assert!(store.examined_board_count(&request_id).await.unwrap() > 0);
}

#[tokio::test]
async fn test_linear_only_search_still_solves() {
    // Budget 1 forbids all fan-out: the entire search runs as one message
    // ping-ponging through the queue
    let (queue, store, coordinator) = swarm(1);

    let request_id = coordinator.submit_puzzle(PUZZLE).await.unwrap();
    coordinator.run_until_idle().await.unwrap();

    let solution = store.get_solution(&request_id).await.unwrap().unwrap();
    assert_eq!(solution, Board::from_string(SOLUTION).unwrap());
    assert_eq!(queue.pending().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_workers_agree_on_one_solution() {
    let (queue, store, coordinator) = swarm(10);
    let request_id = coordinator.submit_puzzle(PUZZLE).await.unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let coordinator = coordinator.clone();
            let shutdown = shutdown_rx.clone();
            tokio::spawn(async move { coordinator.run(shutdown).await })
        })
        .collect();

    // Wait until the tree is fully consumed
    loop {
        if queue.pending().await == 0 && queue.in_flight().await == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    shutdown_tx.send(true).unwrap();
    for worker in workers {
        worker.await.unwrap();
    }

    let solution = store.get_solution(&request_id).await.unwrap().unwrap();
    assert_eq!(solution, Board::from_string(SOLUTION).unwrap());
}

#[tokio::test]
async fn test_redelivery_after_lost_worker_reaches_solution() {
    let (queue, store, coordinator) = swarm(10);
    let request_id = coordinator.submit_puzzle(PUZZLE).await.unwrap();

    // A worker pulls the first message and dies before acking it
    let abandoned = queue.pull().await.unwrap().unwrap();
    drop(abandoned);
    assert_eq!(queue.redeliver_unacked().await, 1);

    coordinator.run_until_idle().await.unwrap();
    let solution = store.get_solution(&request_id).await.unwrap().unwrap();
    assert_eq!(solution, Board::from_string(SOLUTION).unwrap());
}

#[tokio::test]
async fn test_unsolvable_request_records_no_solution() {
    // Valid board, but the blank at (0,0) admits no digit; the tree dies
    // immediately and the request simply never completes
    let (queue, store, coordinator) = swarm(10);
    let dead = concat!(
        " 12      ",
        "345      ",
        "678      ",
        "9        ",
        "         ",
        "         ",
        "         ",
        "         ",
        "         ",
    );

    let request_id = coordinator.submit_puzzle(dead).await.unwrap();
    coordinator.run_until_idle().await.unwrap();

    assert!(store.get_solution(&request_id).await.unwrap().is_none());
    assert_eq!(queue.pending().await, 0);
    assert_eq!(store.examined_board_count(&request_id).await.unwrap(), 1);
}
