//! Background Task Dispatcher (spec §4.5)
//!
//! Tasks for the same user must run in the order they were enqueued and
//! never concurrently with each other (so two syncs for one user can't race
//! the Allocation Engine against itself); tasks for different users run
//! fully in parallel. Implemented the way the teacher's orchestrator
//! composes one loop per unit of concurrency, except the unit here is "one
//! `mpsc` consumer task per user" rather than one tick loop for the whole
//! simulation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::transaction::Transaction;

/// One unit of background work (spec §4.5).
#[derive(Debug, Clone)]
pub enum Task {
    ProcessGoalsAfterConnection {
        connection_id: Uuid,
    },
    AllocateIncomeFromSync {
        connection_id: Uuid,
        new_income_set: Vec<Transaction>,
        previous_last_sync: Option<DateTime<Utc>>,
    },
    AllocateIncomeToGoals {
        manual_transaction_id: Uuid,
        amount: Decimal,
    },
}

/// A task handler executes one [`Task`] to completion, opening its own DB
/// session (spec §4.5: "each task gets its own database session — tasks
/// never share a transaction"). Failures are logged by the dispatcher and
/// never retried automatically.
#[async_trait::async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, user_id: Uuid, task: Task) -> Result<(), String>;
}

/// Per-user FIFO task queue keyed by user id. Each user gets exactly one
/// consumer loop, spawned lazily on first enqueue and torn down when its
/// channel is dropped and drained.
pub struct Dispatcher<H: TaskHandler + 'static> {
    handler: Arc<H>,
    senders: Arc<DashMap<Uuid, mpsc::Sender<Task>>>,
}

impl<H: TaskHandler + 'static> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            senders: self.senders.clone(),
        }
    }
}

const QUEUE_CAPACITY: usize = 256;

impl<H: TaskHandler + 'static> Dispatcher<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            senders: Arc::new(DashMap::new()),
        }
    }

    /// Enqueue a task for `user_id`, spawning its consumer loop if this is
    /// the first task seen for that user.
    pub fn enqueue(&self, user_id: Uuid, task: Task) {
        let sender = self
            .senders
            .entry(user_id)
            .or_insert_with(|| self.spawn_consumer(user_id))
            .clone();

        if let Err(err) = sender.try_send(task) {
            warn!(%user_id, error = %err, "task queue full or consumer gone, dropping task");
        }
    }

    fn spawn_consumer(&self, user_id: Uuid) -> mpsc::Sender<Task> {
        let (tx, mut rx) = mpsc::channel::<Task>(QUEUE_CAPACITY);
        let handler = self.handler.clone();
        let senders = self.senders.clone();

        let _join: JoinHandle<()> = tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                info!(%user_id, ?task, "dispatching task");
                if let Err(err) = handler.handle(user_id, task.clone()).await {
                    error!(%user_id, ?task, error = %err, "task failed, no automatic retry");
                }
            }
            senders.remove(&user_id);
        });

        tx
    }
}
