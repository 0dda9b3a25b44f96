//! Integration tests for the Background Task Dispatcher (spec §4.5)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use income_allocator_core::dispatch::{Dispatcher, Task, TaskHandler};
use uuid::Uuid;

struct FlakyHandler {
    succeeded: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
}

#[async_trait]
impl TaskHandler for FlakyHandler {
    async fn handle(&self, _user_id: Uuid, task: Task) -> Result<(), String> {
        match task {
            Task::ProcessGoalsAfterConnection { .. } => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                Err("simulated failure".to_string())
            }
            _ => {
                self.succeeded.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }
}

#[tokio::test]
async fn a_failed_task_does_not_block_subsequent_tasks_for_the_same_user() {
    let succeeded = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let dispatcher = Dispatcher::new(FlakyHandler {
        succeeded: succeeded.clone(),
        failed: failed.clone(),
    });

    let user_id = Uuid::new_v4();
    dispatcher.enqueue(user_id, Task::ProcessGoalsAfterConnection { connection_id: Uuid::new_v4() });
    dispatcher.enqueue(
        user_id,
        Task::AllocateIncomeFromSync {
            connection_id: Uuid::new_v4(),
            new_income_set: Vec::new(),
            previous_last_sync: None,
        },
    );

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(failed.load(Ordering::SeqCst), 1);
    assert_eq!(succeeded.load(Ordering::SeqCst), 1);
}
