use mapnav::scheduler::{Scheduler, Task, TaskHandle};
use std::time::Duration;

/// Runs tasks on the current `LocalSet`. Must be used from inside one.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalScheduler;

impl Scheduler for LocalScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let token = handle.clone();
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            if !token.is_cancelled() {
                task();
            }
        });
        handle
    }
}
