use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

/// Cancellation token shared between the scheduler and whoever scheduled the task.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevents the task from running if it has not fired yet.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

pub trait Scheduler {
    /// Runs `task` once after `delay` on the caller's event loop.
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle;
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
    handle: TaskHandle,
}

/// Scheduler with a virtual clock that only moves when told to.
///
/// Tasks scheduled from inside a running task are picked up by the same
/// [`advance`](Self::advance) call if they fall due within its window.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    seq: Cell<u64>,
    queue: RefCell<Vec<Pending>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks waiting, cancelled ones included.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Moves the clock forward by `by`, firing every task that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        while let Some(next) = self.pop_due(target) {
            self.now.set(next.due);
            if !next.handle.is_cancelled() {
                (next.task)();
            }
        }
        self.now.set(target);
    }

    fn pop_due(&self, until: Duration) -> Option<Pending> {
        let mut queue = self.queue.borrow_mut();
        let idx = queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= until)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        Some(queue.remove(idx))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TaskHandle {
        let handle = TaskHandle::new();
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.queue.borrow_mut().push(Pending {
            due: self.now.get() + delay,
            seq,
            task,
            handle: handle.clone(),
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_due_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, name) in [(300, "c"), (100, "a"), (200, "b")] {
            let log = log.clone();
            scheduler.schedule(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(name)),
            );
        }

        scheduler.advance(Duration::from_millis(150));
        assert_eq!(*log.borrow(), vec!["a"]);

        scheduler.advance(Duration::from_millis(150));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.now(), Duration::from_millis(300));
    }

    #[test]
    fn test_cancelled_task_does_not_fire() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        let handle = scheduler.schedule(Duration::from_millis(10), Box::new(move || flag.set(true)));
        handle.cancel();

        scheduler.advance(Duration::from_secs(1));
        assert!(!fired.get());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_nested_schedule_within_window() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));

        let inner_scheduler = scheduler.clone();
        let inner_count = count.clone();
        scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                inner_count.set(inner_count.get() + 1);
                let c = inner_count.clone();
                inner_scheduler.schedule(
                    Duration::from_millis(100),
                    Box::new(move || c.set(c.get() + 1)),
                );
            }),
        );

        scheduler.advance(Duration::from_millis(250));
        assert_eq!(count.get(), 2);
    }
}
