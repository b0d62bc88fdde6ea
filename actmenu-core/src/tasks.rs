//! Deferred work on the thread that owns the menu.
//!
//! Surrogates may only be touched by the owning thread. Updates that must reach
//! them are posted as tasks to a [Scheduler] and run whenever the host drains
//! it; nothing here blocks and nothing can be cancelled.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + 'static>;

/// The owning thread's task queue.
pub trait Scheduler {
    /// Queue a task (fire-and-forget).
    fn post(&self, task: Task);

    /// Run everything queued so far, if the scheduler is driven by the menu host.
    /// Returns the number of tasks run.
    fn run_pending(&self) -> usize {
        0
    }
}

/// FIFO queue drained explicitly with [run_pending](Scheduler::run_pending).
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl Scheduler for TaskQueue {
    fn post(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }

    fn run_pending(&self) -> usize {
        // Tasks posted while draining run in the next round.
        let batch: Vec<Task> = self.tasks.borrow_mut().drain(..).collect();
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}

/// Runs every task right away. For hosts whose mutations already happen on the owning thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn post(&self, task: Task) {
        task();
    }
}
