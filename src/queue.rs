use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::cell::RefCell;

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// The deferred-scheduling seam between the clip and its host event loop.
///
/// `post` must run the task on a *later* turn of the same single-threaded
/// event loop that delivers geometry events, in FIFO order. It must never run
/// the task synchronously from inside `post`: the whole point of the seam is
/// to get recentering out of the call stack of the event that requested it.
pub trait TaskQueue {
    fn post(&self, task: Task);
}

/// A single-threaded FIFO task queue.
///
/// This is the in-crate stand-in for "the next turn of the UI event loop":
/// hosts without an event loop of their own (and the test suite) post work
/// here and drain it with [`MainQueue::run_until_idle`]. Hosts that have a
/// real loop implement [`TaskQueue`] over it instead.
#[derive(Default)]
pub struct MainQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl MainQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Runs queued tasks until the queue is empty, including tasks posted by
    /// the tasks themselves. Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0usize;
        loop {
            // Release the borrow before running: tasks may post more work.
            let task = self.tasks.borrow_mut().pop_front();
            let Some(task) = task else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl TaskQueue for MainQueue {
    fn post(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

impl core::fmt::Debug for MainQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MainQueue").field("len", &self.len()).finish()
    }
}
