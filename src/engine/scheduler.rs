//! Scheduler capability.
//!
//! Root contexts receive a scheduler when they are created; which one is
//! decided by [`crate::config::SchedulerKind`], never by probing the host.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;
use std::rc::Rc;

use crate::config::SchedulerKind;

/// Unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Something that runs tasks on behalf of a root context.
pub trait Scheduler {
    fn schedule(&self, task: Task);

    /// Run queued tasks, returning how many ran.
    fn flush(&self) -> usize {
        0
    }

    /// Tasks waiting for the next flush.
    fn pending(&self) -> usize {
        0
    }
}

/// Runs every task as soon as it is scheduled.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, task: Task) {
        task();
    }
}

/// Queues tasks until the host calls [`Scheduler::flush`] (once per frame).
///
/// Tasks scheduled while a flush is running wait for the next flush.
#[derive(Default)]
pub struct FrameScheduler {
    queue: RefCell<VecDeque<Task>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for FrameScheduler {
    fn schedule(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }

    fn flush(&self) -> usize {
        let tasks = mem::take(&mut *self.queue.borrow_mut());
        let count = tasks.len();
        for task in tasks {
            task();
        }
        if count > 0 {
            tracing::trace!(count, "flushed frame tasks");
        }
        count
    }

    fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Build the scheduler selected by configuration.
pub fn scheduler_for(kind: SchedulerKind) -> Rc<dyn Scheduler> {
    match kind {
        SchedulerKind::Immediate => Rc::new(ImmediateScheduler),
        SchedulerKind::Frame => Rc::new(FrameScheduler::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_immediate_runs_inline() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        ImmediateScheduler.schedule(Box::new(move || count_clone.set(count_clone.get() + 1)));
        assert_eq!(count.get(), 1);
        assert_eq!(ImmediateScheduler.pending(), 0);
    }

    #[test]
    fn test_frame_defers_until_flush() {
        let scheduler = FrameScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            scheduler.schedule(Box::new(move || log.borrow_mut().push(i)));
        }
        assert_eq!(scheduler.pending(), 3);
        assert!(log.borrow().is_empty());

        assert_eq!(scheduler.flush(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert_eq!(scheduler.flush(), 0);
    }

    #[test]
    fn test_frame_reschedule_waits_for_next_flush() {
        let scheduler = Rc::new(FrameScheduler::new());
        let inner = scheduler.clone();
        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();

        scheduler.schedule(Box::new(move || {
            inner.schedule(Box::new(move || ran_clone.set(true)));
        }));

        assert_eq!(scheduler.flush(), 1);
        assert!(!ran.get());
        assert_eq!(scheduler.flush(), 1);
        assert!(ran.get());
    }

    #[test]
    fn test_scheduler_for_kind() {
        let frame = scheduler_for(SchedulerKind::Frame);
        frame.schedule(Box::new(|| {}));
        assert_eq!(frame.pending(), 1);

        let immediate = scheduler_for(SchedulerKind::Immediate);
        immediate.schedule(Box::new(|| {}));
        assert_eq!(immediate.pending(), 0);
    }
}
