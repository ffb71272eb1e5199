//! Deferred-execution abstraction.
//!
//! Controllers never call platform timer APIs directly: they schedule work
//! through this trait, which the wasm layer implements over
//! `requestAnimationFrame`/`setTimeout` and tests implement with a manually
//! advanced clock. Every scheduled task carries an explicit cancellation
//! handle; re-scheduling a debounce cancels the pending task first
//! (last-write-wins).

use std::collections::BTreeMap;

/// Cancellation handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Build an id from a raw counter value. Custom [`Scheduler`]
    /// implementations mint their ids through this.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Work scheduled for later execution on the single-threaded event loop.
pub type Task = Box<dyn FnMut(f64)>;

/// Cooperative scheduler: one-shot delays and per-frame repetition.
pub trait Scheduler {
    /// Run `task` once, roughly `delay_ms` from now. The task receives the
    /// timestamp it actually ran at.
    fn schedule_once(&mut self, delay_ms: f64, task: Task) -> TaskId;

    /// Run `task` every frame until cancelled.
    fn schedule_repeating(&mut self, task: Task) -> TaskId;

    /// Cancel a pending task. Cancelling an already-fired or unknown id is a
    /// no-op.
    fn cancel(&mut self, id: TaskId);
}

enum Pending {
    Once { due: f64, task: Task },
    Repeating { task: Task },
}

/// Test scheduler with a manually advanced clock.
///
/// `advance` moves time forward, firing due one-shots (in due order) and
/// running every repeating task once per `frame` tick.
#[derive(Default)]
pub struct ManualScheduler {
    now: f64,
    next_id: u64,
    pending: BTreeMap<TaskId, Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance the clock, firing one-shot tasks that become due.
    pub fn advance(&mut self, delta_ms: f64) {
        self.now += delta_ms;
        let due: Vec<TaskId> = self
            .pending
            .iter()
            .filter_map(|(id, p)| match p {
                Pending::Once { due, .. } if *due <= self.now => Some(*id),
                _ => None,
            })
            .collect();
        for id in due {
            if let Some(Pending::Once { mut task, .. }) = self.pending.remove(&id) {
                task(self.now);
            }
        }
    }

    /// Simulate one animation frame: advances the clock and runs every
    /// repeating task once.
    pub fn frame(&mut self, frame_ms: f64) {
        self.advance(frame_ms);
        let ids: Vec<TaskId> = self.pending.keys().copied().collect();
        for id in ids {
            if let Some(Pending::Repeating { task }) = self.pending.get_mut(&id) {
                task(self.now);
            }
        }
    }

    /// Number of tasks still pending (for assertions).
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&mut self, delay_ms: f64, task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.insert(
            id,
            Pending::Once {
                due: self.now + delay_ms,
                task,
            },
        );
        id
    }

    fn schedule_repeating(&mut self, task: Task) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.insert(id, Pending::Repeating { task });
        id
    }

    fn cancel(&mut self, id: TaskId) {
        self.pending.remove(&id);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_once_fires_after_delay() {
        let mut sched = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        sched.schedule_once(100.0, Box::new(move |_| flag.set(true)));

        sched.advance(50.0);
        assert!(!fired.get());
        sched.advance(60.0);
        assert!(fired.get());
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut sched = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let id = sched.schedule_once(10.0, Box::new(move |_| flag.set(true)));
        sched.cancel(id);
        sched.advance(100.0);
        assert!(!fired.get());
    }

    #[test]
    fn test_repeating_runs_every_frame() {
        let mut sched = ManualScheduler::new();
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let id = sched.schedule_repeating(Box::new(move |_| counter.set(counter.get() + 1)));

        sched.frame(16.0);
        sched.frame(16.0);
        sched.frame(16.0);
        assert_eq!(count.get(), 3);

        sched.cancel(id);
        sched.frame(16.0);
        assert_eq!(count.get(), 3);
    }
}
