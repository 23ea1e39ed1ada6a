//! Timed task queue driven by the main loop.
//!
//! Tasks carry a payload naming the element or notification they affect.
//! The queue never runs anything itself: the owner drains due payloads
//! each frame and applies them, checking that the target still exists.

use std::time::Instant;

#[derive(Debug)]
struct ScheduledTask<T> {
    /// Scheduling order, used to break ties between equal due times.
    seq: u64,
    due: Instant,
    payload: T,
}

/// A set of pending timed tasks.
#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedules `payload` to become due at `due`.
    pub fn schedule(&mut self, due: Instant, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(ScheduledTask { seq, due, payload });
    }

    /// Cancels every task whose payload matches. Returns how many were removed.
    pub fn cancel_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.tasks.len();
        self.tasks.retain(|task| !predicate(&task.payload));
        before - self.tasks.len()
    }

    /// Removes and returns every payload due at or before `now`.
    ///
    /// Payloads come back ordered by due time, ties broken by scheduling
    /// order.
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|task| task.due <= now);
        self.tasks = pending;
        due.sort_by_key(|task| (task.due, task.seq));
        due.into_iter().map(|task| task.payload).collect()
    }

    /// Number of tasks still pending.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_drain_due_in_order() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start + Duration::from_millis(200), "c");
        scheduler.schedule(start + Duration::from_millis(100), "b");
        scheduler.schedule(start, "a");
        scheduler.schedule(start + Duration::from_millis(100), "b2");

        assert_eq!(scheduler.drain_due(start + Duration::from_millis(100)), vec!["a", "b", "b2"]);
        assert_eq!(scheduler.pending(), 1);
        assert!(scheduler.drain_due(start + Duration::from_millis(150)).is_empty());
        assert_eq!(scheduler.drain_due(start + Duration::from_secs(1)), vec!["c"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_where() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(start, 1);
        scheduler.schedule(start, 2);
        scheduler.schedule(start, 3);

        assert_eq!(scheduler.cancel_where(|&n| n != 2), 2);
        assert_eq!(scheduler.cancel_where(|&n| n > 5), 0);
        assert_eq!(scheduler.drain_due(start), vec![2]);
    }
}
