//! Deferred task registry
//!
//! Delayed work (the staggered lily pad bursts) is queued here instead of in
//! free-floating platform timers. The registry belongs to the scene, so when
//! the scene goes away its pending tasks go with it.

use serde::{Deserialize, Serialize};

/// Handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<T> {
    id: TimerId,
    due_ms: f64,
    task: T,
}

/// Tasks waiting for a deadline, fired in deadline order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerRegistry<T> {
    entries: Vec<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> TimerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire once `now >= due_ms`
    pub fn schedule(&mut self, due_ms: f64, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, due_ms, task });
        id
    }

    /// Drop a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every task due at `now_ms`, earliest first.
    /// Ties keep scheduling order.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<T> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.due_ms <= now_ms {
                due.push(entry);
            } else {
                pending.push(entry);
            }
        }
        self.entries = pending;

        due.sort_by(|a, b| {
            a.due_ms
                .partial_cmp(&b.due_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.id.0.cmp(&b.id.0))
        });
        due.into_iter().map(|e| e.task).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_due_in_deadline_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(300.0, "c");
        timers.schedule(0.0, "a");
        timers.schedule(150.0, "b");

        assert_eq!(timers.take_due(0.0), vec!["a"]);
        assert_eq!(timers.len(), 2);
        assert!(timers.take_due(100.0).is_empty());
        assert_eq!(timers.take_due(1000.0), vec!["b", "c"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_ties_keep_schedule_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(10.0, 1);
        timers.schedule(10.0, 2);
        timers.schedule(10.0, 3);
        assert_eq!(timers.take_due(10.0), vec![1, 2, 3]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerRegistry::new();
        let a = timers.schedule(10.0, 'a');
        timers.schedule(20.0, 'b');
        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.take_due(100.0), vec!['b']);

        timers.schedule(5.0, 'c');
        timers.cancel_all();
        assert!(timers.take_due(100.0).is_empty());
    }
}
