//! Deferred tasks on the simulation clock
//!
//! Tasks cannot be cancelled. Each one is handed back exactly once, on the
//! first `advance` that reaches its due time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending<T> {
    due: f64,
    seq: u64,
    task: T,
}

/// Delay queue driven by `advance(dt)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<T> {
    now: f64,
    next_seq: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Run `task` after `delay` seconds. Bad delays count as zero.
    pub fn schedule(&mut self, task: T, delay: f32) {
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now + delay as f64,
            seq,
            task,
        });
    }

    /// Move the clock forward and return every due task, oldest due first
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt as f64;
        }

        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.task).collect()
    }
}
