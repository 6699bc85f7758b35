//! Deterministic timers for the page.
//!
//! The host owns real time: it calls [`Scheduler::advance_to`] with a
//! monotonic millisecond reading and asks [`Scheduler::next_due`] when to
//! wake up next. Tests move the clock by hand.

use std::collections::BTreeMap;

use crate::components::notification::NoticeId;
use crate::forms::FormKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    CompleteSubmission(FormKind),
    DismissNotice(NoticeId),
    /// Next animation frame for the counter at this index.
    CounterFrame(usize),
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_id: u64,
    queue: BTreeMap<(u64, TaskId), Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Moves the clock forward. Readings older than the current time are
    /// ignored.
    pub fn advance_to(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    pub fn schedule(&mut self, delay_ms: u64, task: Task) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now.saturating_add(delay_ms), id), task);
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let key = self.queue.keys().find(|(_, task_id)| *task_id == id).copied();
        match key {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// Removes and returns every task due at the current time, earliest
    /// first, ties in scheduling order.
    pub fn take_due(&mut self) -> Vec<Task> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_scheduled(&self, predicate: impl Fn(&Task) -> bool) -> bool {
        self.queue.values().any(predicate)
    }
}
