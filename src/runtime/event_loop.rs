use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::foundation::core::Millis;

/// Handle to a scheduled task, usable for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Deterministic single-threaded task queue over a virtual millisecond clock.
///
/// Determinism rule: tasks run in `(due, scheduling order)` order, so two tasks due at the same
/// instant run in the order they were scheduled. Nothing runs until the owner pops it.
#[derive(Debug)]
pub struct EventQueue<T> {
    now: Millis,
    next_seq: u64,
    ready: BinaryHeap<Reverse<(Millis, u64)>>,
    pending: BTreeMap<u64, T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            ready: BinaryHeap::new(),
            pending: BTreeMap::new(),
        }
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run `task` after `delay` milliseconds.
    pub fn schedule(&mut self, delay: Millis, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now.saturating_add(delay);
        self.ready.push(Reverse((due, seq)));
        self.pending.insert(seq, task);
        TimerId(seq)
    }

    /// Cancel a scheduled task. Returns whether it was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id.0).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id.0)
    }

    /// Due time of the earliest live task.
    pub fn next_due(&mut self) -> Option<Millis> {
        self.discard_cancelled();
        self.ready.peek().map(|Reverse((due, _))| *due)
    }

    /// Pop the earliest task due at or before `deadline`, moving the clock to its due time.
    pub fn pop_due(&mut self, deadline: Millis) -> Option<(TimerId, T)> {
        self.discard_cancelled();
        let &Reverse((due, seq)) = self.ready.peek()?;
        if due > deadline {
            return None;
        }
        self.ready.pop();
        self.now = self.now.max(due);
        let task = self.pending.remove(&seq)?;
        Some((TimerId(seq), task))
    }

    /// Move the clock forward without running anything. The clock never goes backwards.
    pub fn advance_to(&mut self, t: Millis) {
        self.now = self.now.max(t);
    }

    fn discard_cancelled(&mut self) {
        while let Some(&Reverse((_, seq))) = self.ready.peek() {
            if self.pending.contains_key(&seq) {
                break;
            }
            self.ready.pop();
        }
    }
}

/// A single-occupancy timer: arming it cancels whatever it held before.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerSlot(Option<TimerId>);

impl TimerSlot {
    pub fn arm<T>(&mut self, queue: &mut EventQueue<T>, delay: Millis, task: T) -> TimerId {
        self.clear(queue);
        let id = queue.schedule(delay, task);
        self.0 = Some(id);
        id
    }

    pub fn clear<T>(&mut self, queue: &mut EventQueue<T>) {
        if let Some(id) = self.0.take() {
            queue.cancel(id);
        }
    }

    pub fn is_armed<T>(&self, queue: &EventQueue<T>) -> bool {
        self.0.is_some_and(|id| queue.is_pending(id))
    }

    /// Forget the held timer once it has fired.
    pub fn fired(&mut self, id: TimerId) {
        if self.0 == Some(id) {
            self.0 = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/event_loop.rs"]
mod tests;
