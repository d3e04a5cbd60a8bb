//! FIFO mutation queue.
//!
//! A ticket lock: every caller draws a ticket on entry and runs only when
//! its number is served. Callers run one at a time, in arrival order, which
//! removes the lost-update race between overlapping read-modify-write cycles.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Tickets {
    next: u64,
    serving: u64,
}

#[derive(Debug, Default)]
pub(crate) struct MutationQueue {
    tickets: Mutex<Tickets>,
    turn_changed: Condvar,
}

/// Exclusive turn in the queue; the next ticket is served on drop.
#[must_use]
pub(crate) struct QueueTurn<'a> {
    queue: &'a MutationQueue,
}

impl MutationQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Blocks until every earlier caller has finished, then returns the turn.
    pub(crate) fn enter(&self) -> QueueTurn<'_> {
        let mut tickets = self.lock();
        let ticket = tickets.next;
        tickets.next += 1;
        while tickets.serving != ticket {
            tickets = self
                .turn_changed
                .wait(tickets)
                .unwrap_or_else(PoisonError::into_inner);
        }
        QueueTurn { queue: self }
    }

    /// Number of callers holding or waiting for a turn.
    #[cfg(test)]
    pub(crate) fn pending(&self) -> u64 {
        let tickets = self.lock();
        tickets.next - tickets.serving
    }

    fn lock(&self) -> MutexGuard<'_, Tickets> {
        self.tickets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for QueueTurn<'_> {
    fn drop(&mut self) {
        let mut tickets = self.queue.lock();
        tickets.serving += 1;
        drop(tickets);
        self.queue.turn_changed.notify_all();
    }
}
