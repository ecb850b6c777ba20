//! Single-threaded event queue with a virtual clock
//!
//! External events are handled in arrival order. Timers fire when the clock
//! is advanced past their due time; timers due at the same instant fire in
//! the order they were scheduled.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use super::event::{Event, Timer};

/// Handle to a scheduled timer, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Pending events plus scheduled timers
#[derive(Debug, Default)]
pub struct EventQueue {
    now_ms: u64,
    next_seq: u64,
    events: VecDeque<Event>,
    due: BinaryHeap<Reverse<(u64, TimerId)>>,
    timers: BTreeMap<TimerId, Timer>,
}

impl EventQueue {
    /// Empty queue at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Enqueue an event for handling after those already queued
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Next queued event
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Whether any event is waiting
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Schedule `timer` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, timer: Timer) -> TimerId {
        let id = TimerId(self.next_seq);
        self.next_seq += 1;
        self.due
            .push(Reverse((self.now_ms.saturating_add(delay_ms), id)));
        self.timers.insert(id, timer);
        id
    }

    /// Cancel a timer; cancelling a fired or unknown timer does nothing
    pub fn cancel(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }

    /// Number of timers still waiting to fire
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Due time of the earliest live timer
    #[must_use]
    pub fn next_due(&mut self) -> Option<u64> {
        self.discard_cancelled();
        self.due.peek().map(|Reverse((at, _))| *at)
    }

    /// Pop the earliest live timer due at or before `until`, moving the clock to it
    pub fn pop_due(&mut self, until: u64) -> Option<Timer> {
        self.discard_cancelled();
        let Reverse((at, _)) = *self.due.peek()?;
        if at > until {
            return None;
        }
        let Reverse((at, id)) = self.due.pop()?;
        self.now_ms = self.now_ms.max(at);
        self.timers.remove(&id)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse((_, id))) = self.due.peek() {
            if self.timers.contains_key(id) {
                break;
            }
            self.due.pop();
        }
    }
}

/// Delay for a host timer due at `due_ms` when the host clock reads
/// `now_ms`: zero when overdue, capped at `i32::MAX`
#[must_use]
pub fn host_delay(due_ms: u64, now_ms: u64) -> i32 {
    i32::try_from(due_ms.saturating_sub(now_ms)).unwrap_or(i32::MAX)
}
