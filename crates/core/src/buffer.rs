// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded, newest-first event buffer with id de-duplication.

use std::collections::{HashSet, VecDeque};

use crate::event::ValidationEvent;

/// Default number of events retained.
pub const DEFAULT_CAPACITY: usize = 100;

/// How many ids are remembered per retained event. Evicted events stay
/// "seen" for a while so a late poll cannot resurrect them.
const SEEN_FACTOR: usize = 10;

/// In-memory ring of recent events, newest first.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    capacity: usize,
    events: VecDeque<ValidationEvent>,
    seen: HashSet<String>,
    seen_order: VecDeque<String>,
}

impl EventBuffer {
    /// Create a buffer holding at most `capacity` events (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        EventBuffer {
            capacity,
            events: VecDeque::with_capacity(capacity),
            seen: HashSet::new(),
            seen_order: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether an event with this id has been accepted recently.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Insert an event at the front.
    ///
    /// Returns `false` (and leaves the buffer untouched) if the id was
    /// already seen.
    pub fn push(&mut self, event: ValidationEvent) -> bool {
        if self.seen.contains(&event.id) {
            return false;
        }

        self.remember(event.id.clone());
        self.events.push_front(event);
        self.events.truncate(self.capacity);
        true
    }

    /// The newest event, if any.
    pub fn latest(&self) -> Option<&ValidationEvent> {
        self.events.front()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationEvent> {
        self.events.iter()
    }

    /// Copy of the retained events, newest first.
    pub fn snapshot(&self) -> Vec<ValidationEvent> {
        self.events.iter().cloned().collect()
    }

    /// Drop all events and forget every seen id.
    pub fn clear(&mut self) {
        self.events.clear();
        self.seen.clear();
        self.seen_order.clear();
    }

    fn remember(&mut self, id: String) {
        self.seen.insert(id.clone());
        self.seen_order.push_back(id);

        let limit = self.capacity.saturating_mul(SEEN_FACTOR);
        while self.seen_order.len() > limit {
            if let Some(old) = self.seen_order.pop_front() {
                self.seen.remove(&old);
            }
        }
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
