use std::collections::VecDeque;
use std::fmt::Debug;

/// An event stamped with its arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<E> {
    pub seq: u64,
    pub payload: E,
}

/// Single-threaded FIFO of UI events.
///
/// Handlers run one event to completion before the next is popped. Events
/// emitted while a handler is running are queued behind it instead of being
/// dispatched re-entrantly.
#[derive(Debug)]
pub struct EventBus<E> {
    queue: VecDeque<Event<E>>,
    next_seq: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            next_seq: 0,
        }
    }
}

impl<E: Debug> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, payload: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(seq, ?payload, "event queued");
        self.queue.push_back(Event { seq, payload });
        seq
    }

    pub fn pop(&mut self) -> Option<Event<E>> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        self.queue.drain(..).collect()
    }
}
