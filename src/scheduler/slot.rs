//! Latest-value handoff slot
//!
//! Holds at most one value. Publishing overwrites whatever is there, so a
//! reader always sees the newest value and never a backlog. Writers only
//! hold the lock for the swap, never while the reader is working.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Result of waiting on a slot with a deadline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotWait<T> {
    Value(T),
    TimedOut,
    Closed,
}

#[derive(Debug)]
struct SlotState<T> {
    value: Option<T>,
    closed: bool,
}

#[derive(Debug)]
pub struct LatestSlot<T> {
    state: Mutex<SlotState<T>>,
    ready: Condvar,
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState { value: None, closed: false }),
            ready: Condvar::new(),
        }
    }

    pub fn with_value(value: T) -> Self {
        let slot = Self::new();
        slot.state.lock().value = Some(value);
        slot
    }

    /// Replace the held value. Returns false if the slot is closed.
    pub fn publish(&self, value: T) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.value = Some(value);
        self.ready.notify_all();
        true
    }

    /// Remove and return the value, blocking until one exists.
    /// Returns None once the slot is closed.
    pub fn take(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return None;
            }
            if let Some(value) = state.value.take() {
                return Some(value);
            }
            self.ready.wait(&mut state);
        }
    }

    /// Like [`take`](Self::take) but gives up after `timeout`
    pub fn take_timeout(&self, timeout: Duration) -> SlotWait<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return SlotWait::Closed;
            }
            if let Some(value) = state.value.take() {
                return SlotWait::Value(value);
            }
            if self.ready.wait_until(&mut state, deadline).timed_out() {
                if state.closed {
                    return SlotWait::Closed;
                }
                return state.value.take().map_or(SlotWait::TimedOut, SlotWait::Value);
            }
        }
    }

    /// Close the slot and wake every waiter
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl<T: Clone> LatestSlot<T> {
    /// Copy of the held value without removing it
    pub fn peek(&self) -> Option<T> {
        self.state.lock().value.clone()
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_publish_overwrites() {
        let slot = LatestSlot::new();
        slot.publish(1);
        slot.publish(2);
        assert_eq!(slot.peek(), Some(2));
        assert_eq!(slot.take(), Some(2));
        assert_eq!(slot.peek(), None);
    }

    #[test]
    fn test_peek_keeps_value() {
        let slot = LatestSlot::with_value("goal");
        assert_eq!(slot.peek(), Some("goal"));
        assert_eq!(slot.peek(), Some("goal"));
    }

    #[test]
    fn test_take_timeout_without_value() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        assert_eq!(slot.take_timeout(Duration::from_millis(10)), SlotWait::TimedOut);
    }

    #[test]
    fn test_take_blocks_until_publish() {
        let slot = Arc::new(LatestSlot::new());
        let writer = Arc::clone(&slot);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.publish(42);
        });
        assert_eq!(slot.take(), Some(42));
        handle.join().unwrap();
    }

    #[test]
    fn test_close_wakes_waiter() {
        let slot: Arc<LatestSlot<u32>> = Arc::new(LatestSlot::new());
        let closer = Arc::clone(&slot);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            closer.close();
        });
        assert_eq!(slot.take(), None);
        handle.join().unwrap();
        assert!(!slot.publish(1));
        assert_eq!(slot.take_timeout(Duration::from_millis(1)), SlotWait::Closed);
    }
}
