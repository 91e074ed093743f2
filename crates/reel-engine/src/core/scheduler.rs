//! Virtual-clock timer queue.
//!
//! Each phase instance owns one `Scheduler` over its own private timer enum,
//! so dropping the instance drops every timer it ever scheduled. Nothing in
//! here reads wall time: the owner moves the clock forward with the fixed step
//! it receives from the runner, then drains due timers one at a time.
//!
//! ```ignore
//! scheduler.advance(dt);
//! while let Some(timer) = scheduler.next_due() {
//!     // react, possibly scheduling or cancelling more timers
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use super::time::Millis;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Ordered one-shot timers keyed by `(due, sequence)`.
#[derive(Debug)]
pub struct Scheduler<E> {
    /// Current time. Moves to each timer's due instant as it fires.
    now: Millis,
    /// Time the clock is allowed to reach during the current drain.
    horizon: Millis,
    next_seq: u64,
    queue: BTreeMap<(Millis, u64), E>,
    /// sequence -> due, for cancellation by handle.
    due_by_seq: HashMap<u64, Millis>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now: 0,
            horizon: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
            due_by_seq: HashMap::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedule `event` to fire `delay` ms from now.
    /// Timers due at the same instant fire in the order they were scheduled.
    pub fn schedule(&mut self, delay: Millis, event: E) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, seq), event);
        self.due_by_seq.insert(seq, due);
        TimerId(seq)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// already cancelled; either way the timer will not fire afterwards.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_seq.remove(&id.0) {
            Some(due) => self.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    /// Cancel everything. Returns how many timers were still pending.
    pub fn cancel_all(&mut self) -> usize {
        let pending = self.queue.len();
        self.queue.clear();
        self.due_by_seq.clear();
        pending
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.due_by_seq.contains_key(&id.0)
    }

    /// Allow the clock to move `dt` further on the next drain.
    pub fn advance(&mut self, dt: Millis) {
        self.horizon = self.horizon.max(self.now).saturating_add(dt);
    }

    /// Pop the earliest timer due within the current horizon.
    ///
    /// The clock jumps to that timer's due instant before it is returned, so
    /// anything the handler schedules is anchored to when the timer was due,
    /// not to the end of the frame. Returns `None` once nothing else is due,
    /// leaving the clock at the horizon.
    pub fn next_due(&mut self) -> Option<E> {
        let key = match self.queue.keys().next() {
            Some(&(due, seq)) if due <= self.horizon => (due, seq),
            _ => {
                self.now = self.horizon;
                return None;
            }
        };
        self.due_by_seq.remove(&key.1);
        self.now = self.now.max(key.0);
        self.queue.remove(&key)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>) -> Vec<&'static str> {
        std::iter::from_fn(|| s.next_due()).collect()
    }

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(30, "c");
        s.schedule(10, "a");
        s.schedule(20, "b");

        s.advance(25);
        assert_eq!(drain(&mut s), vec!["a", "b"]);
        assert_eq!(s.now(), 25);

        s.advance(5);
        assert_eq!(drain(&mut s), vec!["c"]);
        assert!(s.is_empty());
    }

    #[test]
    fn same_instant_keeps_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule(10, "first");
        s.schedule(10, "second");
        s.advance(10);
        assert_eq!(drain(&mut s), vec!["first", "second"]);
    }

    #[test]
    fn cancel_pending_prevents_firing() {
        let mut s = Scheduler::new();
        let id = s.schedule(10, "never");
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert!(!s.is_pending(id));
        s.advance(100);
        assert!(drain(&mut s).is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = Scheduler::new();
        let id = s.schedule(10, "x");
        assert!(s.cancel(id));
        assert!(!s.cancel(id));

        let fired = s.schedule(5, "y");
        s.advance(5);
        assert_eq!(drain(&mut s), vec!["y"]);
        assert!(!s.cancel(fired));
    }

    #[test]
    fn handler_scheduling_is_anchored_to_due_time() {
        let mut s: Scheduler<u32> = Scheduler::new();
        s.schedule(40, 1);
        // One big frame: the chained timer must land at 80, not at 100 + 40.
        s.advance(100);
        let mut fired_at = Vec::new();
        while let Some(n) = s.next_due() {
            fired_at.push(s.now());
            if n < 3 {
                s.schedule(40, n + 1);
            }
        }
        assert_eq!(fired_at, vec![40, 80]);
        assert_eq!(s.now(), 100);

        s.advance(20);
        assert_eq!(s.next_due(), Some(3));
        assert_eq!(s.now(), 120);
    }

    #[test]
    fn zero_delay_fires_on_next_drain() {
        let mut s = Scheduler::new();
        s.advance(0);
        s.schedule(0, "now");
        assert_eq!(drain(&mut s), vec!["now"]);
    }

    #[test]
    fn cancel_all_reports_pending() {
        let mut s = Scheduler::new();
        s.schedule(1, "a");
        let id = s.schedule(2, "b");
        assert_eq!(s.cancel_all(), 2);
        assert!(!s.cancel(id));
        s.advance(10);
        assert!(drain(&mut s).is_empty());
    }
}
