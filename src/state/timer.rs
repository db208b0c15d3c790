//! Timer Queue - Cooperative single-threaded scheduling
//!
//! Every state transition of a typewriter is a delayed callback on a
//! [`TimerQueue`]. The queue keeps virtual time in milliseconds: the host
//! advances it (by real elapsed time in a terminal loop, by exact amounts in
//! tests) and due callbacks fire in deadline order on the caller's thread.
//!
//! # Pattern
//!
//! - `schedule()` returns a [`TimerId`]; `cancel()` on any id is always safe
//! - Callbacks may schedule or cancel timers while the queue is advancing
//! - A zero-delay timer scheduled by a callback waits for the next advance,
//!   so a chain of zero delays moves one step per advance and never spins
//! - A [`TimerSlot`] owns at most one pending timer and cancels the previous
//!   one before holding a new one
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use spark_typewriter::state::timer::TimerQueue;
//!
//! let queue = TimerQueue::new();
//! let fired = Rc::new(Cell::new(false));
//! let fired_clone = fired.clone();
//! queue.schedule(100, move || fired_clone.set(true));
//!
//! queue.advance(99);
//! assert!(!fired.get());
//! queue.advance(1);
//! assert!(fired.get());
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

// =============================================================================
// TIMER ID
// =============================================================================

/// Identifier of a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

type Callback = Box<dyn FnOnce()>;

struct Entry {
    callback: Callback,
    /// Scheduled with zero delay.
    immediate: bool,
}

// =============================================================================
// QUEUE
// =============================================================================

#[derive(Default)]
struct QueueInner {
    /// Current virtual time (ms).
    now: u64,
    /// Monotonic id source; doubles as FIFO tiebreak for equal deadlines.
    next_id: u64,
    /// Pending callbacks keyed by (deadline, id).
    entries: BTreeMap<(u64, u64), Entry>,
    /// id -> deadline, for cancellation.
    deadlines: HashMap<u64, u64>,
}

/// Shared handle to a virtual-time timer queue.
///
/// Cloning is cheap and every clone refers to the same queue. The queue is
/// `!Send`; all timers run on the thread that advances it.
#[derive(Clone, Default)]
pub struct TimerQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimerQueue")
            .field("now", &inner.now)
            .field("pending", &inner.entries.len())
            .finish()
    }
}

impl TimerQueue {
    /// Create an empty queue at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.inner.borrow().now
    }

    /// Schedule `callback` to run `delay_ms` after the current time.
    ///
    /// A zero delay fires on the next `advance()`, never synchronously.
    pub fn schedule(&self, delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let deadline = inner.now.saturating_add(delay_ms);
        let entry = Entry { callback: Box::new(callback), immediate: delay_ms == 0 };
        inner.entries.insert((deadline, id), entry);
        inner.deadlines.insert(id, deadline);
        TimerId(id)
    }

    /// Cancel a pending timer.
    ///
    /// Returns true if a pending timer was removed. Cancelling a timer that
    /// already fired, was already cancelled, or never existed is a no-op.
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.deadlines.remove(&id.0) {
            Some(deadline) => inner.entries.remove(&(deadline, id.0)).is_some(),
            None => false,
        }
    }

    /// Check whether a timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner.borrow().deadlines.contains_key(&id.0)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<u64> {
        self.inner.borrow().entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Advance time by `ms`, firing every timer that becomes due.
    ///
    /// Returns the number of callbacks fired.
    pub fn advance(&self, ms: u64) -> usize {
        let target = self.now().saturating_add(ms);
        self.advance_to(target)
    }

    /// Advance time to the absolute `target` (no-op if it lies in the past).
    ///
    /// Timers fire in deadline order and the clock reads each timer's own
    /// deadline while its callback runs, so timers scheduled from a callback
    /// are placed relative to that deadline and fire in the same call if they
    /// fall before `target`. Zero-delay timers scheduled during this call are
    /// left for the next one.
    pub fn advance_to(&self, target: u64) -> usize {
        let watermark = self.inner.borrow().next_id;
        let mut fired = 0;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .entries
                    .iter()
                    .take_while(|((deadline, _), _)| *deadline <= target)
                    .find(|((_, id), entry)| !(entry.immediate && *id >= watermark))
                    .map(|(key, _)| *key);
                match due {
                    Some(key) => {
                        inner.deadlines.remove(&key.1);
                        inner.now = inner.now.max(key.0);
                        inner.entries.remove(&key).map(|entry| entry.callback)
                    }
                    None => {
                        inner.now = inner.now.max(target);
                        None
                    }
                }
            };

            // Borrow released: the callback may schedule or cancel.
            match next {
                Some(callback) => {
                    callback();
                    fired += 1;
                }
                None => return fired,
            }
        }
    }

    /// Drop every pending timer without firing it.
    pub fn clear(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.clear();
        inner.deadlines.clear();
    }
}

// =============================================================================
// TIMER SLOT
// =============================================================================

/// Holder for at most one pending timer.
///
/// `set()` cancels whatever the slot held before, so two ticks for the same
/// owner can never be pending together. `cancel()` is idempotent.
#[derive(Debug)]
pub struct TimerSlot {
    queue: TimerQueue,
    pending: Option<TimerId>,
}

impl TimerSlot {
    /// Create an empty slot on `queue`.
    pub fn new(queue: TimerQueue) -> Self {
        Self { queue, pending: None }
    }

    /// Cancel the held timer (if any), then schedule `callback`.
    pub fn set(&mut self, delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerId {
        self.cancel();
        let id = self.queue.schedule(delay_ms, callback);
        self.pending = Some(id);
        id
    }

    /// Cancel the held timer. Safe to call any number of times.
    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            self.queue.cancel(id);
        }
    }

    /// Check whether the held timer is still waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some_and(|id| self.queue.is_pending(id))
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<u64>>>, TimerQueue) {
        (Rc::new(RefCell::new(Vec::new())), TimerQueue::new())
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let (log, queue) = recorder();
        for delay in [30u64, 10, 20] {
            let log = log.clone();
            let q = queue.clone();
            queue.schedule(delay, move || log.borrow_mut().push(q.now()));
        }

        assert_eq!(queue.advance(100), 3);
        assert_eq!(*log.borrow(), vec![10, 20, 30]);
        assert_eq!(queue.now(), 100);
    }

    #[test]
    fn test_equal_deadlines_fire_fifo() {
        let (log, queue) = recorder();
        for tag in 0..3u64 {
            let log = log.clone();
            queue.schedule(5, move || log.borrow_mut().push(tag));
        }
        queue.advance(5);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_delay_is_not_synchronous() {
        let queue = TimerQueue::new();
        let fired = Rc::new(Cell::new(false));
        let fired_clone = fired.clone();
        queue.schedule(0, move || fired_clone.set(true));

        assert!(!fired.get());
        queue.advance(0);
        assert!(fired.get());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let queue = TimerQueue::new();
        let id = queue.schedule(10, || panic!("cancelled timer fired"));

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(!queue.is_pending(id));
        assert_eq!(queue.advance(50), 0);

        // Cancelling after firing is also a no-op.
        let fired = queue.schedule(1, || {});
        queue.advance(1);
        assert!(!queue.cancel(fired));
    }

    #[test]
    fn test_callback_can_reschedule_within_advance() {
        let (log, queue) = recorder();
        let q = queue.clone();
        let log_outer = log.clone();
        queue.schedule(10, move || {
            log_outer.borrow_mut().push(q.now());
            let q_inner = q.clone();
            let log_inner = log_outer.clone();
            q.schedule(10, move || log_inner.borrow_mut().push(q_inner.now()));
        });

        assert_eq!(queue.advance(25), 2);
        assert_eq!(*log.borrow(), vec![10, 20]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_zero_delay_chain_yields_between_advances() {
        fn reschedule(queue: TimerQueue, count: Rc<Cell<u32>>) {
            count.set(count.get() + 1);
            let q = queue.clone();
            queue.schedule(0, move || reschedule(q, count));
        }

        let queue = TimerQueue::new();
        let count = Rc::new(Cell::new(0));
        let (q, c) = (queue.clone(), count.clone());
        queue.schedule(0, move || reschedule(q, c));

        assert_eq!(queue.advance(10), 1);
        assert_eq!(queue.now(), 10);
        assert_eq!(queue.advance(0), 1);
        assert_eq!(queue.advance(1), 1);
        assert_eq!(count.get(), 3);
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_deferred_zero_delay_does_not_block_later_timers() {
        let (log, queue) = recorder();
        let (q, log_first) = (queue.clone(), log.clone());
        queue.schedule(5, move || {
            log_first.borrow_mut().push(q.now());
            let log_zero = log_first.clone();
            q.schedule(0, move || log_zero.borrow_mut().push(0));
        });
        let (q, log_second) = (queue.clone(), log.clone());
        queue.schedule(7, move || log_second.borrow_mut().push(q.now()));

        assert_eq!(queue.advance(10), 2);
        assert_eq!(*log.borrow(), vec![5, 7]);
        assert_eq!(queue.advance(0), 1);
        assert_eq!(*log.borrow(), vec![5, 7, 0]);
    }

    #[test]
    fn test_next_deadline_and_clear() {
        let queue = TimerQueue::new();
        assert_eq!(queue.next_deadline(), None);
        queue.schedule(40, || {});
        queue.schedule(15, || {});
        assert_eq!(queue.next_deadline(), Some(15));

        queue.clear();
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.advance(100), 0);
    }

    #[test]
    fn test_advance_to_past_is_noop() {
        let queue = TimerQueue::new();
        queue.advance(50);
        assert_eq!(queue.advance_to(10), 0);
        assert_eq!(queue.now(), 50);
    }

    #[test]
    fn test_slot_replaces_pending_timer() {
        let queue = TimerQueue::new();
        let count = Rc::new(Cell::new(0));
        let mut slot = TimerSlot::new(queue.clone());

        let c1 = count.clone();
        slot.set(10, move || c1.set(c1.get() + 1));
        let c2 = count.clone();
        slot.set(10, move || c2.set(c2.get() + 10));

        assert_eq!(queue.pending(), 1);
        queue.advance(10);
        assert_eq!(count.get(), 10);
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_slot_cancel_and_drop() {
        let queue = TimerQueue::new();
        let mut slot = TimerSlot::new(queue.clone());
        slot.cancel();
        slot.set(10, || panic!("slot timer fired after cancel"));
        slot.cancel();
        slot.cancel();
        assert_eq!(queue.pending(), 0);

        slot.set(10, || panic!("slot timer fired after drop"));
        drop(slot);
        assert_eq!(queue.advance(20), 0);
    }
}
