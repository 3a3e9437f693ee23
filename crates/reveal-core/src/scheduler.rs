//! Cancellable timers on a simulated monotonic clock.
//!
//! `TimerScheduler` stands in for a page's `setTimeout`/`setInterval` pair.
//! Every timer belongs to the scheduler that created it, so dropping or
//! sweeping the scheduler is enough to guarantee nothing fires afterwards.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use reveal_core::scheduler::{TimerScheduler, TimerTarget};
//! use reveal_core::types::ItemId;
//!
//! let mut timers = TimerScheduler::new();
//! timers.schedule_once(Duration::from_millis(200), TimerTarget::ItemDelay(ItemId(0)));
//! let tick = timers.schedule_every(Duration::from_millis(24), TimerTarget::ItemTick(ItemId(1)));
//!
//! let fired = timers.advance_by(Duration::from_millis(50));
//! assert_eq!(fired.len(), 2); // two ticks, the delay is still pending
//!
//! timers.cancel(tick);
//! assert_eq!(timers.cancel_all(), 1);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ItemId;

/// Handle for a scheduled timer, unique within its scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// What a timer is for; handed back when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "snake_case")]
pub enum TimerTarget {
    /// Settle delay between the raw visibility trigger and activation.
    Settle,
    /// An item's offset from activation has elapsed.
    ItemDelay(ItemId),
    /// One step of a counter's interval.
    ItemTick(ItemId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Once,
    Every { period: Duration, fired: u32 },
}

#[derive(Debug, Clone)]
struct Timer {
    target: TimerTarget,
    /// Origin for periodic deadlines so repeated firings never drift.
    start: Duration,
    deadline: Duration,
    cadence: Cadence,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFiring {
    pub id: TimerId,
    pub target: TimerTarget,
    /// Clock value at which the timer was due.
    pub at: Duration,
}

/// Set of delayed and periodic timers driven by explicit clock advances.
#[derive(Debug, Default)]
pub struct TimerScheduler {
    now: Duration,
    next_id: u64,
    timers: HashMap<TimerId, Timer>,
    /// Due order: deadline first, then creation order.
    queue: BTreeSet<(Duration, TimerId)>,
    fired: u64,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current clock value.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire once, `delay` from now.
    pub fn schedule_once(&mut self, delay: Duration, target: TimerTarget) -> TimerId {
        self.insert(target, delay, Cadence::Once)
    }

    /// Fire every `period`, first at `now + period`, until cancelled.
    ///
    /// A zero period is treated as one millisecond.
    pub fn schedule_every(&mut self, period: Duration, target: TimerTarget) -> TimerId {
        let period = if period.is_zero() {
            Duration::from_millis(1)
        } else {
            period
        };
        self.insert(target, period, Cadence::Every { period, fired: 0 })
    }

    fn insert(&mut self, target: TimerTarget, delay: Duration, cadence: Cadence) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let deadline = self.now + delay;
        self.timers.insert(
            id,
            Timer {
                target,
                start: self.now,
                deadline,
                cadence,
            },
        );
        self.queue.insert((deadline, id));
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.remove(&id) {
            Some(timer) => {
                self.queue.remove(&(timer.deadline, id));
                true
            }
            None => false,
        }
    }

    /// Cancel every outstanding timer, returning how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        self.queue.clear();
        count
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Total firings delivered over the scheduler's lifetime.
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Deadline of the earliest outstanding timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.first().map(|(deadline, _)| *deadline)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    ///
    /// Callers may schedule or cancel timers between calls; anything that
    /// lands inside the window is returned by a later call. Finish the window
    /// with [`TimerScheduler::advance_to`].
    pub fn fire_next(&mut self, until: Duration) -> Option<TimerFiring> {
        let &(deadline, id) = self.queue.first()?;
        if deadline > until {
            return None;
        }
        self.queue.remove(&(deadline, id));
        self.now = self.now.max(deadline);
        self.fired += 1;

        let timer = self.timers.get_mut(&id)?;
        let target = timer.target;
        match timer.cadence {
            Cadence::Once => {
                self.timers.remove(&id);
            }
            Cadence::Every { period, fired } => {
                let fired = fired + 1;
                let next = timer.start + period.saturating_mul(fired + 1);
                timer.cadence = Cadence::Every { period, fired };
                timer.deadline = next;
                self.queue.insert((next, id));
            }
        }

        Some(TimerFiring {
            id,
            target,
            at: deadline,
        })
    }

    /// Move the clock forward to `until` without firing anything.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Advance the clock by `dt`, returning every firing in due order.
    pub fn advance_by(&mut self, dt: Duration) -> Vec<TimerFiring> {
        let until = self.now + dt;
        let mut fired = Vec::new();
        while let Some(firing) = self.fire_next(until) {
            fired.push(firing);
        }
        self.advance_to(until);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_once_fires_at_deadline() {
        let mut timers = TimerScheduler::new();
        let id = timers.schedule_once(ms(300), TimerTarget::Settle);

        assert!(timers.advance_by(ms(299)).is_empty());
        assert!(timers.is_scheduled(id));

        let fired = timers.advance_by(ms(1));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].target, TimerTarget::Settle);
        assert_eq!(fired[0].at, ms(300));
        assert!(!timers.is_scheduled(id));
        assert!(timers.is_idle());
    }

    #[test]
    fn test_zero_delay_fires_on_next_advance() {
        let mut timers = TimerScheduler::new();
        timers.schedule_once(Duration::ZERO, TimerTarget::Settle);
        assert_eq!(timers.advance_by(Duration::ZERO).len(), 1);
    }

    #[test]
    fn test_periodic_does_not_drift() {
        let mut timers = TimerScheduler::new();
        timers.advance_by(ms(7));
        timers.schedule_every(ms(24), TimerTarget::ItemTick(ItemId(0)));

        // Uneven frames shouldn't shift the schedule.
        let mut fired = Vec::new();
        for dt in [5, 30, 16, 16, 100, 33] {
            fired.extend(timers.advance_by(ms(dt)));
        }
        let at: Vec<_> = fired.iter().map(|f| f.at.as_millis()).collect();
        assert_eq!(at, vec![31, 55, 79, 103, 127, 151, 175, 199]);
        assert_eq!(timers.now(), ms(207));
    }

    #[test]
    fn test_due_order_breaks_ties_by_creation() {
        let mut timers = TimerScheduler::new();
        timers.schedule_once(ms(50), TimerTarget::ItemDelay(ItemId(2)));
        timers.schedule_once(ms(10), TimerTarget::ItemDelay(ItemId(1)));
        timers.schedule_once(ms(50), TimerTarget::ItemDelay(ItemId(0)));

        let order: Vec<_> = timers
            .advance_by(ms(100))
            .into_iter()
            .map(|f| f.target)
            .collect();
        assert_eq!(
            order,
            vec![
                TimerTarget::ItemDelay(ItemId(1)),
                TimerTarget::ItemDelay(ItemId(2)),
                TimerTarget::ItemDelay(ItemId(0)),
            ]
        );
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerScheduler::new();
        let id = timers.schedule_once(ms(10), TimerTarget::Settle);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance_by(ms(20)).is_empty());
        assert_eq!(timers.fired_count(), 0);
    }

    #[test]
    fn test_cancel_all_sweeps_everything() {
        let mut timers = TimerScheduler::new();
        timers.schedule_once(ms(10), TimerTarget::Settle);
        timers.schedule_once(ms(20), TimerTarget::ItemDelay(ItemId(0)));
        timers.schedule_every(ms(5), TimerTarget::ItemTick(ItemId(1)));

        assert_eq!(timers.cancel_all(), 3);
        assert!(timers.advance_by(ms(1000)).is_empty());
        assert_eq!(timers.next_deadline(), None);
    }

    #[test]
    fn test_timers_scheduled_mid_window_fire_in_window() {
        let mut timers = TimerScheduler::new();
        timers.schedule_once(ms(10), TimerTarget::ItemDelay(ItemId(0)));

        let until = ms(100);
        let first = timers.fire_next(until).unwrap();
        assert_eq!(timers.now(), ms(10));
        assert_eq!(first.target, TimerTarget::ItemDelay(ItemId(0)));

        timers.schedule_every(ms(40), TimerTarget::ItemTick(ItemId(0)));
        let second = timers.fire_next(until).unwrap();
        let third = timers.fire_next(until).unwrap();
        assert_eq!(second.at, ms(50));
        assert_eq!(third.at, ms(90));
        assert!(timers.fire_next(until).is_none());

        timers.advance_to(until);
        assert_eq!(timers.now(), until);
        assert_eq!(timers.next_deadline(), Some(ms(130)));
    }
}
