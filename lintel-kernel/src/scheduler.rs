//! One-shot timeouts and repeating intervals, soonest deadline first.
//!
//! Entries are ordered by `(deadline, id)`. Callbacks receive the host
//! state and the scheduler itself, so they can arm further timers. An entry
//! is taken out of its set before its callback runs.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::clock::Clock;
use crate::reaper::ChildExit;

/// Identifier of a scheduled entry. Ids start at 1 and are never reused.
pub type TimerId = u64;

type Callback<S> = Box<dyn FnMut(&mut S, &mut Scheduler<S>) -> bool>;

/// Runs once when the child with the registered PID is reaped.
pub type ChildCallback<S> = Box<dyn FnOnce(&mut S, &mut Scheduler<S>, &ChildExit)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Set {
    Timeouts,
    Intervals,
}

struct Entry<S> {
    repeat: Duration,
    callback: Callback<S>,
}

pub struct Scheduler<S> {
    clock: Box<dyn Clock>,
    next_id: TimerId,
    timeouts: BTreeMap<(Instant, TimerId), Entry<S>>,
    intervals: BTreeMap<(Instant, TimerId), Entry<S>>,
    index: HashMap<TimerId, (Instant, Set)>,
    children: HashMap<i32, ChildCallback<S>>,
}

impl<S> Scheduler<S> {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            next_id: 1,
            timeouts: BTreeMap::new(),
            intervals: BTreeMap::new(),
            index: HashMap::new(),
            children: HashMap::new(),
        }
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn set_mut(&mut self, set: Set) -> &mut BTreeMap<(Instant, TimerId), Entry<S>> {
        match set {
            Set::Timeouts => &mut self.timeouts,
            Set::Intervals => &mut self.intervals,
        }
    }

    fn insert(&mut self, set: Set, at: Instant, id: TimerId, entry: Entry<S>) {
        self.set_mut(set).insert((at, id), entry);
        self.index.insert(id, (at, set));
    }

    /// Run `callback` once after `delay`.
    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F) -> TimerId
    where
        F: FnOnce(&mut S, &mut Scheduler<S>) + 'static,
    {
        let id = self.allocate_id();
        let at = self.now() + delay;
        let mut callback = Some(callback);
        let entry = Entry {
            repeat: Duration::ZERO,
            callback: Box::new(move |state, scheduler| {
                if let Some(f) = callback.take() {
                    f(state, scheduler);
                }
                false
            }),
        };
        self.insert(Set::Timeouts, at, id, entry);
        id
    }

    /// Run `callback` every `repeat`, first after one period. The entry
    /// stays armed for as long as the callback returns true.
    pub fn set_interval<F>(&mut self, repeat: Duration, callback: F) -> TimerId
    where
        F: FnMut(&mut S, &mut Scheduler<S>) -> bool + 'static,
    {
        self.set_interval_after(repeat, repeat, callback)
    }

    /// Like [`set_interval`](Self::set_interval) with a separate first delay.
    pub fn set_interval_after<F>(&mut self, first: Duration, repeat: Duration, callback: F) -> TimerId
    where
        F: FnMut(&mut S, &mut Scheduler<S>) -> bool + 'static,
    {
        let id = self.allocate_id();
        let at = self.now() + first;
        let entry = Entry {
            repeat,
            callback: Box::new(callback),
        };
        self.insert(Set::Intervals, at, id, entry);
        id
    }

    /// Cancel a timeout or interval. Returns false if `id` is not pending.
    ///
    /// Must not be called for the entry whose callback is currently running.
    pub fn clear_interval(&mut self, id: TimerId) -> bool {
        match self.index.remove(&id) {
            Some((at, set)) => self.set_mut(set).remove(&(at, id)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn timeout_count(&self) -> usize {
        self.timeouts.len()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Earliest deadline across both sets.
    pub fn next_deadline(&self) -> Option<Instant> {
        let t = self.timeouts.keys().next().map(|k| k.0);
        let i = self.intervals.keys().next().map(|k| k.0);
        match (t, i) {
            (Some(t), Some(i)) => Some(t.min(i)),
            (t, i) => t.or(i),
        }
    }

    /// Time left until the earliest deadline, zero if already due.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.now();
        self.next_deadline()
            .map(|at| at.saturating_duration_since(now))
    }

    fn due(&self, set: Set, now: Instant) -> Vec<(Instant, TimerId)> {
        let map = match set {
            Set::Timeouts => &self.timeouts,
            Set::Intervals => &self.intervals,
        };
        map.keys().take_while(|k| k.0 <= now).copied().collect()
    }

    /// Fire every entry that was due when the call started. Each entry
    /// fires at most once per call; a repeating entry is re-armed at its
    /// previous deadline plus its period. Returns the number fired.
    pub fn process_expired(&mut self, state: &mut S) -> usize {
        let now = self.now();
        let mut fired = 0;

        for key in self.due(Set::Timeouts, now) {
            let Some(mut entry) = self.timeouts.remove(&key) else {
                continue;
            };
            self.index.remove(&key.1);
            trace!("timeout {} fired", key.1);
            (entry.callback)(state, self);
            fired += 1;
        }

        for key in self.due(Set::Intervals, now) {
            let Some(mut entry) = self.intervals.remove(&key) else {
                continue;
            };
            self.index.remove(&key.1);
            trace!("interval {} fired", key.1);
            let again = (entry.callback)(state, self);
            fired += 1;
            if again {
                let next = key.0 + entry.repeat;
                self.insert(Set::Intervals, next, key.1, entry);
            }
        }
        fired
    }

    /// Run `callback` when the child `pid` is reaped.
    pub fn watch_child<F>(&mut self, pid: i32, callback: F)
    where
        F: FnOnce(&mut S, &mut Scheduler<S>, &ChildExit) + 'static,
    {
        self.children.insert(pid, Box::new(callback));
    }

    pub fn is_watching(&self, pid: i32) -> bool {
        self.children.contains_key(&pid)
    }

    /// Invoke and drop the callback registered for `exit.pid`. Returns
    /// false if there was none.
    pub fn complete_child(&mut self, state: &mut S, exit: &ChildExit) -> bool {
        match self.children.remove(&exit.pid) {
            Some(callback) => {
                callback(state, self, exit);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn scheduler() -> (Scheduler<Vec<&'static str>>, ManualClock) {
        let clock = ManualClock::new();
        (Scheduler::new(clock.clone()), clock)
    }

    #[test]
    fn test_cleared_timeout_never_fires() {
        let (mut s, clock) = scheduler();
        let mut log = Vec::new();
        let id = s.set_timeout(Duration::from_millis(100), |log: &mut Vec<_>, _| {
            log.push("fired")
        });
        assert!(s.clear_interval(id));
        assert_eq!(s.timeout_count(), 0);

        clock.advance(Duration::from_millis(500));
        assert_eq!(s.process_expired(&mut log), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_interval_repeats_from_previous_deadline() {
        let (mut s, clock) = scheduler();
        let mut log = Vec::new();
        s.set_interval(Duration::from_millis(250), |log: &mut Vec<_>, _| {
            log.push("tick");
            true
        });

        clock.advance(Duration::from_millis(600));
        s.process_expired(&mut log);
        clock.advance(Duration::from_millis(300));
        s.process_expired(&mut log);

        assert_eq!(log.len(), 2);
        assert_eq!(s.interval_count(), 1);
    }

    #[test]
    fn test_interval_dropped_when_callback_declines() {
        let (mut s, clock) = scheduler();
        let mut log = Vec::new();
        let id = s.set_interval(Duration::from_millis(10), |log: &mut Vec<_>, _| {
            log.push("once");
            false
        });
        clock.advance(Duration::from_millis(10));
        s.process_expired(&mut log);
        assert_eq!(log, vec!["once"]);
        assert!(!s.is_pending(id));
        assert!(!s.clear_interval(id));
    }

    #[test]
    fn test_clear_unknown_id_is_silent() {
        let (mut s, _) = scheduler();
        assert!(!s.clear_interval(12345));
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let (mut s, _) = scheduler();
        let a = s.set_timeout(Duration::ZERO, |_, _| {});
        let b = s.set_interval(Duration::from_secs(1), |_, _| true);
        let c = s.set_timeout(Duration::ZERO, |_, _| {});
        assert_eq!(a, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_next_deadline_spans_both_sets() {
        let (mut s, _) = scheduler();
        assert_eq!(s.next_deadline(), None);
        let start = s.now();
        s.set_interval(Duration::from_millis(300), |_, _| true);
        s.set_timeout(Duration::from_millis(200), |_, _| {});
        assert_eq!(s.next_deadline(), Some(start + Duration::from_millis(200)));
        assert_eq!(s.time_until_next(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn test_equal_deadlines_fire_in_id_order() {
        let (mut s, clock) = scheduler();
        let mut log = Vec::new();
        s.set_timeout(Duration::from_millis(5), |log: &mut Vec<_>, _| log.push("first"));
        s.set_timeout(Duration::from_millis(5), |log: &mut Vec<_>, _| log.push("second"));
        clock.advance(Duration::from_millis(5));
        assert_eq!(s.process_expired(&mut log), 2);
        assert_eq!(log, vec!["first", "second"]);
    }

    #[test]
    fn test_callback_can_arm_new_timer() {
        let (mut s, clock) = scheduler();
        let mut log = Vec::new();
        s.set_timeout(Duration::from_millis(1), |log: &mut Vec<_>, s| {
            log.push("outer");
            s.set_timeout(Duration::ZERO, |log: &mut Vec<_>, _| log.push("inner"));
        });
        clock.advance(Duration::from_millis(1));
        s.process_expired(&mut log);
        assert_eq!(log, vec!["outer"]);
        s.process_expired(&mut log);
        assert_eq!(log, vec!["outer", "inner"]);
    }

    #[test]
    fn test_child_callbacks_run_once() {
        let (mut s, _) = scheduler();
        let mut log = Vec::new();
        s.watch_child(77, |log: &mut Vec<_>, _, exit| {
            assert_eq!(exit.code, Some(0));
            log.push("child");
        });
        let exit = ChildExit {
            pid: 77,
            code: Some(0),
            signal: None,
        };
        assert!(s.complete_child(&mut log, &exit));
        assert!(!s.complete_child(&mut log, &exit));
        assert_eq!(log, vec!["child"]);
    }
}
