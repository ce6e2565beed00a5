//! Single cooperative timer queue.
//!
//! Every effect registers its intervals and timeouts here instead of owning a
//! browser timer. The frame loop drains whatever is due, one entry at a time and
//! in `(due, registration)` order, so a timeout armed by a firing entry can itself
//! fire within the same frame if its due time has already passed. Each fired entry
//! reports its own due time; handlers schedule follow-ups relative to that, which
//! keeps chains phase-stable regardless of frame jitter.
//!
//! After a long gap between frames (a hidden tab pauses `requestAnimationFrame`)
//! nothing replays the backlog: a repeating entry fires once and skips the periods
//! it missed, and [`Scheduler::follow_up`] lets a chain lag at most one step.

/// Handle for a scheduled entry, usable with [`Scheduler::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Shortest period accepted for repeating entries.
const MIN_PERIOD_MS: f64 = 1.0;

struct Entry<E> {
    id: TimerId,
    due: f64,
    period: Option<f64>,
    event: E,
}

/// An entry that came due.
#[derive(Debug, PartialEq)]
pub struct Fired<E> {
    pub id: TimerId,
    /// Scheduled time of this firing (never later than the `now` passed in). For a
    /// repeating entry that missed periods, the latest missed slot.
    pub at: f64,
    pub event: E,
}

pub struct Scheduler<E> {
    entries: Vec<Entry<E>>,
    next_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self { entries: Vec::new(), next_id: 0 }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, due: f64, period: Option<f64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, due, period, event });
        id
    }

    /// Fire `event` once, `delay_ms` after `now`.
    pub fn after(&mut self, now: f64, delay_ms: f64, event: E) -> TimerId {
        self.push(now + delay_ms.max(0.0), None, event)
    }

    /// Schedule the next link of a chain whose previous link fired at `at`.
    ///
    /// Keeps the chain's phase while it is on time; once it has fallen more than
    /// `delay_ms` behind `now` it restarts from `now - delay_ms`, so it fires at
    /// most once more within the current frame.
    pub fn follow_up(&mut self, at: f64, now: f64, delay_ms: f64, event: E) -> TimerId {
        let delay = delay_ms.max(0.0);
        self.after(at.max(now - delay), delay, event)
    }

    /// Fire `event` every `period_ms`, first at `now + period_ms`.
    pub fn every(&mut self, now: f64, period_ms: f64, event: E) -> TimerId {
        let period = period_ms.max(MIN_PERIOD_MS);
        self.push(now + period, Some(period), event)
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest entry due at or before `now`. Repeating entries re-arm at
    /// their next slot after `now`, so each fires at most once per call time.
    pub fn pop_due(&mut self, now: f64) -> Option<Fired<E>> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let entry = &mut self.entries[idx];
        let at = entry.due;
        let id = entry.id;
        match entry.period {
            Some(period) => {
                let missed = ((now - at) / period).floor().max(0.0);
                let at = at + missed * period;
                entry.due = at + period;
                Some(Fired { id, at, event: entry.event.clone() })
            }
            None => {
                let entry = self.entries.swap_remove(idx);
                Some(Fired { id, at, event: entry.event })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, now: f64) -> Vec<(f64, &'static str)> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(now) {
            out.push((f.at, f.event));
        }
        out
    }

    #[test]
    fn fires_in_due_then_registration_order() {
        let mut s = Scheduler::new();
        s.after(0.0, 50.0, "b");
        s.after(0.0, 10.0, "a");
        s.after(0.0, 50.0, "c");
        assert_eq!(drain(&mut s, 100.0), vec![(10.0, "a"), (50.0, "b"), (50.0, "c")]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn repeating_entries_skip_missed_periods_and_stay_armed() {
        let mut s = Scheduler::new();
        s.every(0.0, 100.0, "tick");
        assert!(drain(&mut s, 99.0).is_empty());
        assert_eq!(drain(&mut s, 100.0), vec![(100.0, "tick")]);
        assert_eq!(drain(&mut s, 350.0), vec![(300.0, "tick")]);
        assert!(drain(&mut s, 399.0).is_empty());
        assert_eq!(drain(&mut s, 400.0), vec![(400.0, "tick")]);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn long_stall_fires_each_repeating_entry_once() {
        let mut s = Scheduler::new();
        s.every(0.0, 100.0, "shimmer");
        s.every(0.0, 5_000.0, "regen");
        let fired = drain(&mut s, 600_000.0);
        assert_eq!(fired, vec![(600_000.0, "shimmer"), (600_000.0, "regen")]);
        assert_eq!(drain(&mut s, 600_099.0), vec![]);
        assert_eq!(drain(&mut s, 600_100.0), vec![(600_100.0, "shimmer")]);
    }

    #[test]
    fn follow_up_keeps_phase_on_time_and_bounds_lag() {
        let mut s = Scheduler::new();
        // On time: next link 100 ms after the previous one.
        s.follow_up(1_000.0, 1_016.0, 100.0, "on-time");
        assert_eq!(drain(&mut s, 1_100.0), vec![(1_100.0, "on-time")]);

        // Far behind: a single catch-up link, then back on schedule.
        let mut links = 0;
        s.follow_up(0.0, 600_000.0, 100.0, "late");
        while let Some(f) = s.pop_due(600_000.0) {
            links += 1;
            s.follow_up(f.at, 600_000.0, 100.0, "late");
        }
        assert_eq!(links, 1);
        assert_eq!(drain(&mut s, 600_100.0), vec![(600_100.0, "late")]);
    }

    #[test]
    fn cancel_removes_only_the_target() {
        let mut s = Scheduler::new();
        let a = s.after(0.0, 10.0, "a");
        let b = s.every(0.0, 10.0, "b");
        assert!(s.cancel(a));
        assert!(!s.cancel(a));
        assert!(s.is_pending(b));
        assert_eq!(drain(&mut s, 10.0), vec![(10.0, "b")]);
    }

    #[test]
    fn zero_period_is_clamped() {
        let mut s = Scheduler::new();
        s.every(0.0, 0.0, "spin");
        assert_eq!(drain(&mut s, 0.5).len(), 0);
        assert_eq!(drain(&mut s, 1.0).len(), 1);
        assert_eq!(drain(&mut s, 2.0).len(), 1);
    }
}
