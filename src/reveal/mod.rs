//! Cancelable scheduled events for multi-phase screen reveals.
//!
//! A `Timeline` is owned by the screen that animates. Events are plain data
//! the screen interprets when polled, so once the timeline is cleared or
//! dropped nothing it scheduled can reach the store.

/// Handle returned by `Timeline::schedule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    id: TimerId,
    due_ms: u64,
    event: E,
}

#[derive(Debug, Clone)]
pub struct Timeline<E> {
    pending: Vec<Scheduled<E>>,
    next_id: u64,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedules `event` to fire once `now_ms + delay_ms` has passed.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: now_ms.saturating_add(delay_ms),
            event,
        });
        id
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Removes and returns every event due at `now_ms`, earliest first.
    /// Ties keep scheduling order.
    pub fn poll(&mut self, now_ms: u64) -> Vec<E> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by_key(|s| (s.due_ms, s.id.0));
        due.into_iter().map(|s| s.event).collect()
    }
}

/// Phases of the diploma reveal, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealPhase {
    Seal,
    Name,
    Pillars,
    Total,
    Signature,
}

impl RevealPhase {
    pub const ALL: [RevealPhase; 5] = [
        RevealPhase::Seal,
        RevealPhase::Name,
        RevealPhase::Pillars,
        RevealPhase::Total,
        RevealPhase::Signature,
    ];
}

/// Schedules each phase `interval_ms` after the previous one.
pub fn schedule_reveal(timeline: &mut Timeline<RevealPhase>, now_ms: u64, interval_ms: u64) {
    for (i, phase) in RevealPhase::ALL.iter().enumerate() {
        timeline.schedule(now_ms, interval_ms.saturating_mul(i as u64 + 1), *phase);
    }
}
