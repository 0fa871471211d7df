//! Timer APIs
//!
//! setTimeout and requestAnimationFrame on a virtual clock. Time only moves
//! when the owner pops due timers, so feedback animations are deterministic.

use std::collections::BTreeMap;

/// Milliseconds between animation frames
pub const FRAME_INTERVAL_MS: u64 = 16;

/// Timer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnOnce()>;

/// Timer entry
pub struct Timer {
    pub id: TimerId,
    /// Virtual time the timer fires at
    pub due_ms: u64,
    pub callback: TimerCallback,
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("due_ms", &self.due_ms)
            .finish_non_exhaustive()
    }
}

/// Timer manager
///
/// Timers with the same due time fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    timers: BTreeMap<(u64, TimerId), Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Add a timeout
    pub fn set_timeout(&mut self, delay_ms: u64, callback: TimerCallback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due_ms = self.now_ms + delay_ms;
        self.timers.insert((due_ms, id), Timer { id, due_ms, callback });
        id
    }

    /// Run `callback` on the next animation frame
    pub fn request_animation_frame(&mut self, callback: TimerCallback) -> TimerId {
        self.set_timeout(FRAME_INTERVAL_MS, callback)
    }

    /// Remove the earliest timer due at or before `until_ms`, moving the clock to its due time
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Timer> {
        let (&key, _) = self.timers.first_key_value()?;
        if key.0 > until_ms {
            return None;
        }
        let timer = self.timers.remove(&key)?;
        self.now_ms = self.now_ms.max(timer.due_ms);
        Some(timer)
    }

    /// Move the clock forward without firing anything
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}
