//! Cancellable deadline timer.
//!
//! Timers never spawn tasks or sleep. A timer is a pending deadline that the
//! owner polls with the current instant; the runtime wakes up at the earliest
//! deadline across all timers and polls again. Cancelling simply clears the
//! deadline, so a cancelled timer can never fire late.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub const fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arms the timer to fire `delay` after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Clears the pending deadline. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consumes the deadline if it has passed. Fires at most once per arm.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Earliest of a set of optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = Timer::idle();
        timer.arm(start, Duration::from_millis(80));
        assert!(!timer.fire_if_due(start + Duration::from_millis(79)));
        assert!(timer.fire_if_due(start + Duration::from_millis(80)));
        assert!(!timer.fire_if_due(start + Duration::from_millis(500)));
        assert!(!timer.is_pending());
    }

    #[test]
    fn rearm_replaces_deadline() {
        let start = Instant::now();
        let mut timer = Timer::idle();
        timer.arm(start, Duration::from_millis(100));
        timer.arm(start + Duration::from_millis(90), Duration::from_millis(100));
        assert!(!timer.fire_if_due(start + Duration::from_millis(150)));
        assert!(timer.fire_if_due(start + Duration::from_millis(190)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let start = Instant::now();
        let mut timer = Timer::idle();
        timer.arm(start, Duration::from_millis(10));
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.fire_if_due(start + Duration::from_secs(1)));
    }

    #[test]
    fn earliest_ignores_idle_timers() {
        let start = Instant::now();
        let later = start + Duration::from_millis(50);
        assert_eq!(earliest([None, Some(later), Some(start)]), Some(start));
        assert_eq!(earliest([None, None]), None);
    }
}
