//! Hover/focus intent scheduling for a single menu trigger.
//!
//! Opening waits a short delay so a pointer merely crossing the trigger row
//! does not flash panels; closing waits longer so the pointer can travel from
//! the trigger into the panel. The trigger and its panel form one hover
//! region: entering either cancels a pending close.

use std::time::{Duration, Instant};

use crate::timer::{Timer, earliest};

/// Delays used by [`HoverIntent`]. The close delay must exceed the open delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentConfig {
    pub open_delay: Duration,
    pub close_delay: Duration,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            open_delay: Duration::from_millis(80),
            close_delay: Duration::from_millis(140),
        }
    }
}

/// Outcome of polling a [`HoverIntent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentFire {
    Open,
    Close,
}

/// One open timer and one close timer; each kind is pending at most once.
#[derive(Debug, Clone, Default)]
pub struct HoverIntent {
    open: Timer,
    close: Timer,
}

impl HoverIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the open timer and cancels any pending close.
    pub fn schedule_open(&mut self, now: Instant, config: &IntentConfig) {
        self.close.cancel();
        self.open.arm(now, config.open_delay);
    }

    /// Arms the close timer and cancels any pending open.
    pub fn schedule_close(&mut self, now: Instant, config: &IntentConfig) {
        self.open.cancel();
        self.close.arm(now, config.close_delay);
    }

    /// Re-entry into the hover region: drop a pending close, keep a pending open.
    pub fn cancel_close(&mut self) -> bool {
        self.close.cancel()
    }

    pub fn cancel_all(&mut self) {
        self.open.cancel();
        self.close.cancel();
    }

    pub fn is_open_pending(&self) -> bool {
        self.open.is_pending()
    }

    pub fn is_close_pending(&self) -> bool {
        self.close.is_pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        earliest([self.open.deadline(), self.close.deadline()])
    }

    /// Fires whichever timer is due. The two timers are never pending
    /// together, so at most one outcome is produced.
    pub fn poll(&mut self, now: Instant) -> Option<IntentFire> {
        if self.open.fire_if_due(now) {
            return Some(IntentFire::Open);
        }
        if self.close.fire_if_due(now) {
            return Some(IntentFire::Close);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn open_fires_after_delay() {
        let config = IntentConfig::default();
        let t0 = Instant::now();
        let mut intent = HoverIntent::new();
        intent.schedule_open(t0, &config);
        assert_eq!(intent.poll(t0 + ms(79)), None);
        assert_eq!(intent.poll(t0 + ms(80)), Some(IntentFire::Open));
        assert_eq!(intent.poll(t0 + ms(200)), None);
    }

    #[test]
    fn close_supersedes_pending_open() {
        let config = IntentConfig::default();
        let t0 = Instant::now();
        let mut intent = HoverIntent::new();
        intent.schedule_open(t0, &config);
        intent.schedule_close(t0 + ms(10), &config);
        assert!(!intent.is_open_pending());
        assert_eq!(intent.poll(t0 + ms(100)), None);
        assert_eq!(intent.poll(t0 + ms(150)), Some(IntentFire::Close));
    }

    #[test]
    fn reentry_cancels_close() {
        let config = IntentConfig::default();
        let t0 = Instant::now();
        let mut intent = HoverIntent::new();
        intent.schedule_close(t0, &config);
        assert!(intent.cancel_close());
        assert_eq!(intent.poll(t0 + ms(1_000)), None);
    }

    #[test]
    fn rescheduling_restarts_the_delay() {
        let config = IntentConfig::default();
        let t0 = Instant::now();
        let mut intent = HoverIntent::new();
        intent.schedule_close(t0, &config);
        intent.schedule_close(t0 + ms(100), &config);
        assert_eq!(intent.next_deadline(), Some(t0 + ms(240)));
        assert_eq!(intent.poll(t0 + ms(200)), None);
    }
}
