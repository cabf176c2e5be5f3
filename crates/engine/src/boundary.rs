//! Failure isolation for navigation surfaces.
//!
//! Each panel renders inside its own boundary so one broken panel leaves the
//! rest of the navigation usable. Menu- and item-level boundaries retry on
//! their own once per failure episode; the navigation-level boundary waits
//! for the user and offers a way back to the site root.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, warn};

use crate::timer::Timer;

/// Delay before a non-navigation boundary retries on its own.
pub const AUTO_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryLevel {
    Navigation,
    Menu,
    Item,
}

/// Actions offered by a failed boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    Retry,
    Home,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryFailure {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ErrorBoundary {
    level: BoundaryLevel,
    failure: Option<BoundaryFailure>,
    auto_retry: Timer,
    auto_retry_spent: bool,
    failures: u64,
}

impl ErrorBoundary {
    pub fn new(level: BoundaryLevel) -> Self {
        Self {
            level,
            failure: None,
            auto_retry: Timer::idle(),
            auto_retry_spent: false,
            failures: 0,
        }
    }

    pub fn level(&self) -> BoundaryLevel {
        self.level
    }

    pub fn failure(&self) -> Option<&BoundaryFailure> {
        self.failure.as_ref()
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn actions(&self) -> &'static [RecoveryAction] {
        match self.level {
            BoundaryLevel::Navigation => &[RecoveryAction::Retry, RecoveryAction::Home],
            BoundaryLevel::Menu | BoundaryLevel::Item => &[RecoveryAction::Retry],
        }
    }

    /// Records a failure. Repeated failures while already failed only update
    /// the message.
    pub fn fail(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        if let Some(failure) = &mut self.failure {
            failure.message = message;
            return;
        }
        self.failures += 1;
        let id = format!("nav-{:x}-{}", Utc::now().timestamp_millis(), self.failures);
        warn!(level = ?self.level, error_id = %id, message = %message, "Navigation surface failed");
        self.failure = Some(BoundaryFailure { id, message });
        if self.level != BoundaryLevel::Navigation && !self.auto_retry_spent {
            self.auto_retry_spent = true;
            self.auto_retry.arm(now, AUTO_RETRY_DELAY);
        }
    }

    /// A successful render ends the failure episode and restores the
    /// auto-retry budget.
    pub fn mark_healthy(&mut self) {
        if self.failure.is_none() {
            self.auto_retry_spent = false;
        }
    }

    /// Fires the pending auto-retry. Returns whether the boundary reset.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.auto_retry.fire_if_due(now) {
            return false;
        }
        info!(level = ?self.level, "Auto-retrying failed navigation surface");
        self.failure = None;
        true
    }

    /// Manual retry: clears the failure and restores the auto-retry budget.
    pub fn retry(&mut self) {
        self.auto_retry.cancel();
        self.auto_retry_spent = false;
        self.failure = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.auto_retry.deadline()
    }

    pub fn teardown(&mut self) {
        self.auto_retry.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_level_retries_once_per_episode() {
        let t0 = Instant::now();
        let mut boundary = ErrorBoundary::new(BoundaryLevel::Menu);
        boundary.fail("bad href", t0);
        assert!(boundary.is_failed());
        assert!(!boundary.poll(t0 + Duration::from_secs(4)));
        assert!(boundary.poll(t0 + AUTO_RETRY_DELAY));
        assert!(!boundary.is_failed());

        let t1 = t0 + Duration::from_secs(6);
        boundary.fail("bad href again", t1);
        assert_eq!(boundary.next_deadline(), None);
        assert!(!boundary.poll(t1 + Duration::from_secs(60)));
        assert!(boundary.is_failed());

        boundary.retry();
        boundary.fail("still bad", t1);
        assert!(boundary.next_deadline().is_some());
    }

    #[test]
    fn healthy_render_restores_budget() {
        let t0 = Instant::now();
        let mut boundary = ErrorBoundary::new(BoundaryLevel::Item);
        boundary.fail("boom", t0);
        boundary.poll(t0 + AUTO_RETRY_DELAY);
        boundary.mark_healthy();
        boundary.fail("boom", t0 + Duration::from_secs(10));
        assert!(boundary.next_deadline().is_some());
    }

    #[test]
    fn navigation_level_never_auto_retries() {
        let t0 = Instant::now();
        let mut boundary = ErrorBoundary::new(BoundaryLevel::Navigation);
        boundary.fail("terminal too small", t0);
        assert_eq!(boundary.next_deadline(), None);
        assert_eq!(boundary.actions(), &[RecoveryAction::Retry, RecoveryAction::Home]);
        let id = boundary.failure().map(|f| f.id.clone()).unwrap_or_default();
        assert!(id.starts_with("nav-"));
    }

    #[test]
    fn teardown_cancels_retry() {
        let t0 = Instant::now();
        let mut boundary = ErrorBoundary::new(BoundaryLevel::Menu);
        boundary.fail("boom", t0);
        boundary.teardown();
        assert!(!boundary.poll(t0 + Duration::from_secs(30)));
    }
}
