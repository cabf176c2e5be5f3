//! Interaction analytics dispatch.
//!
//! The controller reports every logical user action here exactly once. The
//! dispatcher keeps a bounded in-memory history and forwards each event to a
//! pluggable sink. Sink failures are logged and dropped; they never reach the
//! caller.

use std::collections::VecDeque;
use std::fmt;

use meganav_types::InteractionEvent;
use thiserror::Error;
use tracing::{info, warn};

/// Events retained in memory for inspection.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("analytics sink rejected event: {0}")]
    Rejected(String),
    #[error("failed to encode analytics event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Destination for interaction events.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: &InteractionEvent) -> Result<(), AnalyticsError>;
}

/// Emits each event as a structured `tracing` record on `meganav::analytics`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: &InteractionEvent) -> Result<(), AnalyticsError> {
        let payload = serde_json::to_string(&event.kind)?;
        info!(
            target: "meganav::analytics",
            category = %event.category,
            label = %event.label,
            action = event.kind.action(),
            payload = %payload,
            "interaction"
        );
        Ok(())
    }
}

pub struct Analytics {
    enabled: bool,
    history: VecDeque<InteractionEvent>,
    sink: Box<dyn AnalyticsSink>,
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("enabled", &self.enabled)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Analytics {
    pub fn new(enabled: bool) -> Self {
        Self::with_sink(enabled, Box::new(TracingSink))
    }

    pub fn with_sink(enabled: bool, sink: Box<dyn AnalyticsSink>) -> Self {
        Self {
            enabled,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            sink,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Records `event` when enabled. Disabled dispatchers drop events silently.
    pub fn track(&mut self, event: InteractionEvent) {
        if !self.enabled {
            return;
        }
        if let Err(error) = self.sink.record(&event) {
            warn!(
                action = event.kind.action(),
                label = %event.label,
                error = %error,
                "Analytics sink failed; event kept in local history only"
            );
        }
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// Oldest first.
    pub fn events(&self) -> impl Iterator<Item = &InteractionEvent> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a InteractionEvent> {
        self.history.iter().filter(move |event| event.category == category)
    }

    pub fn by_action<'a>(&'a self, action: &'a str) -> impl Iterator<Item = &'a InteractionEvent> {
        self.history.iter().filter(move |event| event.kind.action() == action)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
