//! Interaction events emitted to the analytics collaborator.
//!
//! Every event carries a category and a label; the action-specific payload is
//! a tagged union so consumers never inspect untyped maps.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which surface a link was activated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkContext {
    Desktop,
    Mobile,
    Search,
}

/// A dismissible navigation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    DesktopPanel,
    MobileDrawer,
    SearchView,
}

/// Why a surface closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Explicit,
    Toggle,
    Escape,
    OutsideClick,
    HoverIntent,
    Superseded,
    LinkActivated,
}

/// Action-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EventKind {
    Click {
        href: String,
        context: LinkContext,
        external: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        tracking_id: Option<String>,
    },
    Hover {
        index: usize,
    },
    Open {
        surface: Surface,
    },
    Close {
        surface: Surface,
        reason: CloseReason,
    },
    Search {
        query: String,
        result_count: usize,
    },
}

impl EventKind {
    /// Short action name (`click`, `hover`, ...).
    pub fn action(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::Hover { .. } => "hover",
            Self::Open { .. } => "open",
            Self::Close { .. } => "close",
            Self::Search { .. } => "search",
        }
    }
}

/// One logical user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionEvent {
    pub category: String,
    pub label: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl InteractionEvent {
    pub fn new(category: impl Into<String>, label: impl Into<String>, kind: EventKind) -> Self {
        Self {
            category: category.into(),
            label: label.into(),
            timestamp: Utc::now(),
            kind,
        }
    }
}

/// Result of activating a link: where to go and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkActivation {
    pub label: String,
    pub href: String,
    pub new_tab: bool,
    pub context: LinkContext,
}
