//! Shared types for the Meganav workspace: the navigation tree model and the
//! interaction event contract. [`Msg`] and [`Effect`] carry traffic between
//! the terminal front-end and its components.

pub mod events;
pub mod nav;

pub use events::{CloseReason, EventKind, InteractionEvent, LinkActivation, LinkContext, Surface};
pub use nav::{
    Destination, LinkRef, NavColumn, NavDataError, NavHighlight, NavItem, NavItemId, NavLink, NavigationConfig, NavigationTree,
    ThemeMode, parse_href,
};

/// Messages delivered to every component by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Periodic tick; timers are polled against the current instant.
    Tick,
    /// Terminal resized.
    Resize(u16, u16),
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Navigate to a link (or open it in a new tab).
    ActivateLink(LinkActivation),
    /// Persist a submitted search query to usage history.
    RecordSearch(String),
    /// Add or remove a link from favourites.
    ToggleFavorite(String),
    /// Switch and persist the theme.
    SetTheme(ThemeMode),
    /// Navigate to the site root.
    GoHome,
    /// Display a modal view.
    ShowModal(Modal),
    /// Hide any open modal.
    CloseModal,
    /// Leave the application.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Search,
    Help,
}
