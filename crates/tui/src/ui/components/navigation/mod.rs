//! Header navigation: trigger row, mega-menu panels, mobile drawer and the
//! compact inline search.

mod drawer;
pub mod inline_search;
mod navigation_component;
pub mod panel;
mod state;

pub use navigation_component::{NavigationComponent, track_pointer};
pub use panel::PanelError;
pub use state::{DrawerNode, DrawerState};
