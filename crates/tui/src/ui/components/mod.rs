//! UI components: navigation header and panels, page body, search and help modals.

pub mod component;
pub mod error_card;
pub mod help;
pub mod navigation;
pub mod page;
pub mod search;

pub use component::*;
pub use help::HelpComponent;
pub use navigation::NavigationComponent;
pub use page::PageComponent;
pub use search::SearchComponent;
