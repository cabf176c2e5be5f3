mod search_component;
mod state;

pub use search_component::SearchComponent;
pub use state::{SUGGESTION_LIMIT, SearchFocus, SearchViewState};
