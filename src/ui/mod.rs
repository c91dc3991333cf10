//! Screen components: the card grid, the detail screen, the search field,
//! the sort/filter controls and the key map and styles they share.

pub mod controls;
pub mod details_view;
pub mod grid;
pub mod keys;
pub mod search_input;
pub mod style;

pub use controls::{ControlEvent, Controls};
pub use grid::Grid;
pub use keys::{AppKeyMap, HelpContext};
pub use search_input::SearchInput;
pub use style::Styles;
