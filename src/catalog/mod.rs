//! Pure catalog logic: id extraction, filtering, sorting, searching and the
//! view-model pipeline that combines them. Nothing here performs I/O.

pub mod filter;
pub mod id;
pub mod pipeline;
pub mod search;
pub mod sort;

pub use filter::{CategoryLookup, FilterState, NumberRange, TypeIndex, POKEMON_TYPES};
pub use id::{extract_id, UNKNOWN_ID};
pub use pipeline::{derive_view, ViewKey, ViewModel};
pub use search::{match_indices, search_by_name, suggestions, SearchTerm};
pub use sort::SortOption;
