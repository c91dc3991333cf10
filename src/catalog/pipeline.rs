//! The list view-model pipeline.
//!
//! [`derive_view`] turns the raw fetched items plus the three user inputs
//! (filter, sort, search) into the ordered sequence the grid renders. It is a
//! pure function; [`ViewModel`] wraps it with a single-entry memo so the
//! result is only recomputed when one of the inputs changes.

use crate::api::models::ListItem;
use crate::catalog::filter::{CategoryLookup, FilterState};
use crate::catalog::search::{search_by_name, SearchTerm};
use crate::catalog::sort::SortOption;

/// Derives the visible items.
///
/// 1. An active search replaces the dataset with the name matches; the
///    number range is not applied to search results.
/// 2. Otherwise items outside the inclusive number range are dropped.
/// 3. Selected categories narrow the result when `lookup` knows their
///    membership; unknown categories, or no lookup at all, leave it as is.
/// 4. The result is stable-sorted.
///
/// # Examples
///
/// ```
/// use pokedex_tui::api::ListItem;
/// use pokedex_tui::catalog::{derive_view, FilterState, NumberRange, SearchTerm, SortOption};
///
/// let items: Vec<ListItem> = (1..=5)
///     .map(|id| ListItem::new(format!("mon{id}"), format!("https://pokeapi.co/api/v2/pokemon/{id}/")))
///     .collect();
/// let filter = FilterState::new(1010).with_range(NumberRange::new(2, 3, 1010).unwrap());
///
/// let view = derive_view(&items, &filter, SortOption::IdDescending, &SearchTerm::default(), None);
/// let ids: Vec<u32> = view.iter().map(ListItem::id).collect();
/// assert_eq!(ids, vec![3, 2]);
/// ```
#[must_use]
pub fn derive_view(
    items: &[ListItem],
    filter: &FilterState,
    sort: SortOption,
    search: &SearchTerm,
    lookup: Option<&dyn CategoryLookup>,
) -> Vec<ListItem> {
    let mut view = if search.is_active() {
        search_by_name(search, items)
    } else {
        let range = filter.number_range();
        items
            .iter()
            .filter(|item| range.contains(item.id()))
            .cloned()
            .collect()
    };

    if let Some(lookup) = lookup {
        let known: Vec<_> = filter
            .categories()
            .iter()
            .filter_map(|category| lookup.members(category))
            .collect();
        if !known.is_empty() {
            view.retain(|item| {
                let id = item.id();
                known.iter().any(|members| members.contains(&id))
            });
        }
    }

    sort.sort(&mut view);
    view
}

/// Everything [`derive_view`] depends on, reduced to comparable values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewKey {
    /// Bumped by the owner whenever the raw items change.
    pub items_revision: u64,
    /// Filters in effect.
    pub filter: FilterState,
    /// Sort order in effect.
    pub sort: SortOption,
    /// Normalized search term.
    pub search: String,
    /// Revision of the type lookup, when one was supplied.
    pub lookup_revision: Option<u64>,
}

/// Memoized pipeline output.
///
/// Callers pass a revision for the item collection (the controller bumps its
/// revision on every replace or append) instead of the items being compared
/// element by element.
#[derive(Debug, Default)]
pub struct ViewModel {
    key: Option<ViewKey>,
    items: Vec<ListItem>,
    computations: u64,
}

impl ViewModel {
    /// An empty memo; the first derive always computes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the derived view, recomputing only when the key changed.
    pub fn derive(
        &mut self,
        items: &[ListItem],
        items_revision: u64,
        filter: &FilterState,
        sort: SortOption,
        search: &SearchTerm,
        lookup: Option<&dyn CategoryLookup>,
    ) -> &[ListItem] {
        let key = ViewKey {
            items_revision,
            filter: filter.clone(),
            sort,
            search: search.normalized(),
            lookup_revision: lookup.map(|l| l.revision()),
        };
        if self.key.as_ref() != Some(&key) {
            self.items = derive_view(items, filter, sort, search, lookup);
            self.key = Some(key);
            self.computations += 1;
            tracing::trace!(
                target: "pokedex::pipeline",
                visible = self.items.len(),
                "view recomputed"
            );
        }
        &self.items
    }

    /// The last derived view.
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// How many times the view was actually recomputed.
    #[must_use]
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Forces the next [`derive`](Self::derive) to recompute.
    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
