//! Filter state: number range plus the category (type) selection.
//!
//! `FilterState` values are replaced rather than mutated; every operation
//! returns a new value so owners can detect changes by comparison.

use std::collections::{BTreeSet, HashMap};

use crate::api::models::ListItem;
use crate::error::{PokedexError, Result};

/// The eighteen creature types, in the order the filter panel shows them.
pub const POKEMON_TYPES: [&str; 18] = [
    "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];

/// Inclusive id range with `1 <= min <= max <= catalog_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberRange {
    min: u32,
    max: u32,
}

impl NumberRange {
    /// Validated constructor.
    pub fn new(min: u32, max: u32, catalog_max: u32) -> Result<Self> {
        if min < 1 || max > catalog_max {
            return Err(PokedexError::InvalidFilter {
                details: format!("range {min}..={max} must lie within 1..={catalog_max}"),
            });
        }
        if min > max {
            return Err(PokedexError::InvalidFilter {
                details: format!("range minimum {min} exceeds maximum {max}"),
            });
        }
        Ok(Self { min, max })
    }

    /// The whole catalog, `1..=catalog_max`.
    #[must_use]
    pub fn full(catalog_max: u32) -> Self {
        Self {
            min: 1,
            max: catalog_max.max(1),
        }
    }

    /// Lowest accepted number.
    #[must_use]
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Highest accepted number.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Whether `id` lies inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        (self.min..=self.max).contains(&id)
    }

    /// Same range with a new minimum, if it keeps the invariant.
    pub fn with_min(&self, min: u32, catalog_max: u32) -> Result<Self> {
        Self::new(min, self.max, catalog_max)
    }

    /// Same range with a new maximum, if it keeps the invariant.
    pub fn with_max(&self, max: u32, catalog_max: u32) -> Result<Self> {
        Self::new(self.min, max, catalog_max)
    }
}

/// Category selection plus number range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    categories: BTreeSet<String>,
    number_range: NumberRange,
    catalog_max: u32,
}

impl FilterState {
    /// No categories, full range.
    #[must_use]
    pub fn new(catalog_max: u32) -> Self {
        Self {
            categories: BTreeSet::new(),
            number_range: NumberRange::full(catalog_max),
            catalog_max: catalog_max.max(1),
        }
    }

    /// Selected type names.
    #[must_use]
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// The number range.
    #[must_use]
    pub fn number_range(&self) -> NumberRange {
        self.number_range
    }

    /// Upper bound the range may reach.
    #[must_use]
    pub fn catalog_max(&self) -> u32 {
        self.catalog_max
    }

    /// New state with `category` added if absent, removed if present.
    #[must_use]
    pub fn toggle_category(&self, category: &str) -> Self {
        let mut next = self.clone();
        if !next.categories.remove(category) {
            next.categories.insert(category.to_string());
        }
        next
    }

    /// New state with the given range.
    #[must_use]
    pub fn with_range(&self, number_range: NumberRange) -> Self {
        Self {
            number_range,
            ..self.clone()
        }
    }

    /// New state with the minimum moved by `delta`; `None` if that would break
    /// the range invariant.
    #[must_use]
    pub fn shift_min(&self, delta: i64) -> Option<Self> {
        let min = shifted(self.number_range.min, delta)?;
        self.number_range
            .with_min(min, self.catalog_max)
            .ok()
            .map(|r| self.with_range(r))
    }

    /// New state with the maximum moved by `delta`; `None` if that would break
    /// the range invariant.
    #[must_use]
    pub fn shift_max(&self, delta: i64) -> Option<Self> {
        let max = shifted(self.number_range.max, delta)?;
        self.number_range
            .with_max(max, self.catalog_max)
            .ok()
            .map(|r| self.with_range(r))
    }

    /// Defaults for the same catalog.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self::new(self.catalog_max)
    }

    /// Whether anything narrows the catalog.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.categories.is_empty() || self.number_range != NumberRange::full(self.catalog_max)
    }
}

fn shifted(value: u32, delta: i64) -> Option<u32> {
    u32::try_from(i64::from(value) + delta).ok()
}

/// Category membership source the pipeline consults when categories are
/// selected.
///
/// Returning `None` means membership for that category is not known yet;
/// such categories do not narrow the result.
pub trait CategoryLookup {
    /// Ids belonging to `category`, if known.
    fn members(&self, category: &str) -> Option<&BTreeSet<u32>>;

    /// Changes whenever membership data changes; part of the memo key.
    fn revision(&self) -> u64;
}

/// Type membership collected from `GET /type/{name}` responses.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    members: HashMap<String, BTreeSet<u32>>,
    revision: u64,
}

impl TypeIndex {
    /// An index with no known types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the members of `category`, replacing earlier data.
    pub fn insert(&mut self, category: &str, items: &[ListItem]) {
        let ids = items.iter().map(ListItem::id).collect();
        self.members.insert(category.to_string(), ids);
        self.revision += 1;
    }

    /// Whether membership for `category` is known.
    #[must_use]
    pub fn contains_category(&self, category: &str) -> bool {
        self.members.contains_key(category)
    }
}

impl CategoryLookup for TypeIndex {
    fn members(&self, category: &str) -> Option<&BTreeSet<u32>> {
        self.members.get(category)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
