//! Sort orders for the card grid.

use std::cmp::Reverse;

use crate::api::models::ListItem;

/// The four orderings offered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOption {
    /// National dex number, lowest first.
    #[default]
    IdAscending,
    /// National dex number, highest first.
    IdDescending,
    /// Name A to Z, ignoring case.
    NameAscending,
    /// Name Z to A, ignoring case.
    NameDescending,
}

impl SortOption {
    /// All options in display order.
    pub const ALL: [SortOption; 4] = [
        Self::IdAscending,
        Self::IdDescending,
        Self::NameAscending,
        Self::NameDescending,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IdAscending => "Number (ascending)",
            Self::IdDescending => "Number (descending)",
            Self::NameAscending => "Name (A-Z)",
            Self::NameDescending => "Name (Z-A)",
        }
    }

    /// Stable key, suitable for config files and logs.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::IdAscending => "id",
            Self::IdDescending => "id-desc",
            Self::NameAscending => "name",
            Self::NameDescending => "name-desc",
        }
    }

    /// Parses a [`value`](Self::value) key. `"number"` is accepted as an alias
    /// of `"id"`.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "id" | "number" => Some(Self::IdAscending),
            "id-desc" => Some(Self::IdDescending),
            "name" => Some(Self::NameAscending),
            "name-desc" => Some(Self::NameDescending),
            _ => None,
        }
    }

    /// The next option in display order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|o| *o == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Sorts `items` in place. Stable: equal keys keep their input order,
    /// for descending orders too.
    pub fn sort(self, items: &mut [ListItem]) {
        match self {
            Self::IdAscending => items.sort_by_cached_key(ListItem::id),
            Self::IdDescending => items.sort_by_cached_key(|item| Reverse(item.id())),
            Self::NameAscending => items.sort_by_cached_key(|item| item.name.to_lowercase()),
            Self::NameDescending => {
                items.sort_by_cached_key(|item| Reverse(item.name.to_lowercase()));
            }
        }
    }
}
