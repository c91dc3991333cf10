//! Name search over already-fetched items.
//!
//! Matching is a case-insensitive substring test. The skim fuzzy matcher is
//! only used to rank "did you mean" suggestions when a search finds nothing.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::api::models::ListItem;

/// Free-text search input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchTerm {
    raw: String,
}

impl SearchTerm {
    /// Wraps user input as typed.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The text as typed.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed and lowercased; what matching uses.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.raw.trim().to_lowercase()
    }

    /// A term is active when it has non-whitespace content.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.raw.trim().is_empty()
    }

    /// Whether `name` contains this term, ignoring case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.normalized())
    }
}

/// Items whose name contains `term`; all items when the term is inactive.
/// Input order is preserved.
#[must_use]
pub fn search_by_name(term: &SearchTerm, items: &[ListItem]) -> Vec<ListItem> {
    if !term.is_active() {
        return items.to_vec();
    }
    let needle = term.normalized();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Char positions in `name` covered by the first case-insensitive
/// occurrence of `term`, for highlighting.
#[must_use]
pub fn match_indices(name: &str, term: &SearchTerm) -> Vec<usize> {
    let needle: Vec<char> = term.normalized().chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let hay: Vec<char> = name.chars().flat_map(char::to_lowercase).collect();
    // Lowercasing can change char counts for a few scripts; only highlight
    // when positions still line up with the original name.
    if hay.len() != name.chars().count() {
        return Vec::new();
    }
    hay.windows(needle.len())
        .position(|w| w == needle.as_slice())
        .map(|start| (start..start + needle.len()).collect())
        .unwrap_or_default()
}

/// Up to `limit` fetched names that fuzzily resemble `term`, best first.
#[must_use]
pub fn suggestions(term: &SearchTerm, items: &[ListItem], limit: usize) -> Vec<String> {
    if !term.is_active() || limit == 0 {
        return Vec::new();
    }
    let matcher = SkimMatcherV2::default();
    let needle = term.normalized();

    let mut scored: Vec<(i64, &str)> = items
        .iter()
        .filter_map(|item| {
            best_score(&matcher, &item.name, &needle).map(|score| (score, item.name.as_str()))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}

// A typo like "pikachoo" does not fuzzy-match as a whole; fall back to its
// leading part so near misses still surface something useful.
fn best_score(matcher: &SkimMatcherV2, name: &str, needle: &str) -> Option<i64> {
    if let Some(score) = matcher.fuzzy_match(name, needle) {
        return Some(score);
    }
    let chars: Vec<char> = needle.chars().collect();
    if chars.len() < 4 {
        return None;
    }
    let prefix: String = chars[..chars.len() / 2 + 1].iter().collect();
    matcher.fuzzy_match(name, &prefix).map(|score| score / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(names: &[&str]) -> Vec<ListItem> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                ListItem::new(*name, format!("https://pokeapi.co/api/v2/pokemon/{}/", i + 1))
            })
            .collect()
    }

    #[test]
    fn case_insensitive_substring() {
        let all = items(&["bulbasaur", "ivysaur", "venusaur", "charmander"]);
        for term in ["Bulba", "BULBA", "saur", "  bulbasaur "] {
            let found = search_by_name(&SearchTerm::new(term), &all);
            assert!(
                found.iter().any(|i| i.name == "bulbasaur"),
                "{term:?} should find bulbasaur"
            );
        }
        let saurs = search_by_name(&SearchTerm::new("saur"), &all);
        assert_eq!(saurs.len(), 3);
        assert_eq!(saurs[0].name, "bulbasaur");
    }

    #[test]
    fn blank_term_is_inactive_and_returns_everything() {
        let all = items(&["bulbasaur", "ivysaur"]);
        let term = SearchTerm::new("   ");
        assert!(!term.is_active());
        assert_eq!(search_by_name(&term, &all), all);
    }

    #[test]
    fn no_match_is_empty() {
        let all = items(&["bulbasaur", "ivysaur", "venusaur"]);
        assert!(search_by_name(&SearchTerm::new("pikachu"), &all).is_empty());
    }

    #[test]
    fn highlight_indices_follow_first_occurrence() {
        assert_eq!(match_indices("Bulbasaur", &SearchTerm::new("SAUR")), vec![5, 6, 7, 8]);
        assert!(match_indices("Bulbasaur", &SearchTerm::new("zz")).is_empty());
        assert!(match_indices("Bulbasaur", &SearchTerm::new("")).is_empty());
    }

    #[test]
    fn suggestions_rank_close_names() {
        let all = items(&["pikachu", "raichu", "pichu", "bulbasaur"]);
        let found = suggestions(&SearchTerm::new("pikachoo"), &all, 2);
        assert_eq!(found.first().map(String::as_str), Some("pikachu"));
        assert!(found.len() <= 2);
        assert!(suggestions(&SearchTerm::new(""), &all, 3).is_empty());
    }
}
