//! Identifier extraction from listing references.

/// Id used when a reference carries no numeric trailing segment.
pub const UNKNOWN_ID: u32 = 0;

/// Returns the last path segment of `reference` parsed as an integer.
///
/// Query strings and fragments are ignored, as are trailing slashes:
/// `".../pokemon/25/"` and `".../pokemon/25?x=1"` both yield `Some(25)`.
/// A reference whose last segment is not numeric yields `None`.
///
/// ```
/// use pokedex_tui::catalog::id::extract_id;
///
/// assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/25/"), Some(25));
/// assert_eq!(extract_id("https://pokeapi.co/api/v2/pokemon/pikachu/"), None);
/// ```
#[must_use]
pub fn extract_id(reference: &str) -> Option<u32> {
    let path = reference
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segment = path.rsplit('/').find(|s| !s.is_empty())?;
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
