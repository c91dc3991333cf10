//! Display helpers for API values: names, dex numbers, units, localized text.

use super::models::PokemonSpecies;

/// `"mr-mime"` → `"Mr Mime"`.
#[must_use]
pub fn format_name(name: &str) -> String {
    name.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `25` → `"#025"`.
#[must_use]
pub fn format_number(id: u32) -> String {
    format!("#{id:03}")
}

/// Decimetres → metres, one decimal.
#[must_use]
pub fn format_height(decimetres: u32) -> String {
    format!("{:.1} m", f64::from(decimetres) / 10.0)
}

/// Hectograms → kilograms, one decimal.
#[must_use]
pub fn format_weight(hectograms: u32) -> String {
    format!("{:.1} kg", f64::from(hectograms) / 10.0)
}

/// Flavor text in `language`, falling back to English.
///
/// Upstream text contains form feeds and hard line breaks; both become spaces.
#[must_use]
pub fn description(species: &PokemonSpecies, language: &str) -> Option<String> {
    let pick = |lang: &str| {
        species
            .flavor_text_entries
            .iter()
            .find(|entry| entry.language.name == lang)
            .map(|entry| clean_flavor_text(&entry.flavor_text))
    };
    pick(language).or_else(|| pick("en"))
}

/// Localized species name, falling back to the formatted API name.
#[must_use]
pub fn localized_name(species: &PokemonSpecies, language: &str) -> String {
    species
        .names
        .iter()
        .find(|n| n.language.name == language)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| format_name(&species.name))
}

/// The "Seed Pokémon" style genus line.
#[must_use]
pub fn genus(species: &PokemonSpecies, language: &str) -> Option<String> {
    let pick = |lang: &str| {
        species
            .genera
            .iter()
            .find(|g| g.language.name == lang)
            .map(|g| g.genus.clone())
    };
    pick(language).or_else(|| pick("en"))
}

fn clean_flavor_text(raw: &str) -> String {
    raw.replace(['\u{c}', '\n', '\r'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short label for a base stat name.
#[must_use]
pub fn stat_label(stat: &str) -> &str {
    match stat {
        "hp" => "HP",
        "attack" => "Atk",
        "defense" => "Def",
        "special-attack" => "SpA",
        "special-defense" => "SpD",
        "speed" => "Spe",
        other => other,
    }
}
