//! Detail screen for one creature.

use unicode_width::UnicodeWidthStr;

use super::style::Styles;
use crate::api::format::{
    description, format_height, format_name, format_number, format_weight, genus, localized_name,
    stat_label,
};
use crate::api::{ListItem, PokemonDetails};
use crate::details::DetailState;

/// Highest base stat any creature has; bars are scaled against it.
const STAT_CEILING: u32 = 255;
const BAR_WIDTH: usize = 24;

/// Everything the detail screen needs besides the record itself.
#[derive(Debug, Clone, Copy)]
pub struct DetailContext<'a> {
    /// Shared styles.
    pub styles: &'a Styles,
    /// Preferred language for names and descriptions.
    pub language: &'a str,
    /// Width available for wrapped text.
    pub width: usize,
    /// Current spinner frame.
    pub spinner: &'a str,
    /// Preceding creature in the visible listing, shown on the navigation line.
    pub prev: Option<&'a ListItem>,
    /// Following creature in the visible listing.
    pub next: Option<&'a ListItem>,
}

/// Renders the screen for `item` in whatever state its record is in.
#[must_use]
pub fn view(item: &ListItem, state: Option<&DetailState>, ctx: DetailContext<'_>) -> String {
    let heading = ctx.styles.title.render(&format!(
        "{} {}",
        format_number(item.id()),
        format_name(&item.name)
    ));
    let body = match state {
        Some(DetailState::Loaded(details)) => loaded(details, ctx),
        Some(DetailState::Failed(error)) => ctx.styles.error_panel.render(&format!(
            "{}\n{}",
            ctx.styles.error.clone().inline(true).render(&error.user_message()),
            ctx.styles.subdued.clone().inline(true).render("Press r to try again.")
        )),
        Some(DetailState::Loading) | None => format!("{}Loading details…", ctx.spinner),
    };
    match navigation(ctx) {
        Some(nav) => format!("{heading}\n{nav}\n\n{body}"),
        None => format!("{heading}\n\n{body}"),
    }
}

fn navigation(ctx: DetailContext<'_>) -> Option<String> {
    let label = |item: &ListItem| format!("{} {}", format_number(item.id()), format_name(&item.name));
    let parts: Vec<String> = [
        ctx.prev.map(|p| format!("‹ {}", label(p))),
        ctx.next.map(|n| format!("{} ›", label(n))),
    ]
    .into_iter()
    .flatten()
    .collect();
    if parts.is_empty() {
        return None;
    }
    Some(ctx.styles.subdued.clone().inline(true).render(&parts.join("   ")))
}

fn loaded(details: &PokemonDetails, ctx: DetailContext<'_>) -> String {
    let styles = ctx.styles;
    let pokemon = &details.pokemon;
    let mut lines = Vec::new();

    if let Some(species) = &details.species {
        let mut headline = styles
            .name
            .clone()
            .inline(true)
            .render(&localized_name(species, ctx.language));
        if let Some(genus) = genus(species, ctx.language) {
            headline.push_str(&format!(
                "  {}",
                styles.subtitle.clone().inline(true).render(&genus)
            ));
        }
        lines.push(headline);

        let mut tags = Vec::new();
        if let Some(generation) = &species.generation {
            tags.push(format_name(&generation.name));
        }
        if species.is_legendary {
            tags.push("Legendary".to_string());
        }
        if species.is_mythical {
            tags.push("Mythical".to_string());
        }
        if !tags.is_empty() {
            lines.push(styles.subdued.clone().inline(true).render(&tags.join(" · ")));
        }
    }

    let badges: Vec<String> = pokemon
        .type_names()
        .iter()
        .map(|t| styles.type_badge(t))
        .collect();
    lines.push(badges.join(" "));
    lines.push(String::new());

    let mut measures = vec![
        field(styles, "Height", &format_height(pokemon.height)),
        field(styles, "Weight", &format_weight(pokemon.weight)),
    ];
    if let Some(exp) = pokemon.base_experience {
        measures.push(field(styles, "Base exp", &exp.to_string()));
    }
    lines.push(measures.join("   "));

    if !pokemon.stats.is_empty() {
        lines.push(String::new());
        lines.push(styles.section.clone().inline(true).render("Base stats"));
        let total: u32 = pokemon.stats.iter().map(|s| s.base_stat).sum();
        for stat in &pokemon.stats {
            lines.push(format!(
                "{:<4}{:>4} {}",
                stat_label(&stat.stat.name),
                stat.base_stat,
                stat_bar(styles, stat.base_stat)
            ));
        }
        lines.push(format!("{:<4}{:>4}", "Tot", total));
    }

    if !pokemon.abilities.is_empty() {
        lines.push(String::new());
        lines.push(styles.section.clone().inline(true).render("Abilities"));
        let mut abilities: Vec<_> = pokemon.abilities.iter().collect();
        abilities.sort_by_key(|a| a.slot);
        let names: Vec<String> = abilities
            .iter()
            .map(|a| {
                let name = format_name(&a.ability.name);
                if a.is_hidden {
                    format!("{name} (hidden)")
                } else {
                    name
                }
            })
            .collect();
        lines.push(names.join(", "));
    }

    if let Some(text) = details
        .species
        .as_ref()
        .and_then(|species| description(species, ctx.language))
    {
        lines.push(String::new());
        lines.extend(wrap(&text, ctx.width.max(20)));
    }

    if let Some(url) = pokemon.artwork_url() {
        lines.push(String::new());
        lines.push(field(styles, "Artwork", url));
    }

    lines.join("\n")
}

fn field(styles: &Styles, label: &str, value: &str) -> String {
    format!(
        "{} {value}",
        styles.label.clone().inline(true).render(&format!("{label}:"))
    )
}

fn stat_bar(styles: &Styles, value: u32) -> String {
    let filled = filled_cells(value);
    format!(
        "{}{}",
        styles.stat_bar.clone().inline(true).render(&"█".repeat(filled)),
        styles
            .stat_bar_empty
            .clone()
            .inline(true)
            .render(&"░".repeat(BAR_WIDTH - filled))
    )
}

fn filled_cells(value: u32) -> usize {
    let clamped = value.min(STAT_CEILING) as usize;
    (clamped * BAR_WIDTH).div_ceil(STAT_CEILING as usize)
}

/// Greedy word wrap by display width.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.width()
        } else {
            current.width() + 1 + word.width()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{
        FlavorText, Genus, NamedResource, PokemonAbility, PokemonSprites, PokemonStat,
        PokemonType,
    };
    use crate::api::{Pokemon, PokemonSpecies};
    use crate::error::PokedexError;

    fn named(name: &str) -> NamedResource {
        NamedResource {
            name: name.to_string(),
            url: String::new(),
        }
    }

    fn pikachu() -> PokemonDetails {
        PokemonDetails {
            pokemon: Pokemon {
                id: 25,
                name: "pikachu".into(),
                base_experience: Some(112),
                height: 4,
                weight: 60,
                abilities: vec![
                    PokemonAbility {
                        ability: named("lightning-rod"),
                        is_hidden: true,
                        slot: 3,
                    },
                    PokemonAbility {
                        ability: named("static"),
                        is_hidden: false,
                        slot: 1,
                    },
                ],
                sprites: PokemonSprites::default(),
                stats: vec![
                    PokemonStat {
                        base_stat: 35,
                        effort: 0,
                        stat: named("hp"),
                    },
                    PokemonStat {
                        base_stat: 90,
                        effort: 2,
                        stat: named("speed"),
                    },
                ],
                types: vec![PokemonType {
                    slot: 1,
                    kind: named("electric"),
                }],
            },
            species: Some(PokemonSpecies {
                id: 25,
                name: "pikachu".into(),
                is_legendary: false,
                is_mythical: false,
                generation: Some(named("generation-i")),
                names: Vec::new(),
                genera: vec![Genus {
                    genus: "Mouse Pokémon".into(),
                    language: named("en"),
                }],
                flavor_text_entries: vec![FlavorText {
                    flavor_text: "When several of\nthese POKéMON gather,\u{c}their electricity could build and cause lightning storms.".into(),
                    language: named("en"),
                    version: None,
                }],
            }),
        }
    }

    fn ctx(styles: &Styles) -> DetailContext<'_> {
        DetailContext {
            styles,
            language: "fr",
            width: 40,
            spinner: "* ",
            prev: None,
            next: None,
        }
    }

    fn plain(s: String) -> String {
        String::from_utf8(strip_ansi_escapes::strip(s)).unwrap()
    }

    fn item() -> ListItem {
        ListItem::new("pikachu", "https://pokeapi.co/api/v2/pokemon/25/")
    }

    #[test]
    fn loaded_record_shows_every_section() {
        let styles = Styles::default();
        let state = DetailState::Loaded(Box::new(pikachu()));
        let out = plain(view(&item(), Some(&state), ctx(&styles)));

        assert!(out.contains("#025 Pikachu"));
        assert!(out.contains("Mouse Pokémon"), "genus falls back to English");
        assert!(out.contains("Generation I"));
        assert!(out.contains("Electric"));
        assert!(out.contains("Height: 0.4 m"));
        assert!(out.contains("Weight: 6.0 kg"));
        assert!(out.contains("Base exp: 112"));
        assert!(out.contains("HP    35"));
        assert!(out.contains("Tot  125"));
        assert!(out.contains("Static, Lightning Rod (hidden)"));
        assert!(out.contains("When several of these"));
        assert!(out.lines().all(|l| !l.contains('\u{c}')));
    }

    #[test]
    fn loading_and_failure_states() {
        let styles = Styles::default();
        let out = plain(view(&item(), Some(&DetailState::Loading), ctx(&styles)));
        assert!(out.contains("* Loading details…"));

        let failed = DetailState::Failed(PokedexError::Timeout {
            endpoint: "pokemon/25".into(),
        });
        let out = plain(view(&item(), Some(&failed), ctx(&styles)));
        assert!(out.contains("Press r to try again."));
    }

    #[test]
    fn navigation_line_names_the_neighbours() {
        let styles = Styles::default();
        let out = plain(view(&item(), None, ctx(&styles)));
        assert!(!out.contains('‹') && !out.contains('›'));

        let raichu = ListItem::new("raichu", "https://pokeapi.co/api/v2/pokemon/26/");
        let out = plain(view(
            &item(),
            None,
            DetailContext {
                next: Some(&raichu),
                ..ctx(&styles)
            },
        ));
        assert!(out.contains("#026 Raichu ›"), "{out}");
        assert!(!out.contains('‹'));
    }

    #[test]
    fn stat_bars_scale_and_clamp() {
        assert_eq!(filled_cells(0), 0);
        assert_eq!(filled_cells(255), BAR_WIDTH);
        assert_eq!(filled_cells(999), BAR_WIDTH);
        assert_eq!(filled_cells(1), 1);
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("one two three four five six", 9);
        assert_eq!(lines, ["one two", "three", "four five", "six"]);
        assert!(wrap("", 10).is_empty());
    }
}
