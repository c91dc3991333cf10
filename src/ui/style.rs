//! Colors and styles for the viewer.

use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Separator between items on one line.
pub const BULLET: &str = "•";

/// Badge color used for unknown types.
pub const FALLBACK_TYPE_COLOR: &str = "#68A090";

/// Badge background for a type name.
#[must_use]
pub fn type_color(type_name: &str) -> &'static str {
    match type_name {
        "normal" => "#A8A878",
        "fire" => "#F08030",
        "water" => "#6890F0",
        "electric" => "#F8D030",
        "grass" => "#78C850",
        "ice" => "#98D8D8",
        "fighting" => "#C03028",
        "poison" => "#A040A0",
        "ground" => "#E0C068",
        "flying" => "#A890F0",
        "psychic" => "#F85888",
        "bug" => "#A8B820",
        "rock" => "#B8A038",
        "ghost" => "#705898",
        "dragon" => "#7038F8",
        "dark" => "#705848",
        "steel" => "#B8B8D0",
        "fairy" => "#EE99AC",
        _ => FALLBACK_TYPE_COLOR,
    }
}

/// Every style the screens use.
#[derive(Debug, Clone)]
pub struct Styles {
    /// App title.
    pub title: Style,
    /// Secondary heading text.
    pub subtitle: Style,
    /// Card border.
    pub card: Style,
    /// Highlighted card border.
    pub card_selected: Style,
    /// Dex number.
    pub number: Style,
    /// Creature name.
    pub name: Style,
    /// Part of a name matching the search.
    pub name_match: Style,
    /// Hints and secondary text.
    pub subdued: Style,
    /// Error text.
    pub error: Style,
    /// Box around error messages.
    pub error_panel: Style,
    /// Status line.
    pub status: Style,
    /// Spinner frame.
    pub spinner: Style,
    /// Search prompt.
    pub prompt: Style,
    /// Search placeholder.
    pub placeholder: Style,
    /// Search cursor.
    pub cursor: Style,
    /// Labels in the controls bar.
    pub label: Style,
    /// Selected items in the filter panel.
    pub active: Style,
    /// Filled part of a stat bar.
    pub stat_bar: Style,
    /// Empty part of a stat bar.
    pub stat_bar_empty: Style,
    /// Section headings.
    pub section: Style,
}

impl Default for Styles {
    fn default() -> Self {
        let subdued_color = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        let accent = AdaptiveColor {
            Light: "#EE6FF8",
            Dark: "#EE6FF8",
        };
        let error_color = AdaptiveColor {
            Light: "#D0312D",
            Dark: "#FF5F5F",
        };

        let card = Style::new()
            .border_style(lipgloss::normal_border())
            .border_foreground(Color::from("#5C5C5C"))
            .padding(0, 1, 0, 1);

        Self {
            title: Style::new()
                .background(Color::from("#E3350D"))
                .foreground(Color::from("230"))
                .bold(true)
                .padding(0, 1, 0, 1),
            subtitle: Style::new().foreground(subdued_color.clone()),
            card_selected: card.clone().border_foreground(Color::from("#EE6FF8")),
            card,
            number: Style::new().foreground(subdued_color.clone()),
            name: Style::new().bold(true),
            name_match: Style::new().underline(true).foreground(accent.clone()),
            subdued: Style::new().foreground(subdued_color.clone()),
            error: Style::new().foreground(error_color),
            error_panel: Style::new()
                .border_style(lipgloss::normal_border())
                .border_foreground(Color::from("#FF5F5F"))
                .padding(0, 2, 0, 2),
            status: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
            spinner: Style::new().foreground(AdaptiveColor {
                Light: "#8E8E8E",
                Dark: "#747373",
            }),
            prompt: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            placeholder: Style::new().foreground(subdued_color.clone()),
            cursor: Style::new().reverse(true),
            label: Style::new().foreground(subdued_color.clone()),
            active: Style::new().foreground(accent).bold(true),
            stat_bar: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#04B575",
            }),
            stat_bar_empty: Style::new().foreground(subdued_color),
            section: Style::new().bold(true).underline(true),
        }
    }
}

impl Styles {
    /// Colored badge for a type name.
    #[must_use]
    pub fn type_badge(&self, type_name: &str) -> String {
        Style::new()
            .background(Color::from(type_color(type_name)))
            .foreground(Color::from("#FFFFFF"))
            .padding(0, 1, 0, 1)
            .render(&crate::api::format::format_name(type_name))
    }
}
