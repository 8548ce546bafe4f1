//! Colour theme for the hitline TUI.
//!
//! Themes are defined as TOML files. Both built-in themes are embedded in the
//! binary via [`include_str!`] so the application works without any files on
//! disk. Call [`Theme::by_name`] at startup and pass the result through the
//! application as a shared reference.
//!
//! # Colour assignment for services
//!
//! Service names are hashed to a stable index into the palette so the same
//! service always gets the same colour within a session, regardless of the
//! order in which services appear.

use config::{Config, File, FileFormat};
use hitline_core::present::Category;
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

const DEFAULT_THEME_SRC: &str = include_str!("themes/default.toml");
const GRUVBOX_DARK_THEME_SRC: &str = include_str!("themes/gruvbox_dark.toml");

// ---------------------------------------------------------------------------
// Raw (serde) types: mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    bg: Option<String>,
    #[serde(default)]
    bold: bool,
    #[serde(default)]
    dim: bool,
    #[serde(default)]
    italic: bool,
    #[serde(default)]
    underlined: bool,
}

impl RawStyle {
    fn into_style(self) -> Style {
        let modifiers = [
            (self.bold, Modifier::BOLD),
            (self.dim, Modifier::DIM),
            (self.italic, Modifier::ITALIC),
            (self.underlined, Modifier::UNDERLINED),
        ]
        .into_iter()
        .filter(|(on, _)| *on)
        .fold(Modifier::empty(), |acc, (_, m)| acc | m);

        let mut style = Style::default().add_modifier(modifiers);
        if let Some(c) = self.fg.as_deref().and_then(parse_color) {
            style = style.fg(c);
        }
        if let Some(c) = self.bg.as_deref().and_then(parse_color) {
            style = style.bg(c);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawCategories {
    error: RawStyle,
    warning: RawStyle,
    payment: RawStyle,
    cart: RawStyle,
    api: RawStyle,
    info: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawBorders {
    focused: RawStyle,
    command_bar: RawStyle,
    unfocused: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    highlight: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawTimeline {
    selected: RawStyle,
    current_match: RawStyle,
    #[serde(rename = "match")]
    matched: RawStyle,
    axis: RawStyle,
    label: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawServices {
    palette: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    categories: RawCategories,
    borders: RawBorders,
    search: RawSearch,
    timeline: RawTimeline,
    services: RawServices,
}

// ---------------------------------------------------------------------------
// Public Theme type
// ---------------------------------------------------------------------------

/// Application colour theme.
///
/// All styles are pre-resolved ratatui [`Style`] values, so nothing is
/// parsed at render time.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Styles for each record category.
    pub category_error: Style,
    pub category_warning: Style,
    pub category_payment: Style,
    pub category_cart: Style,
    pub category_api: Style,
    pub category_info: Style,

    /// Border style for the currently focused pane.
    pub border_focused: Style,
    /// Border style for the command bar pane
    pub border_command_bar: Style,
    /// Border style for unfocused panes.
    pub border_unfocused: Style,

    /// Inline highlight applied to matched search spans.
    pub search_highlight: Style,

    /// The selected timeline box.
    pub selected: Style,
    /// The box under the match cursor.
    pub current_match: Style,
    /// Patched onto every other box in the match set.
    pub matched: Style,
    /// Axis and lane guides.
    pub axis: Style,
    /// Secondary text (field names, dates).
    pub label: Style,

    /// Ordered colour palette used for service colour cycling.
    service_palette: Vec<Color>,
}

impl Theme {
    /// Load and parse the embedded default theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which the unit tests rule out.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_THEME_SRC).expect("embedded default theme must be valid TOML")
    }

    /// Load and parse the embedded Gruvbox Dark theme.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_gruvbox_dark() -> Self {
        Self::from_toml_str(GRUVBOX_DARK_THEME_SRC)
            .expect("embedded gruvbox dark theme must be valid TOML")
    }

    /// Resolve a theme by its config/command name. Unknown names fall back to
    /// the default theme.
    pub fn by_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gruvbox" | "gruvbox_dark" | "gruvbox-dark" => Self::load_gruvbox_dark(),
            _ => Self::load_default(),
        }
    }

    /// Parse a theme from a TOML string.
    ///
    /// Unknown keys are ignored so user themes stay forward-compatible.
    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawTheme = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(Self {
            category_error: raw.categories.error.into_style(),
            category_warning: raw.categories.warning.into_style(),
            category_payment: raw.categories.payment.into_style(),
            category_cart: raw.categories.cart.into_style(),
            category_api: raw.categories.api.into_style(),
            category_info: raw.categories.info.into_style(),
            border_focused: raw.borders.focused.into_style(),
            border_command_bar: raw.borders.command_bar.into_style(),
            border_unfocused: raw.borders.unfocused.into_style(),
            search_highlight: raw.search.highlight.into_style(),
            selected: raw.timeline.selected.into_style(),
            current_match: raw.timeline.current_match.into_style(),
            matched: raw.timeline.matched.into_style(),
            axis: raw.timeline.axis.into_style(),
            label: raw.timeline.label.into_style(),
            service_palette: raw
                .services
                .palette
                .iter()
                .filter_map(|s| parse_color(s))
                .collect(),
        })
    }

    pub fn category_style(&self, category: Category) -> Style {
        match category {
            Category::Error => self.category_error,
            Category::Warning => self.category_warning,
            Category::Payment => self.category_payment,
            Category::Cart => self.category_cart,
            Category::Api => self.category_api,
            Category::Info => self.category_info,
        }
    }

    /// Stable colour for a service name.
    pub fn service_style(&self, service: &str) -> Style {
        if self.service_palette.is_empty() {
            return Style::default();
        }
        let idx = stable_hash(service) % self.service_palette.len();
        Style::default().fg(self.service_palette[idx])
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// djb2 over the bytes, so colours survive restarts.
fn stable_hash(s: &str) -> usize {
    s.bytes()
        .fold(5381usize, |acc, b| (acc << 5).wrapping_add(acc).wrapping_add(b as usize))
}

/// Colour names as ratatui spells them (`dark_gray`, `light_red`, `#rrggbb`,
/// a bare index), plus `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    match s.strip_prefix("indexed:") {
        Some(n) => n.parse().ok().map(Color::Indexed),
        None => s.parse().ok(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
