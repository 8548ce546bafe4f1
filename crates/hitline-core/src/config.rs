//! Configuration types for hitline.
//!
//! [`Config::load`] reads `~/.config/hitline/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;

use crate::layout::TimelineParams;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[ui]
show_details            = true
details_pane_height_pct = 40
theme                   = "default"

[timeline]
spacing          = 200
left_padding     = 200
min_separation   = 140
lane_count       = 5
lookback         = 50
buffer_slots     = 50
units_per_column = 10

[load]
chunk_size = 500
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/hitline/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_show_details")]
    pub show_details: bool,
    #[serde(default = "default_details_pane_height_pct")]
    pub details_pane_height_pct: u16,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_show_details() -> bool { true }
fn default_details_pane_height_pct() -> u16 { 40 }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_details: default_show_details(),
            details_pane_height_pct: default_details_pane_height_pct(),
            theme: default_theme(),
        }
    }
}

/// `[timeline]` section of `config.toml`. Distances are layout units.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_spacing")]
    pub spacing: u64,
    #[serde(default = "default_left_padding")]
    pub left_padding: u64,
    #[serde(default = "default_min_separation")]
    pub min_separation: u64,
    #[serde(default = "default_lane_count")]
    pub lane_count: usize,
    #[serde(default = "default_lookback")]
    pub lookback: usize,
    #[serde(default = "default_buffer_slots")]
    pub buffer_slots: u64,
    /// Layout units drawn per terminal column.
    #[serde(default = "default_units_per_column")]
    pub units_per_column: u64,
}

fn default_spacing() -> u64 { 200 }
fn default_left_padding() -> u64 { 200 }
fn default_min_separation() -> u64 { 140 }
fn default_lane_count() -> usize { 5 }
fn default_lookback() -> usize { 50 }
fn default_buffer_slots() -> u64 { 50 }
fn default_units_per_column() -> u64 { 10 }

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            left_padding: default_left_padding(),
            min_separation: default_min_separation(),
            lane_count: default_lane_count(),
            lookback: default_lookback(),
            buffer_slots: default_buffer_slots(),
            units_per_column: default_units_per_column(),
        }
    }
}

impl TimelineConfig {
    pub fn params(&self) -> TimelineParams {
        TimelineParams {
            spacing: self.spacing.max(1),
            left_padding: self.left_padding,
            min_separation: self.min_separation,
            lane_count: self.lane_count.max(1),
            lookback: self.lookback,
            buffer_slots: self.buffer_slots,
        }
    }
}

/// `[load]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize { crate::corpus::DEFAULT_CHUNK_SIZE }

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/hitline/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("hitline")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
