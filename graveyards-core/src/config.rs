//! Configuration for the graveyards addon.
//!
//! Maps directly to `graveyards.toml`. Every field has a default, so an
//! empty file (or no file at all) yields a working configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraveyardsConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Where graveyard documents live.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Death matching and site placement.
    #[serde(default)]
    pub placement: PlacementConfig,
    /// Protection applied to graves placed in graveyards.
    #[serde(default)]
    pub protection: ProtectionConfig,
    /// Player-facing message formatting.
    #[serde(default)]
    pub messages: MessagesConfig,
}

impl GraveyardsConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `GraveyardError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::GraveyardError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether graveyard handling is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Document storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory (relative to the addon data folder) holding one document
    /// per graveyard.
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: "Graveyards".to_string(),
        }
    }
}

/// Death matching and placement offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// A death belongs to a graveyard when it happens within this distance
    /// of one of the graveyard's sites (same world).
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Blocks above the issuer's feet where `addsite` places a site.
    #[serde(default = "default_1_i64")]
    pub site_height_offset: i64,
    /// Blocks above the issuer's feet recorded by `pos1`/`pos2`.
    #[serde(default = "default_1_i64")]
    pub corner_height_offset: i64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            site_height_offset: 1,
            corner_height_offset: 1,
        }
    }
}

/// Grave protection handed to the grave plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionConfig {
    /// Whether graveyard graves are protected.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Protection length in seconds; absent means unlimited.
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

impl ProtectionConfig {
    /// Protection length, `None` for unlimited.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::from_secs)
    }
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_secs: None,
        }
    }
}

/// Player-facing message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// Prefix prepended to every message sent to a player.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_true() -> bool { true }
fn default_log_level() -> String { "info".to_string() }
fn default_directory() -> String { "Graveyards".to_string() }
fn default_prefix() -> String { "\u{2620} ".to_string() }
fn default_radius() -> f64 { 5.0 }
fn default_1_i64() -> i64 { 1 }
