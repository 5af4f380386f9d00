//! Operator configuration.
//!
//! Owned by the host plugin framework and read-only to this crate. Every
//! top-level provider operation receives one `Configuration` reference
//! and treats it as a consistent snapshot for the whole call; mappers
//! never reach for ambient state.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Channel list ordering applied before the guide-visibility filter.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelSorting {
    /// Keep the backend's group display order.
    #[default]
    GroupOrder,
    /// Sort by channel title.
    Title,
    /// Sort by numeric channel id.
    Id,
}

/// One entry of the operator-supplied genre table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreMapping {
    /// Backend genre text (matched case-insensitively).
    pub genre: String,
    /// Canonical tags to attach.
    pub tags: Vec<String>,
}

/// Provider configuration snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct Configuration {
    /// Channel group whose member order drives the channel list.
    #[serde(default)]
    pub default_channel_group: Option<i32>,
    /// Channel list ordering.
    #[serde(default)]
    pub channel_sort_order: ChannelSorting,
    /// Whether recording files are read directly from disk.
    #[serde(default)]
    pub enable_direct_access: bool,
    /// Whether direct access paths need prefix substitution.
    #[serde(default)]
    pub requires_path_substitution: bool,
    /// Path prefix as the backend reports it.
    #[serde(default)]
    pub local_file_path: String,
    /// Path prefix as this host reaches it.
    #[serde(default)]
    pub remote_file_path: String,
    /// Genre classification table.
    #[serde(default)]
    pub genre_mappings: Vec<GenreMapping>,
}

impl Configuration {
    /// Loads configuration from a TOML file. Returns defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
