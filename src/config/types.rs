//! Configuration data model.

use serde::Deserialize;

/// Prompt shown by the interactive loop when none is configured.
pub const DEFAULT_PROMPT: &str = "cmdset> ";
/// Name given to the host's command set when none is configured.
pub const DEFAULT_SET_NAME: &str = "main";

/// Which package installer backs the dependency gate and `install`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InstallerBackend {
    /// In-memory lists from `[packages]`.
    #[default]
    Offline,
    /// `cargo install`.
    Cargo,
}

impl InstallerBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "offline" => Some(Self::Offline),
            "cargo" => Some(Self::Cargo),
            _ => None,
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub repl: ReplConfig,
    pub packages: PackagesConfig,
}

/// Interactive loop settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
    /// Name reported in "not found" errors for the host's set.
    pub set_name: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            set_name: DEFAULT_SET_NAME.to_string(),
        }
    }
}

/// Package installer settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackagesConfig {
    pub installer: InstallerBackend,
    /// Offline backend: packages treated as already installed.
    pub installed: Vec<String>,
    /// Offline backend: packages `install` can fetch.
    pub available: Vec<String>,
}
