//! Configuration loading from TOML files and environment variables.
//!
//! Precedence (highest wins):
//! 1. Environment variables (`CMDSET_PROMPT`, `CMDSET_INSTALLER`).
//! 2. TOML file given via `--config`.
//! 3. `./cmdset.toml` in the current directory.
//! 4. `$XDG_CONFIG_HOME/cmdset/cmdset.toml` (or the platform equivalent).
//! 5. Built-in defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

mod sources;
mod types;

pub use types::{
    Config, InstallerBackend, PackagesConfig, ReplConfig, DEFAULT_PROMPT, DEFAULT_SET_NAME,
};

/// Environment variable overriding `[repl] prompt`.
pub const ENV_PROMPT: &str = "CMDSET_PROMPT";
/// Environment variable overriding `[packages] installer`.
pub const ENV_INSTALLER: &str = "CMDSET_INSTALLER";

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        dirs::config_dir,
    )
}

pub(crate) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = sources::read_config_text(path_override, &read_file, &config_root)?;
    tracing::debug!(?source, "config source");
    let mut config = match text {
        Some(text) => toml::from_str::<Config>(&text)?,
        None => Config::default(),
    };
    apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    Ok(config)
}

fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(prompt) = env_lookup(ENV_PROMPT) {
        config.repl.prompt = prompt;
    }
    if let Some(raw) = env_lookup(ENV_INSTALLER) {
        config.packages.installer = InstallerBackend::parse(&raw).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "{ENV_INSTALLER} must be `offline` or `cargo`, got `{raw}`"
            ))
        })?;
    }
    Ok(())
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.repl.set_name.trim().is_empty() {
        return Err(ConfigError::Invalid("repl.set_name must not be empty".into()));
    }
    Ok(())
}
