//! Config-file source discovery.
//!
//! Precedence: explicit path > local `./cmdset.toml` > global
//! `<config dir>/cmdset/cmdset.toml` > built-in defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name looked up locally and under the global config directory.
pub(super) const CONFIG_FILE_NAME: &str = "cmdset.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ConfigSource {
    /// Loaded from the `--config` path.
    Explicit(PathBuf),
    /// Loaded from `./cmdset.toml`.
    Local,
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No file found.
    BuiltInDefaults,
}

/// Read config text from the highest-precedence available source.
///
/// An explicit path must be readable; missing local/global files fall through.
pub(super) fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(Option<String>, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((Some(text), ConfigSource::Explicit(path)));
    }

    if let Ok(text) = read_file(Path::new(CONFIG_FILE_NAME)) {
        return Ok((Some(text), ConfigSource::Local));
    }

    if let Some(dir) = config_root() {
        let global = dir.join("cmdset").join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((Some(text), ConfigSource::Global(global)));
        }
    }

    Ok((None, ConfigSource::BuiltInDefaults))
}
