//! Unified error types for the command registry.

use std::fmt;

// ---------------------------------------------------------------------------
// CommandError
// ---------------------------------------------------------------------------

/// Errors surfaced to the caller of the dispatcher.
///
/// User-facing conditions (missing arguments, stubbed commands, install
/// diagnostics) are written to the context output instead and never show up
/// here.
#[derive(Debug)]
pub enum CommandError {
    /// Name resolution failed at the top level of a dispatch.
    NoSuchCommand { name: String, set: String },
    /// A command was defined or aliased with an empty name.
    InvalidName(String),
    /// A handler asked for a helper that no applied bag provides.
    NoSuchHelper(String),
    /// A handler reported a failure of its own.
    Failed(String),
    /// Writing to the context output failed.
    Io(std::io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchCommand { name, set } => {
                write!(f, "command `{name}` not found in command set `{set}`")
            }
            Self::InvalidName(msg) => write!(f, "invalid command name: {msg}"),
            Self::NoSuchHelper(name) => write!(f, "no helper named `{name}`"),
            Self::Failed(msg) => write!(f, "{msg}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// InstallError
// ---------------------------------------------------------------------------

/// Errors from the package installer collaborator.
#[derive(Debug)]
pub enum InstallError {
    /// The package index has no package with this name.
    NotFound(String),
    /// The installer ran but did not succeed.
    Failed(String),
    Io(std::io::Error),
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "package `{name}` not found"),
            Self::Failed(msg) => write!(f, "{msg}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for InstallError {}

impl From<std::io::Error> for InstallError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_command_names_command_and_set() {
        let e = CommandError::NoSuchCommand {
            name: "zzz".into(),
            set: "main".into(),
        };
        assert_eq!(
            e.to_string(),
            "command `zzz` not found in command set `main`"
        );
    }

    #[test]
    fn handler_failure_displays_message_verbatim() {
        assert_eq!(CommandError::Failed("boom".into()).to_string(), "boom");
    }

    #[test]
    fn command_error_from_io_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let e = CommandError::from(io_err);
        assert!(e.to_string().starts_with("io:"), "got: {e}");
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn install_error_not_found_display() {
        assert_eq!(
            InstallError::NotFound("absent".into()).to_string(),
            "package `absent` not found"
        );
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn config_error_invalid_message() {
        let e = ConfigError::Invalid("unknown installer `apt`".into());
        assert_eq!(e.to_string(), "invalid config: unknown installer `apt`");
    }
}
