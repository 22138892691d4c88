//! Compile-time build metadata exposed to the CLI.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("CMDSET_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("CMDSET_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `cmdset --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("CMDSET_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("CMDSET_BUILD_TIMESTAMP")
);

/// Render the one-line banner shown when the interactive loop starts.
pub fn banner_line() -> String {
    format!("cmdset v{VERSION} ({GIT_COMMIT}). Type `help` for commands, `exit` to leave.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_line_mentions_version_and_commit() {
        let text = banner_line();
        assert!(text.starts_with("cmdset v"));
        assert!(text.contains(VERSION));
        assert!(text.contains(GIT_COMMIT));
    }

    #[test]
    fn help_metadata_lists_commit_and_build_time() {
        assert!(HELP_BUILD_METADATA.contains("commit:"));
        assert!(HELP_BUILD_METADATA.contains("built:"));
    }
}
