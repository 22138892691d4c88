//! Dependency gate applied when a command is defined.

use crate::command::{CommandOptions, StubInfo};
use crate::packages::PackageInstaller;

/// Put `options` into stub mode when any required package is missing.
///
/// `command` is the canonical name used in the stub message. Options with
/// no requirements, or whose requirements are all installed, pass through.
pub(crate) fn apply(command: &str, options: &mut CommandOptions, installer: &dyn PackageInstaller) {
    let needed = options.requires_gem().to_vec();
    let missing: Vec<String> = needed
        .iter()
        .filter(|gem| !installer.is_installed(gem))
        .cloned()
        .collect();
    if missing.is_empty() {
        return;
    }

    tracing::debug!(command, ?missing, "stubbing command with unmet packages");
    options.set_stub_info(StubInfo {
        command: command.to_string(),
        needed,
        missing,
    });
}
