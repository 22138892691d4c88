//! Package installer collaborators.
//!
//! The dependency gate asks an installer whether a command's packages are
//! present; the `install` command asks it to fetch the missing ones.
//! `OfflineInstaller` keeps everything in memory, `CargoInstaller` drives
//! `cargo install`.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::process::Command;
use std::rc::Rc;

use crate::config::{InstallerBackend, PackagesConfig};
use crate::error::InstallError;

/// Host-side package manager consulted by the gate and by `install`.
pub trait PackageInstaller {
    fn is_installed(&self, name: &str) -> bool;
    /// Install `name`. Fails with [`InstallError::NotFound`] when the index
    /// has no such package.
    fn install(&self, name: &str) -> Result<(), InstallError>;
    /// Re-read whatever the installer caches about installed packages.
    fn refresh(&self);
}

/// In-memory installer with fixed `installed` and `available` sets.
#[derive(Debug, Default)]
pub struct OfflineInstaller {
    installed: RefCell<BTreeSet<String>>,
    available: BTreeSet<String>,
}

impl OfflineInstaller {
    pub fn new<I, A>(installed: I, available: A) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            installed: RefCell::new(installed.into_iter().map(Into::into).collect()),
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark a package installed without going through `install`.
    pub fn mark_installed(&self, name: &str) {
        self.installed.borrow_mut().insert(name.to_string());
    }
}

impl PackageInstaller for OfflineInstaller {
    fn is_installed(&self, name: &str) -> bool {
        self.installed.borrow().contains(name)
    }

    fn install(&self, name: &str) -> Result<(), InstallError> {
        if !self.available.contains(name) {
            return Err(InstallError::NotFound(name.to_string()));
        }
        self.mark_installed(name);
        Ok(())
    }

    fn refresh(&self) {}
}

/// Installer backed by `cargo install`.
#[derive(Debug)]
pub struct CargoInstaller {
    program: String,
    cache: RefCell<Option<BTreeSet<String>>>,
}

impl Default for CargoInstaller {
    fn default() -> Self {
        Self::new("cargo")
    }
}

impl CargoInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cache: RefCell::new(None),
        }
    }

    fn installed_packages(&self) -> BTreeSet<String> {
        if let Some(cached) = self.cache.borrow().as_ref() {
            return cached.clone();
        }
        let listed = match Command::new(&self.program).args(["install", "--list"]).output() {
            Ok(output) if output.status.success() => {
                parse_install_list(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(output) => {
                tracing::warn!(status = %output.status, "`cargo install --list` failed");
                BTreeSet::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not run `{} install --list`", self.program);
                BTreeSet::new()
            }
        };
        *self.cache.borrow_mut() = Some(listed.clone());
        listed
    }
}

impl PackageInstaller for CargoInstaller {
    fn is_installed(&self, name: &str) -> bool {
        self.installed_packages().contains(name)
    }

    fn install(&self, name: &str) -> Result<(), InstallError> {
        tracing::debug!(package = name, "running cargo install");
        let output = Command::new(&self.program)
            .args(["install", name])
            .output()?;
        if output.status.success() {
            self.refresh();
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_found(&stderr) {
            return Err(InstallError::NotFound(name.to_string()));
        }
        let reason = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("cargo install failed")
            .trim()
            .to_string();
        Err(InstallError::Failed(reason))
    }

    fn refresh(&self) {
        self.cache.borrow_mut().take();
    }
}

/// Build the installer selected by `[packages]`.
pub fn installer_for(config: &PackagesConfig) -> Rc<dyn PackageInstaller> {
    match config.installer {
        InstallerBackend::Offline => Rc::new(OfflineInstaller::new(
            config.installed.iter().cloned(),
            config.available.iter().cloned(),
        )),
        InstallerBackend::Cargo => Rc::new(CargoInstaller::default()),
    }
}

/// Parse `cargo install --list` output into package names.
///
/// Package lines are unindented (`name v1.2.3:`); binaries are indented.
fn parse_install_list(text: &str) -> BTreeSet<String> {
    text.lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("could not find") || stderr.contains("no matching package")
}
