//! Built-in `help` and `install` commands.

use std::fmt::Write as _;
use std::rc::Rc;

use crate::command::{Args, Arity, CommandOptions, CommandResult};
use crate::context::Context;
use crate::error::{CommandError, InstallError};
use crate::packages::PackageInstaller;
use crate::set::CommandSet;

/// Column at which `help` starts command descriptions.
pub const HELP_NAME_WIDTH: usize = 18;

/// Name of the set returned by [`default_commands`].
pub const DEFAULTS_SET_NAME: &str = "default";

/// Build the set holding `help` and `install`.
pub fn default_commands(installer: Rc<dyn PackageInstaller>) -> Result<CommandSet, CommandError> {
    let mut set = CommandSet::new(DEFAULTS_SET_NAME, installer);
    set.define(
        "help",
        "This menu.",
        CommandOptions::new().with_arity(Arity::Fixed(1)),
        help,
    )?;
    set.define(
        "install",
        "Install a disabled command.",
        CommandOptions::new()
            .with_arity(Arity::Fixed(1))
            .with_argument_required(true),
        install,
    )?;
    Ok(set)
}

fn help(ctx: &mut Context, set: &CommandSet, args: &Args) -> CommandResult {
    let Some(name) = args.get(0) else {
        let mut text = String::from("Command List: \n");
        for (name, command) in set.commands() {
            let description = command.description();
            if description.is_empty() {
                continue;
            }
            let _ = writeln!(text, "{name:<width$}{description}", width = HELP_NAME_WIDTH);
        }
        ctx.stagger_output(&text)?;
        return Ok(None);
    };

    match set.find(name) {
        Some(command) => ctx.puts(command.description())?,
        None => ctx.puts(format!("No info for command: {name}"))?,
    }
    Ok(None)
}

fn install(ctx: &mut Context, set: &CommandSet, args: &Args) -> CommandResult {
    let Some(name) = args.get(0) else {
        return Ok(None);
    };
    let command = set
        .find(name)
        .cloned()
        .ok_or_else(|| set.no_such_command(name))?;

    if !command.options().is_stub() {
        ctx.puts("Not a command stub. Nothing to do.")?;
        return Ok(None);
    }
    let gems = command.options().requires_gem().to_vec();

    ctx.puts(format!("Attempting to install `{name}` command..."))?;
    let installer = set.installer();
    let mut failed = false;
    for gem in gems.iter().filter(|gem| !installer.is_installed(gem)) {
        ctx.puts(format!("Installing `{gem}` gem..."))?;
        match installer.install(gem) {
            Ok(()) => tracing::debug!(package = %gem, "installed"),
            Err(InstallError::NotFound(_)) => {
                tracing::warn!(package = %gem, command = name, "package not found");
                ctx.puts(format!(
                    "Required Gem: `{gem}` not found. Aborting command installation."
                ))?;
                failed = true;
            }
            Err(err) => {
                tracing::warn!(package = %gem, command = name, error = %err, "install failed");
                ctx.puts(format!("Installation of `{gem}` failed: {err}"))?;
                failed = true;
            }
        }
    }
    if failed {
        return Ok(None);
    }

    installer.refresh();
    command.options_mut().clear_stub_info();
    ctx.puts(format!(
        "Installation of `{name}` successful! Type `help {name}` for information"
    ))?;
    Ok(None)
}
