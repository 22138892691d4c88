//! Dispatcher: resolve a name in a set and run it, directly or piped.
//!
//! A token `|` followed by a command the host recognizes splits the line.
//! The left command runs with its output captured; the right command is then
//! dispatched with the captured text as its first argument, followed by its
//! own tokens. A `|` whose right-hand side is not a command is passed through
//! as an ordinary argument.

use crate::command::{Command, CommandResult};
use crate::context::Context;
use crate::set::CommandSet;

/// Token that separates piped commands.
pub const PIPE_TOKEN: &str = "|";

/// A line split at its first usable pipe.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PipeSplit<'a> {
    left: &'a [String],
    right_name: &'a str,
    right_args: &'a [String],
}

impl CommandSet {
    /// Run `name` with `args` against `ctx`.
    ///
    /// Unknown names fail with [`crate::CommandError::NoSuchCommand`].
    /// A command that requires arguments and got none prints a notice and
    /// returns without running. Handler errors propagate unchanged.
    pub fn run(&self, ctx: &mut Context, name: &str, args: &[String]) -> CommandResult {
        ctx.apply_helpers(self.helper_bag());

        let command = self
            .find(name)
            .cloned()
            .ok_or_else(|| self.no_such_command(name))?;

        if command.options().argument_required() && args.is_empty() {
            ctx.puts(format!("The command '{name}' requires an argument."))?;
            return Ok(None);
        }

        match split_pipe(ctx, args) {
            Some(pipe) => self.run_piped(ctx, &command, pipe),
            None => {
                tracing::debug!(set = %self.name(), command = name, argc = args.len(), "run");
                command.invoke(ctx, self, args)
            }
        }
    }

    fn run_piped(
        &self,
        ctx: &mut Context,
        command: &Command,
        pipe: PipeSplit<'_>,
    ) -> CommandResult {
        tracing::debug!(
            set = %self.name(),
            from = command.name(),
            to = pipe.right_name,
            "pipe"
        );
        let captured = {
            let mut redirect = ctx.redirect_output();
            command.invoke(&mut redirect, self, pipe.left)?;
            redirect.captured()
        };

        let mut right_args = Vec::with_capacity(pipe.right_args.len() + 1);
        right_args.push(captured.trim_end_matches('\n').to_string());
        right_args.extend_from_slice(pipe.right_args);
        self.run(ctx, pipe.right_name, &right_args)
    }
}

fn split_pipe<'a>(ctx: &Context, args: &'a [String]) -> Option<PipeSplit<'a>> {
    let index = args.iter().position(|arg| arg == PIPE_TOKEN)?;
    let right_name = args.get(index + 1)?;
    if !ctx.valid_command(right_name) {
        tracing::debug!(target_name = %right_name, "pipe target is not a command; passing through");
        return None;
    }
    Some(PipeSplit {
        left: &args[..index],
        right_name,
        right_args: &args[index + 2..],
    })
}
