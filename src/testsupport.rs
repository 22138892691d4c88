//! Shared test fixtures for registry, dispatcher, and REPL test modules.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::command::{Args, CommandResult};
use crate::context::{CaptureBuffer, CommandProcessor, Context};
use crate::packages::OfflineInstaller;
use crate::set::CommandSet;

/// Command processor that recognizes exactly `names`.
pub fn processor_for(names: &[&str]) -> Rc<dyn CommandProcessor> {
    let names: BTreeSet<String> = names.iter().map(|name| name.to_string()).collect();
    Rc::new(move |name: &str| names.contains(name))
}

/// Context writing into a fresh capture buffer, plus a handle to read it.
pub fn capture_context(valid_commands: &[&str]) -> (Context, CaptureBuffer) {
    let out = CaptureBuffer::new();
    let ctx = Context::new(out.clone(), processor_for(valid_commands));
    (ctx, out)
}

/// Empty set backed by an installer with nothing installed.
pub fn empty_set(name: &str) -> CommandSet {
    CommandSet::new(name, Rc::new(OfflineInstaller::default()))
}

/// Handler that does nothing.
pub fn noop(_ctx: &mut Context, _set: &CommandSet, _args: &Args) -> CommandResult {
    Ok(None)
}

/// Owned argument tokens from string literals.
pub fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|token| token.to_string()).collect()
}
