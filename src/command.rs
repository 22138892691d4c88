//! Command records: descriptor, shared options, and handler body.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::context::Context;
use crate::error::CommandError;
use crate::set::CommandSet;

/// Outcome of running a handler: an optional value for the caller.
pub type CommandResult = Result<Option<Value>, CommandError>;

/// Handler body. Runs with the context, the dispatching set, and shaped args.
pub type CommandFn = Rc<dyn Fn(&mut Context, &CommandSet, &Args) -> CommandResult>;

// ---------------------------------------------------------------------------
// NameList
// ---------------------------------------------------------------------------

/// One name or a list of names.
///
/// Used for command names (first entry is canonical) and for package
/// requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameList(Vec<String>);

impl NameList {
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for NameList {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for NameList {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for NameList {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for NameList {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for NameList {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for NameList {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(|name| name.to_string()).collect())
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// How many positional arguments a handler takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Arity {
    /// Pass every token through unchanged.
    #[default]
    Variadic,
    /// Keep the first `n` tokens; missing positions arrive as absent.
    Fixed(usize),
}

/// Positional arguments shaped to a handler's arity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    values: Vec<Option<String>>,
}

impl Args {
    /// Shape raw tokens to `arity`. Extras are dropped silently.
    pub fn shaped(raw: &[String], arity: Arity) -> Self {
        let values = match arity {
            Arity::Variadic => raw.iter().cloned().map(Some).collect(),
            Arity::Fixed(n) => (0..n).map(|i| raw.get(i).cloned()).collect(),
        };
        Self { values }
    }

    /// Argument at `index`, or `None` when absent.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index)?.as_deref()
    }

    /// Number of positions, including padded absent ones.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Present arguments in order.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(|value| value.as_deref())
    }

    /// Present arguments joined with single spaces.
    pub fn joined(&self) -> String {
        self.present().collect::<Vec<_>>().join(" ")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Placeholder state for a command whose packages are missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubInfo {
    pub command: String,
    pub needed: Vec<String>,
    pub missing: Vec<String>,
}

impl StubInfo {
    /// The three lines a stubbed command prints instead of running.
    pub fn message_lines(&self) -> [String; 3] {
        [
            format!(
                "{} requires the following gems to be installed: {}",
                self.command,
                self.needed.join(", ")
            ),
            format!(
                "Command not available due to dependency on gems: `{}` not being met.",
                self.missing.join(", ")
            ),
            format!(
                "Type `install {}` to install the required gems and activate this command.",
                self.command
            ),
        ]
    }
}

/// Options bag attached to a command and shared with all of its aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    keep_retval: bool,
    requires_gem: Vec<String>,
    argument_required: bool,
    arity: Arity,
    stub_info: Option<StubInfo>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handler's value from `run` instead of discarding it.
    pub fn with_keep_retval(mut self, keep: bool) -> Self {
        self.keep_retval = keep;
        self
    }

    /// Packages the handler needs before it can run.
    pub fn with_requires_gem(mut self, gems: impl Into<NameList>) -> Self {
        self.requires_gem = gems.into().into_vec();
        self
    }

    /// Refuse to run with no arguments.
    pub fn with_argument_required(mut self, required: bool) -> Self {
        self.argument_required = required;
        self
    }

    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn keep_retval(&self) -> bool {
        self.keep_retval
    }

    pub fn requires_gem(&self) -> &[String] {
        &self.requires_gem
    }

    pub fn argument_required(&self) -> bool {
        self.argument_required
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn stub_info(&self) -> Option<&StubInfo> {
        self.stub_info.as_ref()
    }

    pub fn is_stub(&self) -> bool {
        self.stub_info.is_some()
    }

    pub(crate) fn set_stub_info(&mut self, info: StubInfo) {
        self.stub_info = Some(info);
    }

    pub(crate) fn clear_stub_info(&mut self) -> Option<StubInfo> {
        self.stub_info.take()
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// One registered command.
///
/// `name` and `description` belong to this record. The options cell and the
/// body are shared with every alias created from it.
pub struct Command {
    name: String,
    description: RefCell<String>,
    options: Rc<RefCell<CommandOptions>>,
    body: CommandFn,
}

impl Command {
    pub(crate) fn new(
        name: String,
        description: String,
        options: Rc<RefCell<CommandOptions>>,
        body: CommandFn,
    ) -> Self {
        Self {
            name,
            description: RefCell::new(description),
            options,
            body,
        }
    }

    /// Copy this record under a new name. Options and body stay shared.
    pub(crate) fn renamed(&self, name: String, description: Option<String>) -> Self {
        Self {
            name,
            description: RefCell::new(description.unwrap_or_else(|| self.description())),
            options: Rc::clone(&self.options),
            body: Rc::clone(&self.body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> String {
        self.description.borrow().clone()
    }

    pub(crate) fn set_description(&self, description: String) {
        *self.description.borrow_mut() = description;
    }

    pub fn options(&self) -> Ref<'_, CommandOptions> {
        self.options.borrow()
    }

    pub(crate) fn options_mut(&self) -> RefMut<'_, CommandOptions> {
        self.options.borrow_mut()
    }

    /// True when both records observe the same options cell.
    pub fn shares_options_with(&self, other: &Command) -> bool {
        Rc::ptr_eq(&self.options, &other.options)
    }

    /// Run this command against `ctx`.
    ///
    /// A stubbed command prints its dependency message and ignores `args`.
    /// Otherwise the handler runs with args shaped to the declared arity, and
    /// its value is returned only when `keep_retval` is set.
    pub fn invoke(&self, ctx: &mut Context, set: &CommandSet, args: &[String]) -> CommandResult {
        // Release the options borrow before the handler runs; `install`
        // mutates options of other records.
        let (stub, keep_retval, arity) = {
            let options = self.options();
            (options.stub_info.clone(), options.keep_retval, options.arity)
        };

        if let Some(stub) = stub {
            for line in stub.message_lines() {
                ctx.puts(line)?;
            }
            return Ok(None);
        }

        let shaped = Args::shaped(args, arity);
        let value = (self.body)(ctx, set, &shaped)?;
        Ok(if keep_retval { value } else { None })
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &*self.description.borrow())
            .field("options", &*self.options.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::tokens;

    #[test]
    fn variadic_passes_tokens_unchanged() {
        let args = Args::shaped(&tokens(&["a", "b", "c"]), Arity::Variadic);
        assert_eq!(args.len(), 3);
        assert_eq!(args.joined(), "a b c");
    }

    #[test]
    fn fixed_arity_drops_extras() {
        let args = Args::shaped(&tokens(&["a", "b", "c"]), Arity::Fixed(1));
        assert_eq!(args.len(), 1);
        assert_eq!(args.get(0), Some("a"));
        assert_eq!(args.get(1), None);
    }

    #[test]
    fn fixed_arity_pads_with_absent_values() {
        let args = Args::shaped(&tokens(&["a"]), Arity::Fixed(3));
        assert_eq!(args.len(), 3);
        assert_eq!(args.get(0), Some("a"));
        assert_eq!(args.get(2), None);
        assert_eq!(args.present().count(), 1);
    }

    #[test]
    fn zero_arity_sees_nothing() {
        let args = Args::shaped(&tokens(&["a"]), Arity::Fixed(0));
        assert!(args.is_empty());
    }

    #[test]
    fn name_list_accepts_single_or_many() {
        assert_eq!(NameList::from("x").into_vec(), vec!["x".to_string()]);
        let many = NameList::from(["ls", "dir"]);
        assert_eq!(many.first(), Some("ls"));
        assert_eq!(many.iter().count(), 2);
    }

    #[test]
    fn stub_lines_name_command_and_packages() {
        let info = StubInfo {
            command: "x".into(),
            needed: vec!["present".into(), "absent".into()],
            missing: vec!["absent".into()],
        };
        let [first, second, third] = info.message_lines();
        assert_eq!(
            first,
            "x requires the following gems to be installed: present, absent"
        );
        assert_eq!(
            second,
            "Command not available due to dependency on gems: `absent` not being met."
        );
        assert_eq!(
            third,
            "Type `install x` to install the required gems and activate this command."
        );
    }

    #[test]
    fn options_builder_sets_flags() {
        let options = CommandOptions::new()
            .with_keep_retval(true)
            .with_argument_required(true)
            .with_requires_gem("serde")
            .with_arity(Arity::Fixed(2));
        assert!(options.keep_retval());
        assert!(options.argument_required());
        assert_eq!(options.requires_gem(), ["serde".to_string()]);
        assert_eq!(options.arity(), Arity::Fixed(2));
        assert!(!options.is_stub());
    }
}
