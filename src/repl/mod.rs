//! Line-oriented REPL host around a command set.
//!
//! The host owns the execution context, splits each input line into a command
//! name and whitespace-separated tokens, and dispatches through
//! [`CommandSet::run`]. `exit` and `quit` end the loop; errors are reported
//! and the loop continues.

pub mod demo;

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use serde_json::Value;

use crate::context::{CommandProcessor, Context};
use crate::error::CommandError;
use crate::set::CommandSet;

/// Words that end the loop without going through the set.
const QUIT_WORDS: [&str; 2] = ["exit", "quit"];

/// Result of evaluating one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Blank line; nothing ran.
    Empty,
    /// A command ran; carries its kept return value, if any.
    Ran(Option<Value>),
    /// The user asked to leave.
    Quit,
}

/// Split a line into a command name and its argument tokens.
pub fn parse_line(line: &str) -> Option<(&str, Vec<String>)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    Some((name, tokens.map(str::to_string).collect()))
}

/// Interactive host bound to one command set.
pub struct Repl {
    set: Rc<CommandSet>,
    ctx: Context,
    prompt: String,
}

impl Repl {
    /// Host writing command output to `output`. The set's own membership
    /// decides which pipe targets are valid.
    pub fn new(
        set: Rc<CommandSet>,
        output: impl Write + 'static,
        prompt: impl Into<String>,
    ) -> Self {
        let lookup = Rc::clone(&set);
        let processor: Rc<dyn CommandProcessor> = Rc::new(move |name: &str| lookup.contains(name));
        Self {
            set,
            ctx: Context::new(output, processor),
            prompt: prompt.into(),
        }
    }

    /// Evaluate one line of input.
    pub fn eval_line(&mut self, line: &str) -> Result<LineOutcome, CommandError> {
        let Some((name, args)) = parse_line(line) else {
            return Ok(LineOutcome::Empty);
        };
        if QUIT_WORDS.contains(&name) && !self.set.contains(name) {
            return Ok(LineOutcome::Quit);
        }
        let value = self.set.run(&mut self.ctx, name, &args)?;
        Ok(LineOutcome::Ran(value))
    }

    /// Read lines until EOF or a quit word.
    ///
    /// The prompt goes to `chrome`; failures are reported there as
    /// `error: <message>` and the loop keeps going. Kept return values are
    /// echoed to the command output as `=> <value>`.
    pub fn run<R, W>(&mut self, input: R, mut chrome: W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(chrome, "{}", self.prompt)?;
            chrome.flush()?;
            let Some(line) = lines.next().transpose()? else {
                writeln!(chrome)?;
                return Ok(());
            };
            match self.eval_line(&line) {
                Ok(LineOutcome::Quit) => return Ok(()),
                Ok(LineOutcome::Ran(Some(value))) => self.ctx.puts(format!("=> {value}"))?,
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(error = %err, line = %line, "command failed");
                    writeln!(chrome, "error: {err}")?;
                }
            }
        }
    }
}
