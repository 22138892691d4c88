//! cmdset — a command set registry and dispatcher for interactive consoles.
//!
//! A [`CommandSet`] maps names to commands, composes with other sets by
//! import and aliasing, and dispatches whitespace-split input lines against a
//! host-supplied [`Context`]. Commands can declare package requirements; when
//! those are missing the command is stubbed until the built-in `install`
//! command fetches them. A `|` token chains the text output of one command
//! into the next.
//!
//! # Quick start
//!
//! ```
//! use std::rc::Rc;
//! use cmdset::{CaptureBuffer, CommandOptions, CommandSet, Context, OfflineInstaller};
//!
//! let installer = Rc::new(OfflineInstaller::default());
//! let mut set = CommandSet::with_defaults("main", installer).unwrap();
//! set.define("greet", "Greet somebody", CommandOptions::new(), |ctx, _set, args| {
//!     ctx.puts(format!("Good afternoon {}", args.joined()))?;
//!     Ok(None)
//! })
//! .unwrap();
//!
//! let out = CaptureBuffer::new();
//! let mut ctx = Context::new(out.clone(), Rc::new(|_: &str| false));
//! set.run(&mut ctx, "greet", &["John".to_string()]).unwrap();
//! assert_eq!(out.contents(), "Good afternoon John\n");
//! ```

pub mod build_info;
pub mod command;
pub mod config;
pub mod context;
pub mod defaults;
pub mod dispatch;
pub mod error;
mod gate;
pub mod helpers;
pub mod packages;
pub mod repl;
pub mod set;
#[cfg(test)]
pub mod testsupport;

pub use command::{
    Args, Arity, Command, CommandFn, CommandOptions, CommandResult, NameList, StubInfo,
};
pub use context::{CaptureBuffer, CommandProcessor, Context, OutputRedirect, Pager, PlainPager};
pub use error::{CommandError, ConfigError, InstallError};
pub use helpers::{HelperBag, HelperFn};
pub use packages::{CargoInstaller, OfflineInstaller, PackageInstaller};
pub use set::CommandSet;
