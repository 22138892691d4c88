//! CLI argument parsing via clap.

use clap::Parser;

/// Interactive console built on a composable command set.
#[derive(Debug, Parser)]
#[command(name = "cmdset", version, after_help = cmdset::build_info::HELP_BUILD_METADATA)]
pub struct Args {
    /// Path to config file (default: ./cmdset.toml or ~/.config/cmdset/cmdset.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Run this line and exit instead of starting the loop. Repeatable.
    #[arg(short = 'e', long = "exec", value_name = "LINE")]
    pub exec: Vec<String>,

    /// Leave out the built-in `help` and `install` commands.
    #[arg(long = "no-defaults")]
    pub no_defaults: bool,
}
