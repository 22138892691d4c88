//! CLI entry point for cmdset.

mod cli;

use std::io;
use std::rc::Rc;

use clap::Parser;
use cmdset::build_info;
use cmdset::config::load_config;
use cmdset::packages::installer_for;
use cmdset::repl::demo::demo_set;
use cmdset::repl::{LineOutcome, Repl};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directive.
const LOG_ENV: &str = "CMDSET_LOG";

fn main() {
    let args = cli::Args::parse();
    init_tracing();

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let installer = installer_for(&config.packages);
    let set = match demo_set(&config.repl.set_name, installer, !args.no_defaults) {
        Ok(set) => Rc::new(set),
        Err(e) => {
            eprintln!("error: failed to build command set: {e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(commands = set.len(), "command set ready");

    let mut repl = Repl::new(set, io::stdout(), config.repl.prompt.clone());

    if !args.exec.is_empty() {
        for line in &args.exec {
            match repl.eval_line(line) {
                Ok(LineOutcome::Quit) => break,
                Ok(LineOutcome::Ran(Some(value))) => println!("=> {value}"),
                Ok(_) => {}
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(1);
                }
            }
        }
        return;
    }

    eprintln!("{}", build_info::banner_line());
    if let Err(e) = repl.run(io::stdin().lock(), io::stderr()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
