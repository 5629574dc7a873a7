//! Thin CLI front-end over the logline cores: not part of the library
//! contract, just debug/demo tooling over the library crates.

use clap::Parser as _;

use crate::commands::{Cli, Commands};

pub mod commands;
mod commands_bench;
mod commands_intern;
mod commands_match;
mod logger;
mod stdin;

pub fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let _ = logger::init();
    let cli = Cli::parse_from(args);
    match cli.command {
        Commands::Intern(args) => commands_intern::run(args),
        Commands::Match(args) => commands_match::run(args),
        Commands::BenchScheduler(args) => commands_bench::run(args),
    }
}
