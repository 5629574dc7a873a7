use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use strum_macros::Display;

#[derive(Debug, Parser)]
#[command(name = "logline")]
#[command(about = "Debug/demo driver for the logline cores", long_about = None, version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "intern", about = "Intern names from a word list into a registry")]
    Intern(InternArgs),
    #[command(name = "match", about = "Compile a set of radix patterns and test-match sample lines")]
    Match(MatchArgs),
    #[command(name = "bench-scheduler", about = "Run a synthetic scheduler throughput smoke-test")]
    BenchScheduler(BenchSchedulerArgs),
}

#[derive(Debug, Parser)]
pub struct InternArgs {
    /// Path to a newline-delimited word list. Use `-` to read from stdin.
    pub words: PathBuf,
    /// Upper bound on handles the registry will allocate.
    #[arg(long, default_value_t = 10_000)]
    pub max_handles: u32,
    #[arg(default_value_t, short, long)]
    pub format: Format,
}

#[derive(Debug, Parser)]
pub struct MatchArgs {
    /// `name=pattern` pairs, e.g. `ip=@IPv4:ip@ rest`. Repeatable.
    #[arg(long = "pattern", required = true)]
    pub patterns: Vec<String>,
    /// Lines to test-match against the compiled pattern set. Use `-` to read from stdin.
    pub input: PathBuf,
    /// Also report the best partial match when no complete match exists.
    #[arg(long, default_value_t = false)]
    pub allow_partial: bool,
}

#[derive(Debug, Parser)]
pub struct BenchSchedulerArgs {
    #[arg(long, default_value_t = 4)]
    pub partitions: usize,
    #[arg(long, default_value_t = 10_000)]
    pub messages: usize,
    /// Hash-partition on `$HOST` instead of round-robin.
    #[arg(long, default_value_t = false)]
    pub hash_key: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Display, Default)]
#[strum(serialize_all = "kebab-case")]
pub enum Format {
    #[default]
    Human,
    Json,
}
