use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "CCBuilder CLI - Build, score and cache parametric coiled-coil bundle models.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for energy scoring.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a coiled-coil bundle model from a parameter file.
    Build(BuildArgs),
    /// Inspect the local build cache.
    Cache(CacheArgs),
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    // --- Core Arguments ---
    /// Path to the helix parameter file (JSON array or TOML with `[[chain]]` tables).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output PDB file. Nothing is written when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Overrides ---
    /// Override the number of requests after which a build is cached.
    #[arg(long, value_name = "INT")]
    pub threshold: Option<u64>,

    /// Override the non-bonded cutoff distance in Angstroms.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Caller identity recorded in the build log.
    #[arg(long, value_name = "NAME")]
    pub caller: Option<String>,

    /// Always run the pipeline and leave the build cache untouched.
    #[arg(long)]
    pub no_cache: bool,

    /// Override the build store file.
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scoring.cutoff=8.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `cache` subcommand.
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Available commands for build cache inspection.
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show the cache state of a parameter file.
    Show {
        /// Path to the helix parameter file.
        #[arg(short, long, required = true, value_name = "PATH")]
        input: PathBuf,

        /// Build store file to inspect instead of the default one.
        #[arg(long, value_name = "PATH")]
        store: Option<PathBuf>,
    },
    /// Show the absolute path of the default build store.
    Path,
}
