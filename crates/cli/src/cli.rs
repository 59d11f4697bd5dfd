use crate::commands::Command;
use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use deplock_core::VersionMatching;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deplock")]
#[command(about = "Check resolved build dependencies against a version-pinned lock manifest")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(
        long,
        global = true,
        help = "Tracing filter directives, overriding --level and RUST_LOG"
    )]
    pub log_filter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Reconcile resolved dependencies against a lock manifest")]
    Check {
        #[arg(long, help = "Path to the lock manifest", default_value = "deplock.json")]
        lock: PathBuf,
        #[arg(long, help = "Path to the resolved dependency export")]
        resolved: PathBuf,
        #[arg(long, help = "Path to a JSON configuration file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Compare checksums")]
        integrity: bool,
        #[arg(long, help = "How locked versions are interpreted (auto, literal, regex)")]
        version_matching: Option<VersionMatching>,
    },
    #[command(about = "Print a lock manifest for the resolved dependencies")]
    Lock {
        #[arg(long, help = "Path to the resolved dependency export")]
        resolved: PathBuf,
        #[arg(long, help = "Path to a JSON configuration file")]
        config: Option<PathBuf>,
        #[arg(long, help = "Record checksums")]
        integrity: bool,
        #[arg(long, help = "Mode the manifest will be checked with (auto, literal, regex)")]
        version_matching: Option<VersionMatching>,
    },
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Check {
                lock,
                resolved,
                config,
                integrity,
                version_matching,
            } => Self::Check {
                lock,
                resolved,
                config,
                integrity,
                version_matching,
            },
            Commands::Lock {
                resolved,
                config,
                integrity,
                version_matching,
            } => Self::Lock {
                resolved,
                config,
                integrity,
                version_matching,
            },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
