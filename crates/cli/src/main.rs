//! deplock command-line host.

mod cli;
mod commands;
mod errors;
mod tracing;

use crate::commands::Command;
use crate::tracing::TracingConfig;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(error) = run() {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

fn run() -> miette::Result<()> {
    let cli = cli::parse();

    crate::tracing::init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        filter: cli.log_filter.clone(),
    })?;

    let command: Command = cli.command.into();
    command.execute()
}
