use std::{io, process::ExitCode};

use bitrecover_notify::{notifier_for, start_logging, startup_status, StartupCli};
use clap::Parser;

/// Called by the search process once it has detected its GPUs
fn main() -> ExitCode {
    let cli = StartupCli::parse();
    start_logging(&cli.common);
    let notifier = notifier_for(&cli.common);
    ExitCode::from(startup_status(cli, &notifier, &mut io::stdout()))
}
