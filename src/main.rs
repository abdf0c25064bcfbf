use bitrecover_notify::{notifier_for, run, start_logging, Cli};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    start_logging(&cli.common);
    let notifier = notifier_for(&cli.common);
    run(cli, &notifier);
}
