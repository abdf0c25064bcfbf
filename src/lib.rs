mod cli;
mod config;
mod logging;
mod mailer;
mod notify;
mod timestamp;
mod units;

pub use cli::{
    dispatch, Cli, CommonArgs, Dispatch, LogLevel, StartupCli, DISPATCH_USAGE, STARTUP_USAGE,
};
pub use config::{ConfigSearch, EmailConfig, DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER};
pub use logging::init_logging;
pub use mailer::{send_email, MailTransport, SendOutcome, SmtpMailer};
pub use notify::{
    render_match, render_startup, GpuInfo, MatchInfo, Notifier, Rendered, SystemInfo,
};
pub use timestamp::Timestamp;
pub use units::Megabytes;

use std::io::Write;

use log::{debug, error, warn};

/// Sets up logging, continuing without it if that is not possible
pub fn start_logging(common: &CommonArgs) {
    if let Err(e) = init_logging(common.log_level.into()) {
        eprintln!("Continuing without logging. {e:?}");
    }
}

pub fn notifier_for(common: &CommonArgs) -> Notifier<SmtpMailer> {
    Notifier::new(
        ConfigSearch::with_override(common.get_config_path()),
        SmtpMailer,
    )
}

/// Runs the general entry point. Mail problems are only logged
pub fn run<T: MailTransport>(cli: Cli, notifier: &Notifier<T>) {
    debug!("Dispatching on {} arguments", cli.args.len());
    match dispatch(&cli.args, Timestamp::new()) {
        Dispatch::Startup(info) => {
            notifier.notify_startup(&info);
        }
        Dispatch::Match(info) => {
            notifier.notify_match(&info);
        }
        Dispatch::Usage => println!("{DISPATCH_USAGE}"),
    }
}

/// Runs the startup only entry point, an error means the arguments did not have the required shape
pub fn run_startup<T: MailTransport>(
    cli: StartupCli,
    notifier: &Notifier<T>,
) -> anyhow::Result<SendOutcome> {
    let info = match cli.system_info() {
        Ok(info) => info,
        Err(e) => {
            warn!("Rejected startup arguments {:?}: {e:#}", cli.args);
            return Err(e);
        }
    };
    let outcome = notifier.notify_startup(&info);
    debug!("Startup notification outcome: {outcome:?}");
    Ok(outcome)
}

/// Process exit status of the startup only entry point.
///
/// Badly shaped arguments print the usage to `out` and give 1, anything
/// that happens on the mail path gives 0.
pub fn startup_status<T: MailTransport>(
    cli: StartupCli,
    notifier: &Notifier<T>,
    out: &mut impl Write,
) -> u8 {
    match run_startup(cli, notifier) {
        Ok(_) => 0,
        Err(e) => {
            if let Err(write_err) = writeln!(out, "{STARTUP_USAGE}\n{e:#}") {
                error!("Failed to print usage: {write_err}");
            }
            1
        }
    }
}
