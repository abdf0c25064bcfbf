use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, ValueEnum};
use log::LevelFilter;

use crate::{
    notify::{GpuInfo, MatchInfo, SystemInfo, UNKNOWN},
    Megabytes, Timestamp,
};

pub const DISPATCH_USAGE: &str = "Usage: bitrecover_notify [address] [private_key] [wif] [gpu_id]
   or: bitrecover_notify [startup args...]";

pub const STARTUP_USAGE: &str =
    "Usage: startup_notify <hostname> <os> <gpu_count> [gpu_name memory_mb]...";

/// Options shared by both entry points
#[derive(Args, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
pub struct CommonArgs {
    /// Specify config file to use
    ///
    /// If not specified searches `config/config.json`, `../config/config.json`
    /// and `.bitrecover/config.json` in users home folder
    #[arg(long = "config", short, value_name = "PATH")]
    pub config_filename: Option<String>,

    /// Set logging level to use
    #[arg(long, short, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl CommonArgs {
    pub fn get_config_path(&self) -> Option<PathBuf> {
        self.config_filename.as_ref().map(PathBuf::from)
    }
}

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(
    author,
    version,
    about,
    long_about = "Sends a startup or match email for the Bitrecover key search.

With no arguments a startup notification is sent, with three or more the
arguments are taken as `address private_key wif [gpu_id]` of a match."
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Positional parameters of the notification
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    pub args: Vec<String>,
}

#[derive(Parser, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default)]
#[command(author, version, about = "Sends the Bitrecover startup email")]
pub struct StartupCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// File holding the target addresses
    #[arg(long = "targets", value_name = "FILE")]
    pub targets_file: Option<String>,

    /// File matches are written to
    #[arg(long = "output", value_name = "FILE")]
    pub output_file: Option<String>,

    /// <hostname> <os> <gpu_count> [gpu_name memory_mb]...
    #[arg(value_name = "ARGS", trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl StartupCli {
    /// Builds the startup info requiring hostname, os and gpu count
    pub fn system_info(&self) -> anyhow::Result<SystemInfo> {
        if self.args.len() < 3 {
            bail!(
                "expected at least 3 arguments but got {}",
                self.args.len()
            );
        }
        let gpu_count: usize = self.args[2]
            .parse()
            .with_context(|| format!("Invalid gpu_count {:?}", self.args[2]))?;
        let mut result = SystemInfo {
            hostname: self.args[0].clone(),
            os: self.args[1].clone(),
            gpu_count,
            gpus: parse_gpus(&self.args[3..], gpu_count)?,
            ..Default::default()
        };
        if let Some(targets) = &self.targets_file {
            result.targets_file = targets.clone();
        }
        if let Some(output) = &self.output_file {
            result.output_file = output.clone();
        }
        Ok(result)
    }
}

/// What the general entry point should do based on how many arguments it got
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Startup(SystemInfo),
    Match(MatchInfo),
    Usage,
}

/// Chooses the notification from the argument count alone.
///
/// Only an empty argument list is a startup, so every startup field ends up
/// with its default. One or two arguments are too few for a match.
pub fn dispatch(args: &[String], now: Timestamp) -> Dispatch {
    if args.is_empty() {
        return Dispatch::Startup(SystemInfo::default());
    }
    if args.len() < 3 {
        return Dispatch::Usage;
    }
    Dispatch::Match(MatchInfo {
        address: args[0].clone(),
        private_key: args[1].clone(),
        wif: args[2].clone(),
        gpu_id: args.get(3).cloned().unwrap_or_else(|| UNKNOWN.to_string()),
        timestamp: now,
    })
}

/// Takes up to `gpu_count` complete `name memory_mb` pairs, an incomplete trailing pair is dropped
fn parse_gpus(pairs: &[String], gpu_count: usize) -> anyhow::Result<Vec<GpuInfo>> {
    pairs
        .chunks_exact(2)
        .take(gpu_count)
        .map(|pair| {
            let memory_mb: Megabytes = pair[1]
                .parse()
                .with_context(|| format!("Invalid memory for GPU {:?}", pair[0]))?;
            Ok(GpuInfo {
                name: pair[0].clone(),
                memory_mb,
            })
        })
        .collect()
}

/// Exists to provide better help messages variants copied from LevelFilter as
/// that's the type that is actually needed
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum LogLevel {
    /// Nothing emitted in this mode
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn startup_cli(args: &[&str]) -> StartupCli {
        let mut argv = vec!["startup_notify"];
        argv.extend_from_slice(args);
        StartupCli::parse_from(argv)
    }

    #[test]
    fn dispatch_no_args_is_default_startup() {
        let actual = dispatch(&[], Timestamp::new());
        assert_eq!(actual, Dispatch::Startup(SystemInfo::default()));
    }

    #[rstest]
    #[case(&["1abc"])]
    #[case(&["1abc", "deadbeef"])]
    fn dispatch_too_few_for_match(#[case] args: &[&str]) {
        let actual = dispatch(&strings(args), Timestamp::new());
        assert_eq!(actual, Dispatch::Usage);
    }

    #[rstest]
    #[case(&["1abc", "deadbeef", "5Hwif"], "unknown")]
    #[case(&["1abc", "deadbeef", "5Hwif", "2"], "2")]
    #[case(&["1abc", "deadbeef", "5Hwif", "2", "ignored"], "2")]
    fn dispatch_match(#[case] args: &[&str], #[case] gpu_id: &str) {
        // Arrange
        let now: Timestamp = "2011-06-01 12:00:00".into();
        let expected = MatchInfo {
            address: "1abc".to_string(),
            private_key: "deadbeef".to_string(),
            wif: "5Hwif".to_string(),
            gpu_id: gpu_id.to_string(),
            timestamp: now.clone(),
        };

        // Act
        let actual = dispatch(&strings(args), now);

        // Assert
        assert_eq!(actual, Dispatch::Match(expected));
    }

    #[test]
    fn startup_with_gpus() {
        // Arrange
        let cli = startup_cli(&["rig", "Linux", "2", "RTX 3090", "24576", "RTX 4090", "24564"]);

        // Act
        let actual = cli.system_info().unwrap();

        // Assert
        assert_eq!(actual.hostname, "rig");
        assert_eq!(actual.os, "Linux");
        assert_eq!(actual.gpu_count, 2);
        assert_eq!(
            actual.gpus,
            vec![
                GpuInfo {
                    name: "RTX 3090".to_string(),
                    memory_mb: 24576.into()
                },
                GpuInfo {
                    name: "RTX 4090".to_string(),
                    memory_mb: 24564.into()
                },
            ]
        );
        assert_eq!(actual.targets_file, "address.txt");
        assert_eq!(actual.output_file, "Success.txt");
    }

    #[rstest]
    #[case(&["rig", "Linux", "2", "A", "100"], 1)]
    #[case(&["rig", "Linux", "2", "A", "100", "B"], 1)]
    #[case(&["rig", "Linux", "1", "A", "100", "B", "200"], 1)]
    #[case(&["rig", "Linux", "0"], 0)]
    fn startup_incomplete_pairs_dropped(#[case] args: &[&str], #[case] expected_gpus: usize) {
        let actual = startup_cli(args).system_info().unwrap();
        assert_eq!(actual.gpus.len(), expected_gpus);
    }

    #[rstest]
    #[case(&[])]
    #[case(&["rig"])]
    #[case(&["rig", "Linux"])]
    #[case(&["rig", "Linux", "two"])]
    #[case(&["rig", "Linux", "1", "A", "lots"])]
    fn startup_bad_shape(#[case] args: &[&str]) {
        assert!(startup_cli(args).system_info().is_err());
    }

    #[test]
    fn startup_file_overrides() {
        let cli = startup_cli(&[
            "--targets",
            "old.txt",
            "--output",
            "found.txt",
            "rig",
            "Linux",
            "0",
        ]);

        let actual = cli.system_info().unwrap();

        assert_eq!(actual.targets_file, "old.txt");
        assert_eq!(actual.output_file, "found.txt");
    }

    #[test]
    fn common_options() {
        let cli = Cli::parse_from(["bitrecover_notify", "-l", "debug", "-c", "my.json"]);
        assert_eq!(cli.common.log_level, LogLevel::Debug);
        assert_eq!(cli.common.get_config_path(), Some(PathBuf::from("my.json")));
        assert!(cli.args.is_empty());
    }
}
