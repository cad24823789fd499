//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blinkguard_core::config::{self, AckMode};
use blinkguard_core::interrupt;
use blinkguard_core::tracker::EvictionPolicy;
use clap::{Parser, ValueEnum};

use crate::logging;

mod commands;

#[derive(Parser)]
#[command(name = "blinkguard")]
#[command(version)]
#[command(about = "Warns when your blink rate drops during screen use")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    watch: WatchArgs,
}

/// Overrides for the monitor loop; unset flags fall back to config.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Observation input: a file path, or "-" for stdin
    #[arg(short, long, value_name = "PATH")]
    input: Option<String>,

    /// Blinks per minute at or above which status is safe
    #[arg(short = 'b', long, value_name = "BPM")]
    safe_boundary: Option<u32>,

    /// Retention window in seconds
    #[arg(short, long, value_name = "SECONDS")]
    keep_seconds: Option<f64>,

    /// How stale observations are evicted
    #[arg(long, value_enum)]
    eviction: Option<EvictionArg>,

    /// Replay at the recorded spacing between observations
    #[arg(long)]
    pace: bool,

    /// Transient read failures to retry before stopping
    #[arg(long, value_name = "N")]
    retries: Option<u32>,

    /// How alerts are acknowledged
    #[arg(long, value_enum)]
    ack: Option<AckArg>,

    /// Do not record alerts to the history file
    #[arg(long = "no-record")]
    no_record: bool,

    /// Hide the live blink-rate line
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EvictionArg {
    /// Drop at most one stale observation per new one
    OnePerInsert,
    /// Trim back to the window on every insertion
    DrainStale,
}

impl From<EvictionArg> for EvictionPolicy {
    fn from(arg: EvictionArg) -> Self {
        match arg {
            EvictionArg::OnePerInsert => EvictionPolicy::OnePerInsert,
            EvictionArg::DrainStale => EvictionPolicy::DrainStale,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AckArg {
    /// Wait for OK or EXIT on the terminal
    Prompt,
    /// Dismiss alerts immediately
    Auto,
}

impl From<AckArg> for AckMode {
    fn from(arg: AckArg) -> Self {
        match arg {
            AckArg::Prompt => AckMode::Prompt,
            AckArg::Auto => AckMode::Auto,
        }
    }
}

impl WatchArgs {
    /// Applies flags on top of the loaded config.
    fn apply(&self, config: &mut config::Config) -> Result<()> {
        if let Some(input) = &self.input {
            config.source.clone_from(input);
        }
        if let Some(boundary) = self.safe_boundary {
            config.safe_boundary = boundary;
        }
        if let Some(keep) = self.keep_seconds {
            config.keep_seconds = keep;
        }
        if let Some(eviction) = self.eviction {
            config.eviction = eviction.into();
        }
        if self.pace {
            config.pace = true;
        }
        if let Some(retries) = self.retries {
            config.max_read_retries = retries;
        }
        if let Some(ack) = self.ack {
            config.alert.ack = ack.into();
        }
        if self.no_record {
            config.record_alerts = false;
        }
        config.validate().context("invalid watch options")
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Monitor an observation stream and alert on low blink rate (default)
    Watch {
        #[command(flatten)]
        args: WatchArgs,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// List recorded alerts
    Alerts,
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.log_file.as_deref())?;

    let Cli { command, watch, .. } = cli;

    // default to watch mode
    let Some(command) = command else {
        return watch_with(&watch);
    };

    match command {
        Commands::Watch { args } => watch_with(&args),
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
        Commands::Alerts => commands::alerts::list(),
    }
}

fn watch_with(args: &WatchArgs) -> Result<()> {
    let mut config = config::Config::load().context("load config")?;
    args.apply(&mut config)?;

    interrupt::init().context("install Ctrl+C handler")?;

    commands::watch::run(&config, args.quiet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "blinkguard",
            "watch",
            "--input",
            "session.txt",
            "-b",
            "20",
            "--keep-seconds",
            "30",
            "--eviction",
            "drain-stale",
            "--ack",
            "auto",
            "--no-record",
        ]);
        let Some(Commands::Watch { args }) = cli.command else {
            panic!("expected watch command");
        };

        let mut config = config::Config::default();
        args.apply(&mut config).unwrap();
        assert_eq!(config.source, "session.txt");
        assert_eq!(config.safe_boundary, 20);
        assert!((config.keep_seconds - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.eviction, EvictionPolicy::DrainStale);
        assert_eq!(config.alert.ack, AckMode::Auto);
        assert!(!config.record_alerts);
    }

    #[test]
    fn unset_flags_keep_config() {
        let mut config = config::Config {
            safe_boundary: 30,
            ..Default::default()
        };
        WatchArgs::default().apply(&mut config).unwrap();
        assert_eq!(config.safe_boundary, 30);
        assert!(config.record_alerts);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut config = config::Config::default();
        let args = WatchArgs {
            keep_seconds: Some(-5.0),
            ..Default::default()
        };
        assert!(args.apply(&mut config).is_err());
    }
}
