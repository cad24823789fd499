//! Watch command: replay observations through the monitor loop.

use std::io::{self, BufRead, BufReader, Write};

use anyhow::{Context, Result, bail};
use blinkguard_core::alerts::RecordingSink;
use blinkguard_core::config::{AckMode, Config, paths};
use blinkguard_core::interrupt::InterruptedError;
use blinkguard_core::monitor::{AlertSink, BlinkMonitor, PassThrough, ReplaySource, StopReason};
use tracing::{info, warn};

use crate::terminal::{self, TerminalSink};

pub fn run(config: &Config, quiet: bool) -> Result<()> {
    let source = ReplaySource::open(&config.source)?.paced(config.pace);
    let mut monitor = BlinkMonitor::new(source, PassThrough, config.tracker())
        .with_read_retries(config.max_read_retries);

    let mut sink = build_sink(config);

    info!(
        source = %config.source,
        keep_seconds = config.keep_seconds,
        safe_boundary = config.safe_boundary,
        eviction = config.eviction.as_str(),
        "watching blink rate"
    );

    let mut stderr = io::stderr();
    let summary = monitor.run(sink.as_mut(), |snapshot| {
        if !quiet {
            let _ = write!(stderr, "{}", terminal::status_line(snapshot));
            let _ = stderr.flush();
        }
    });
    if !quiet {
        eprintln!();
    }

    println!(
        "Processed {} frames, {} alert(s), {} suppressed",
        summary.frames, summary.alerts, summary.suppressed
    );

    match summary.stop {
        StopReason::Exit | StopReason::SourceExhausted => Ok(()),
        StopReason::Interrupted => Err(InterruptedError.into()),
        StopReason::FrameRead(message) => bail!("{message}"),
        StopReason::SinkFailed(message) => bail!("alert failed: {message}"),
    }
}

fn build_sink(config: &Config) -> Box<dyn AlertSink> {
    let terminal: Box<dyn AlertSink> = match config.alert.ack {
        AckMode::Auto => Box::new(TerminalSink::auto(io::stderr())),
        AckMode::Prompt => match answer_reader(&config.source) {
            Ok(answers) => Box::new(TerminalSink::prompt(answers, io::stderr())),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "no terminal for alert prompts, dismissing automatically");
                Box::new(TerminalSink::auto(io::stderr()))
            }
        },
    };

    if config.record_alerts {
        Box::new(RecordingSink::new(terminal, paths::alerts_path()))
    } else {
        terminal
    }
}

/// Answers come from stdin unless stdin carries the observations.
fn answer_reader(source: &str) -> Result<Box<dyn BufRead>> {
    if source != "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let tty = std::fs::File::open(controlling_terminal())
        .context("open controlling terminal for alert prompts")?;
    Ok(Box::new(BufReader::new(tty)))
}

#[cfg(unix)]
fn controlling_terminal() -> &'static str {
    "/dev/tty"
}

#[cfg(not(unix))]
fn controlling_terminal() -> &'static str {
    "CONIN$"
}
