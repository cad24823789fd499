//! Terminal alert sink and live status line.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use blinkguard_core::monitor::{Acknowledgement, Alert, AlertSink};
use blinkguard_core::tracker::{TrackerSnapshot, display_rate};

/// Prints alerts and, in prompt mode, waits for OK or EXIT.
pub struct TerminalSink<W> {
    answers: Option<Box<dyn BufRead>>,
    out: W,
}

impl<W: Write> TerminalSink<W> {
    /// Reads answers from `answers` after every alert.
    pub fn prompt(answers: Box<dyn BufRead>, out: W) -> Self {
        Self {
            answers: Some(answers),
            out,
        }
    }

    /// Dismisses every alert without waiting.
    pub fn auto(out: W) -> Self {
        Self { answers: None, out }
    }

    fn ask(&mut self) -> Result<Acknowledgement> {
        let Some(answers) = self.answers.as_mut() else {
            return Ok(Acknowledgement::Dismissed);
        };

        let mut line = String::new();
        loop {
            write!(self.out, "[OK] continue / [EXIT] quit > ")?;
            self.out.flush()?;

            line.clear();
            if answers.read_line(&mut line).context("read alert answer")? == 0 {
                return Ok(Acknowledgement::Exit);
            }
            match line.trim().to_ascii_lowercase().as_str() {
                "" | "ok" | "o" | "y" | "yes" => return Ok(Acknowledgement::Dismissed),
                "exit" | "quit" | "q" => return Ok(Acknowledgement::Exit),
                other => writeln!(self.out, "Unrecognized answer '{other}'.")?,
            }
        }
    }
}

impl<W: Write> AlertSink for TerminalSink<W> {
    fn alert(&mut self, alert: &Alert) -> Result<Acknowledgement> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Blink rate too low: {} blinks/min (safe at {} or more)",
            alert.blinks_per_minute, alert.safe_boundary
        )?;

        let ack = self.ask()?;
        match ack {
            Acknowledgement::Dismissed => writeln!(self.out, "Don't forget to blink!")?,
            Acknowledgement::Exit => writeln!(self.out, "Exiting.")?,
        }
        self.out.flush()?;
        Ok(ack)
    }
}

/// Renders the `\r`-terminated live line.
pub fn status_line(snapshot: &TrackerSnapshot) -> String {
    format!(
        "\rblinks/min: {:>3} [{}]   ",
        display_rate(snapshot.blinks_per_minute),
        snapshot.status
    )
}
