//! Alert history command handlers.

use anyhow::{Context, Result};
use blinkguard_core::alerts::{self, AlertRecord};
use blinkguard_core::config::paths;
use chrono::Local;

pub fn list() -> Result<()> {
    let path = paths::alerts_path();
    let records = alerts::load(&path)
        .with_context(|| format!("load alert history from {}", path.display()))?;

    if records.is_empty() {
        println!("No alerts recorded.");
        return Ok(());
    }

    for record in &records {
        println!("{}", format_record(record));
    }
    Ok(())
}

fn format_record(record: &AlertRecord) -> String {
    format!(
        "{}  {:>3} blinks/min (safe at {})  {}",
        record.at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
        record.blinks_per_minute,
        record.safe_boundary,
        record.acknowledgement.as_str()
    )
}

#[cfg(test)]
mod tests {
    use blinkguard_core::monitor::Acknowledgement;
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn formats_rate_and_acknowledgement() {
        let record = AlertRecord {
            at: Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).unwrap(),
            blinks_per_minute: 9,
            safe_boundary: 25,
            acknowledgement: Acknowledgement::Exit,
        };
        let line = format_record(&record);
        assert!(line.contains("  9 blinks/min (safe at 25)"));
        assert!(line.ends_with("exit"));
    }
}
