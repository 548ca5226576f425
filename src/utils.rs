/// Utility functions for timekeeping and diagnostics formatting
use std::sync::OnceLock;
use std::time::Instant;
use time::{format_description, OffsetDateTime};

static PROCESS_START: OnceLock<Instant> = OnceLock::new();

/// Milliseconds elapsed since the process started.
///
/// Never returns 0: zero is reserved for the "no data yet / reset" state
/// in the freshness snapshots, so the first millisecond is clamped to 1.
pub fn monotonic_millis() -> u64 {
    let start = PROCESS_START.get_or_init(Instant::now);
    (start.elapsed().as_millis() as u64).max(1)
}

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Render raw bytes as space-separated hex for drop-site diagnostics.
pub fn format_raw_bytes(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_millis_never_returns_zero() {
        assert!(monotonic_millis() >= 1);
    }

    #[test]
    fn monotonic_millis_does_not_go_backwards() {
        let first = monotonic_millis();
        let second = monotonic_millis();
        assert!(second >= first);
    }

    #[test]
    fn formats_raw_bytes_as_hex() {
        assert_eq!(format_raw_bytes(&[0x5A, 0x00, 0xFF]), "5A 00 FF");
        assert_eq!(format_raw_bytes(&[]), "");
    }
}
