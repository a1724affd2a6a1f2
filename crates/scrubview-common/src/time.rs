//! Time unit helpers.
//!
//! The server measures time in ticks (10,000,000 per second). Trickplay works
//! in milliseconds, and the command line accepts either raw milliseconds or a
//! clock-style timestamp.

use crate::error::{Error, Result};

/// Server ticks per second.
pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Server ticks per millisecond.
pub const TICKS_PER_MILLISECOND: u64 = TICKS_PER_SECOND / 1_000;

/// Convert server ticks to milliseconds, truncating sub-millisecond precision.
pub fn ticks_to_ms(ticks: u64) -> u64 {
    ticks / TICKS_PER_MILLISECOND
}

/// Convert milliseconds to server ticks, saturating on overflow.
pub fn ms_to_ticks(ms: u64) -> u64 {
    ms.saturating_mul(TICKS_PER_MILLISECOND)
}

/// Parse a playback position into milliseconds.
///
/// Accepts a bare integer (milliseconds), `MM:SS`, or `HH:MM:SS`, where the
/// final component may carry a fractional part (`01:02:03.250`).
pub fn parse_timestamp(input: &str) -> Result<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::invalid_timestamp("empty timestamp"));
    }

    if !input.contains(':') {
        return input
            .parse::<u64>()
            .map_err(|_| Error::invalid_timestamp(input));
    }

    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() > 3 {
        return Err(Error::invalid_timestamp(input));
    }

    let (whole, secs) = parts.split_at(parts.len() - 1);
    let secs_ms = parse_seconds(secs[0]).ok_or_else(|| Error::invalid_timestamp(input))?;

    let mut total_ms = secs_ms;
    let mut unit_ms = 60_000u64;
    for part in whole.iter().rev() {
        let value: u64 = part
            .parse()
            .map_err(|_| Error::invalid_timestamp(input))?;
        total_ms = value
            .checked_mul(unit_ms)
            .and_then(|v| v.checked_add(total_ms))
            .ok_or_else(|| Error::invalid_timestamp(input))?;
        unit_ms *= 60;
    }

    Ok(total_ms)
}

/// Seconds component with an optional fraction, e.g. `"05"` or `"05.25"`.
fn parse_seconds(s: &str) -> Option<u64> {
    let (secs, frac) = match s.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (s, ""),
    };

    let secs: u64 = secs.parse().ok()?;
    if frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut frac_ms = 0u64;
    for (i, b) in frac.bytes().enumerate() {
        frac_ms += u64::from(b - b'0') * 10u64.pow(2 - i as u32);
    }

    secs.checked_mul(1_000)?.checked_add(frac_ms)
}

/// Format milliseconds as `H:MM:SS` (or `MM:SS` under an hour).
pub fn format_timestamp(ms: u64) -> String {
    let total_secs = ms / 1_000;
    let hours = total_secs / 3_600;
    let mins = (total_secs / 60) % 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_conversion() {
        assert_eq!(ticks_to_ms(10_000_000), 1_000);
        assert_eq!(ticks_to_ms(9_999), 0);
        assert_eq!(ms_to_ticks(125_000), 1_250_000_000);
        assert_eq!(ms_to_ticks(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_parse_plain_millis() {
        assert_eq!(parse_timestamp("125000").unwrap(), 125_000);
        assert_eq!(parse_timestamp(" 0 ").unwrap(), 0);
    }

    #[test]
    fn test_parse_clock_forms() {
        assert_eq!(parse_timestamp("02:05").unwrap(), 125_000);
        assert_eq!(parse_timestamp("0:16:45").unwrap(), 1_005_000);
        assert_eq!(parse_timestamp("01:02:03.25").unwrap(), 3_723_250);
        assert_eq!(parse_timestamp("00:00:00.005").unwrap(), 5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("abc").is_err());
        assert!(parse_timestamp("1:2:3:4").is_err());
        assert!(parse_timestamp("00:xx").is_err());
        assert!(parse_timestamp("00:01.1234").is_err());
        assert!(parse_timestamp("-5").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(125_000), "02:05");
        assert_eq!(format_timestamp(3_723_250), "1:02:03");
        assert_eq!(format_timestamp(0), "00:00");
    }
}
