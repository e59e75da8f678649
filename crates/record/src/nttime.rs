//! Conversions between NT time (100ns ticks since 1601-01-01 UTC) and Unix
//! time.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Local, TimeZone};

pub const TICKS_PER_SECOND: u64 = 10_000_000;

/// Seconds between 1601-01-01 and 1970-01-01.
pub const EPOCH_DIFFERENCE_SECS: u64 = 11_644_473_600;

const EPOCH_DIFFERENCE_TICKS: u64 = EPOCH_DIFFERENCE_SECS * TICKS_PER_SECOND;

/// Tick value used by Windows to mean "never" / positive infinity.
pub const NTTIME_INFINITY: u64 = 0x7FFF_FFFF_FFFF_FFFF;

/// Ticks to whole Unix seconds. `None` for instants before 1970-01-01,
/// which the local representation cannot hold.
pub fn to_epoch(ticks: u64) -> Option<i64> {
    (ticks / TICKS_PER_SECOND)
        .checked_sub(EPOCH_DIFFERENCE_SECS)
        .map(|secs| secs as i64)
}

/// Whole Unix seconds to ticks. Instants before 1601 clamp to 0.
pub fn from_epoch(secs: i64) -> u64 {
    let shifted = secs.saturating_add(EPOCH_DIFFERENCE_SECS as i64);
    if shifted <= 0 {
        return 0;
    }
    (shifted as u64).saturating_mul(TICKS_PER_SECOND)
}

/// Seconds plus nanoseconds since the Unix epoch to ticks, keeping 100ns
/// precision. Results outside the tick range are clamped.
pub fn from_high_res(secs: i64, nanos: u32) -> u64 {
    let ticks = secs as i128 * TICKS_PER_SECOND as i128
        + (nanos / 100) as i128
        + EPOCH_DIFFERENCE_TICKS as i128;
    ticks.clamp(0, u64::MAX as i128) as u64
}

/// Convert a `SystemTime` (e.g. a file's birth time) to ticks.
pub fn from_system_time(t: SystemTime) -> u64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => from_high_res(d.as_secs() as i64, d.subsec_nanos()),
        Err(e) => {
            // Before 1970: count backwards from the epoch offset.
            let before = (e.duration().as_nanos() / 100) as i128;
            (EPOCH_DIFFERENCE_TICKS as i128 - before).clamp(0, u64::MAX as i128) as u64
        }
    }
}

/// Render ticks for diagnostics: the infinity sentinel symbolically,
/// everything else as a local date.
pub fn format(ticks: u64) -> String {
    if ticks == NTTIME_INFINITY {
        return "+∞".to_owned();
    }

    to_epoch(ticks)
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %z").to_string())
        .unwrap_or_else(|| "unrepresentable".to_owned())
}

#[cfg(test)]
#[path = "nttime_tests.rs"]
mod tests;
