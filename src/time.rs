//! Farcaster time conversions.
//!
//! Protocol timestamps count seconds since the Farcaster epoch
//! (2021-01-01T00:00:00Z) and fit in a `u32`.

use std::time::{SystemTime, UNIX_EPOCH};

/// The Farcaster epoch, in unix milliseconds (January 1, 2021 UTC).
pub const FARCASTER_EPOCH_MS: u64 = 1_609_459_200_000;

/// Hubs reject timestamps further than this into the future.
pub const MAX_FUTURE_DRIFT_SECS: u64 = 600;

/// Current Farcaster time.
pub fn farcaster_time() -> Result<u32, crate::Error> {
    to_farcaster_time(unix_now_ms())
}

/// Convert a unix millisecond timestamp to Farcaster seconds.
pub fn to_farcaster_time(unix_ms: u64) -> Result<u32, crate::Error> {
    if unix_ms < FARCASTER_EPOCH_MS {
        return Err(crate::Error::InvalidTimestamp(format!(
            "time {unix_ms}ms predates the Farcaster epoch"
        )));
    }
    let seconds = (unix_ms - FARCASTER_EPOCH_MS) / 1000;
    u32::try_from(seconds).map_err(|_| {
        crate::Error::InvalidTimestamp(format!("time {unix_ms}ms is too far in the future"))
    })
}

/// Convert a Farcaster timestamp back to unix milliseconds.
pub fn from_farcaster_time(timestamp: u32) -> u64 {
    u64::from(timestamp) * 1000 + FARCASTER_EPOCH_MS
}

/// Check that a message timestamp is inside the window hubs accept:
/// not before the epoch (guaranteed by the type) and at most
/// [`MAX_FUTURE_DRIFT_SECS`] ahead of now.
pub fn validate_timestamp(timestamp: u32) -> Result<(), crate::Error> {
    let now = farcaster_time()?;
    let limit = u64::from(now) + MAX_FUTURE_DRIFT_SECS;
    if u64::from(timestamp) > limit {
        return Err(crate::Error::InvalidTimestamp(format!(
            "timestamp {timestamp} is more than {MAX_FUTURE_DRIFT_SECS}s ahead of current time {now}"
        )));
    }
    Ok(())
}

/// Current unix time in seconds. Used for key request deadlines.
pub fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
