//! Derived online status.
//!
//! A toy reports `last_online` out-of-band through the broker ingestion
//! path; the console never writes it. Online-ness is a read-time derivation,
//! not persisted state.

use chrono::{DateTime, Duration, Utc};

/// A toy is online iff it checked in within this window.
pub const ONLINE_WINDOW_MINUTES: i64 = 5;

/// Whether a toy counts as online at `now`.
pub fn is_online(last_online: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_online {
        Some(seen) => now - seen < Duration::minutes(ONLINE_WINDOW_MINUTES),
        None => false,
    }
}
