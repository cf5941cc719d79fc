//! Wall-clock helpers for window start times, node timestamps, and envelope stamps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_STAMP_MS: AtomicU64 = AtomicU64::new(0);

/// Milliseconds since the unix epoch, or `0` when the clock reads before it.
pub fn unix_time_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Unix milliseconds that strictly increase across calls in this process.
///
/// When the clock stalls or steps backwards the previous stamp plus one is returned instead.
pub fn next_monotonic_timestamp_ms() -> u64 {
    let now = unix_time_ms_now();
    let previous = LAST_STAMP_MS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last.saturating_add(1)))
        })
        .unwrap_or(now);
    now.max(previous.saturating_add(1))
}
