//! Process-wide monotonic clock with microsecond precision.
//!
//! Record timestamps must never move backwards and `updated_at` must
//! strictly increase across successive mutations of the same record, even
//! when the system clock stalls or steps back. The last issued reading is
//! always advanced by at least one microsecond.

use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_US: Lazy<Mutex<u64>> = Lazy::new(|| Mutex::new(0));

fn system_time_now_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

/// Current time in microseconds since the Unix epoch.
///
/// Every call returns a value strictly greater than the previous one.
pub fn now_micros() -> u64 {
    let now = system_time_now_us();
    let mut last = LAST_US.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let candidate = if now <= *last {
        last.saturating_add(1)
    } else {
        now
    };

    *last = candidate;
    candidate
}
