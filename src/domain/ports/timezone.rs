//! Timezone-offset lookup port.
//!
//! The record's `utc_offset` derives from the submitted `tz_name`. The
//! lookup is an external collaborator so tests can pin offsets and the
//! tzdb dependency stays at the edge.

use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Resolve an IANA zone name to its UTC offset at a given instant.
pub trait TimezoneOffsets: Send + Sync {
    /// Offset in minutes east of UTC, or `None` for an unknown name.
    fn offset_minutes(&self, tz_name: &str, at: DateTime<Utc>) -> Option<i32>;
}

/// tzdb-backed lookup used in production wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct TzdbTimezoneOffsets;

impl TimezoneOffsets for TzdbTimezoneOffsets {
    fn offset_minutes(&self, tz_name: &str, at: DateTime<Utc>) -> Option<i32> {
        let zone: Tz = tz_name.parse().ok()?;
        let seconds = zone
            .offset_from_utc_datetime(&at.naive_utc())
            .fix()
            .local_minus_utc();
        Some(seconds / 60)
    }
}

/// Fixed-offset lookup for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimezoneOffsets(pub i32);

impl TimezoneOffsets for FixedTimezoneOffsets {
    fn offset_minutes(&self, _tz_name: &str, _at: DateTime<Utc>) -> Option<i32> {
        Some(self.0)
    }
}
