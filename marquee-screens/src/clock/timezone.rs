//! Timezone offsets from pushed transition tables
//!
//! The `timezone` key holds `{"transitions": [{"timestamp": t, "offset": s}, ...]}`.
//! The offset in force is the one from the latest transition at or before
//! now; it stays valid until the next transition after now.

use marquee_core::data::payload::{as_int, as_seconds};
use marquee_core::data::{keys, DataStore, Value};

/// Cached offset with its validity window
#[derive(Debug, Clone, Default)]
pub struct TimezoneCache {
    offset_s: i64,
    /// Recompute at or after this time; 0 means nothing is cached
    valid_until: u64,
    /// `last_updated` of the table the cache was built from
    source: u64,
}

impl TimezoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset currently applied, in seconds
    pub fn offset(&self) -> i64 {
        self.offset_s
    }

    /// Offset in force at `now`, refreshing the cache when it runs out
    /// or a new table has been pushed
    pub fn offset_at(&mut self, data: &mut DataStore, now: u64) -> i64 {
        if !data.has_item(keys::TIMEZONE) {
            return self.offset_s;
        }

        let stamp = data.last_updated(keys::TIMEZONE);
        if self.valid_until != 0 && now < self.valid_until && stamp == self.source {
            return self.offset_s;
        }

        let Some(transitions) = data
            .get_item(keys::TIMEZONE)
            .and_then(|tz| tz.get("transitions"))
            .and_then(Value::as_array)
        else {
            return self.offset_s;
        };

        if transitions.is_empty() {
            return self.offset_s;
        }

        let mut latest: Option<(u64, i64)> = None;
        let mut next_change = u64::MAX;
        for transition in transitions {
            let (Some(at), Some(offset)) = (
                transition.get("timestamp").and_then(as_seconds),
                transition.get("offset").and_then(as_int),
            ) else {
                continue;
            };

            if at > now {
                next_change = next_change.min(at);
            } else if latest.map_or(true, |(prev, _)| at >= prev) {
                latest = Some((at, offset));
            }
        }

        if let Some((_, offset)) = latest {
            self.offset_s = offset;
        }
        self.valid_until = next_change;
        self.source = stamp;
        self.offset_s
    }
}
