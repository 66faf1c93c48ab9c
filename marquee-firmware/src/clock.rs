//! Platform clock
//!
//! Seconds since boot until a time source has been applied, unix seconds
//! after. Buttons and tones use the monotonic millisecond counter instead,
//! so setting the clock never disturbs them.

use embassy_time::Instant;
use portable_atomic::{AtomicBool, AtomicU64, Ordering};

/// Unix time at boot, once known
static BOOT_EPOCH: AtomicU64 = AtomicU64::new(0);
static SYNCED: AtomicBool = AtomicBool::new(false);

/// Current time in seconds
pub fn now() -> u64 {
    Instant::now().as_secs() + BOOT_EPOCH.load(Ordering::Relaxed)
}

/// Monotonic milliseconds since boot
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Seconds since boot
pub fn uptime() -> u64 {
    Instant::now().as_secs()
}

/// Set the clock to `epoch` unix seconds
pub fn set(epoch: u64) {
    BOOT_EPOCH.store(epoch.saturating_sub(uptime()), Ordering::Relaxed);
    SYNCED.store(true, Ordering::Relaxed);
}

/// Whether a time source has been applied since boot
pub fn is_synced() -> bool {
    SYNCED.load(Ordering::Relaxed)
}
