//! Remote log lines
//!
//! Selected events are mirrored to a syslog server when one is
//! configured. defmt output over RTT stays the primary log.

use core::fmt;

use portable_atomic::{AtomicBool, Ordering};

use marquee_protocol::syslog::{format_line, Severity};

use crate::channels::{LEASE, SYSLOG};
use crate::clock;

/// Tag on every line
const TAG: &str = "marquee";

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Start queueing lines for the syslog task
pub fn enable() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Queue one line; dropped when syslog is off or the queue is full
pub fn emit(severity: Severity, message: fmt::Arguments<'_>) {
    if !ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let host = LEASE.load(Ordering::Relaxed).to_be_bytes();
    let line = format_line(severity, clock::now(), host, TAG, message);
    let _ = SYSLOG.try_send(line);
}
