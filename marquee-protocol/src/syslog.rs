//! BSD syslog (RFC 3164) messages
//!
//! `<PRI>Mmm dd hh:mm:ss HOST TAG: MSG`, sent as one UDP datagram per
//! line. Timestamps are UTC. Lines that do not fit the buffer are cut.

use core::fmt::{self, Write};

use heapless::String;

/// Syslog UDP port
pub const SYSLOG_PORT: u16 = 514;

/// `local0`
pub const FACILITY_LOCAL0: u8 = 16;

/// Largest line the sign sends
pub const MAX_LINE_LEN: usize = 192;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    Critical = 2,
    Error = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

/// Priority value: facility * 8 + severity
pub fn priority(facility: u8, severity: Severity) -> u8 {
    facility * 8 + severity as u8
}

/// Month (1-12) and day of a unix timestamp
fn month_day(epoch: u64) -> (u32, u32) {
    // Days-to-civil, with March as the first month of the year
    let days = (epoch / 86_400) as i64 + 719_468;
    let era = days.div_euclid(146_097);
    let doe = days - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (month, day)
}

/// Writer that drops whatever does not fit
struct Truncating<'a, const N: usize>(&'a mut String<N>);

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format one syslog line
pub fn format_line(
    severity: Severity,
    epoch: u64,
    host: [u8; 4],
    tag: &str,
    message: fmt::Arguments<'_>,
) -> String<MAX_LINE_LEN> {
    let mut line = String::new();
    let (month, day) = month_day(epoch);
    let secs = epoch % 86_400;
    let mut out = Truncating(&mut line);
    let _ = write!(
        out,
        "<{}>{} {:>2} {:02}:{:02}:{:02} {}.{}.{}.{} {}: {}",
        priority(FACILITY_LOCAL0, severity),
        MONTHS[(month - 1) as usize],
        day,
        secs / 3600,
        secs / 60 % 60,
        secs % 60,
        host[0],
        host[1],
        host[2],
        host[3],
        tag,
        message,
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority() {
        assert_eq!(priority(FACILITY_LOCAL0, Severity::Info), 134);
        assert_eq!(priority(FACILITY_LOCAL0, Severity::Error), 131);
    }

    #[test]
    fn test_month_day() {
        assert_eq!(month_day(0), (1, 1));
        assert_eq!(month_day(1_700_000_000), (11, 14));
        // 2024-02-29
        assert_eq!(month_day(1_709_164_800), (2, 29));
        assert_eq!(month_day(1_709_251_199), (2, 29));
        assert_eq!(month_day(1_709_251_200), (3, 1));
    }

    #[test]
    fn test_line_layout() {
        let line = format_line(
            Severity::Info,
            1_700_000_000,
            [10, 0, 0, 7],
            "marquee",
            format_args!("stored {}", "weather"),
        );
        assert_eq!(line.as_str(), "<134>Nov 14 22:13:20 10.0.0.7 marquee: stored weather");

        let line = format_line(Severity::Warning, 65, [0; 4], "marquee", format_args!("x"));
        assert_eq!(line.as_str(), "<132>Jan  1 00:01:05 0.0.0.0 marquee: x");
    }

    #[test]
    fn test_long_lines_are_cut() {
        let long = "y".repeat(400);
        let line = format_line(Severity::Debug, 0, [0; 4], "marquee", format_args!("{}", long));
        assert_eq!(line.len(), MAX_LINE_LEN);
        assert!(line.ends_with('y'));
    }
}
