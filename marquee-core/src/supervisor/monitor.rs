//! Failure and memory monitor

/// Consecutive failed ticks before the board is reset
pub const MAX_CONSECUTIVE_FAILURES: u8 = 2;

/// What the run loop should do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Tick succeeded
    Healthy,
    /// Tick failed; log, back off and try again
    Retry,
    /// Too many failures in a row; reset the board
    Reset,
}

/// Heap watermark check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryStatus {
    Ok,
    /// Free heap below the configured low-water mark
    Low { free: usize },
}

/// Tracks consecutive run-loop failures
#[derive(Debug, Clone, Default)]
pub struct Supervisor {
    consecutive_failures: u8,
    total_failures: u32,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one tick
    pub fn record<T, E>(&mut self, result: &Result<T, E>) -> Verdict {
        match result {
            Ok(_) => {
                self.consecutive_failures = 0;
                Verdict::Healthy
            }
            Err(_) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                self.total_failures = self.total_failures.saturating_add(1);
                if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    Verdict::Reset
                } else {
                    Verdict::Retry
                }
            }
        }
    }

    /// Failures since the last success
    pub fn consecutive_failures(&self) -> u8 {
        self.consecutive_failures
    }

    /// Failures since boot
    pub fn total_failures(&self) -> u32 {
        self.total_failures
    }
}

/// Compare free heap against the low-water mark
pub fn check_memory(free: usize, low_water: usize) -> MemoryStatus {
    if free < low_water {
        MemoryStatus::Low { free }
    } else {
        MemoryStatus::Ok
    }
}
