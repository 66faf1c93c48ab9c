//! Run-loop supervision
//!
//! Decides what the outer loop does after each tick: carry on, retry
//! after a fault, or give up and reset the board.

pub mod monitor;

pub use monitor::{check_memory, MemoryStatus, Supervisor, Verdict, MAX_CONSECUTIVE_FAILURES};
