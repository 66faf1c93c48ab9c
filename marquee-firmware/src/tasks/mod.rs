//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod app;
pub mod display;
pub mod http;
pub mod mqtt;
pub mod net;
pub mod ntp;
pub mod persist;
pub mod syslog;

pub use app::{app_task, AppIo};
pub use display::display_task;
pub use http::http_task;
pub use mqtt::mqtt_task;
pub use ntp::ntp_task;
pub use persist::persist_task;
pub use syslog::syslog_task;
