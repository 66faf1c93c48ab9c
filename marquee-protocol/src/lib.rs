//! Marquee ingestion protocol
//!
//! External systems push JSON documents to the sign, one document per
//! topic, with plain HTTP requests:
//!
//! ```text
//! POST /weather HTTP/1.1
//! Content-Length: 97
//!
//! {"current":{"conditions":"rain","temperature":61,"humidity":80},"forecast":{"low":55,"high":64}}
//! ```
//!
//! This crate only deals with bytes: it splits requests into head and body,
//! maps paths to routes and topics, and formats response status lines. JSON
//! validation and storage happen in `marquee-core`.
//!
//! The same topics can arrive over MQTT, named `<prefix>/all/module/<key>`.
//!
//! It also carries the SNTP request/response codec used to set the clock
//! and the syslog line format used for remote logging.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod http;
pub mod mqtt;
pub mod ntp;
pub mod routes;
pub mod syslog;
pub mod topics;

pub use http::{HttpError, Method, Request, RequestHead, RequestParser, MAX_BODY_SIZE};
pub use mqtt::TopicTooLong;
pub use ntp::{NtpError, NTP_PACKET_SIZE, NTP_PORT};
pub use routes::{Route, Status};
pub use syslog::{Severity, SYSLOG_PORT};
pub use topics::Topic;
