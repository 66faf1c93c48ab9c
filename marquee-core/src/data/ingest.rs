//! Validation of documents pushed over the network

use marquee_protocol::Status;
use serde_json::Value;

use super::payload::as_seconds;

/// Largest document accepted for a topic, compactly encoded
///
/// One stored record (document plus its bookkeeping) must fit in a single
/// flash item.
pub const MAX_DOCUMENT_SIZE: usize = 3072;

/// Reasons a pushed document is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestError {
    /// Body is not valid JSON
    InvalidJson,
    /// `/set-time` body lacks a usable `time` field
    MissingTime,
    /// Document exceeds [`MAX_DOCUMENT_SIZE`] once encoded
    TooLarge,
}

impl IngestError {
    /// Response status reported to the client
    pub fn status(self) -> Status {
        match self {
            IngestError::InvalidJson => Status::InvalidJson,
            IngestError::MissingTime => Status::MissingTime,
            IngestError::TooLarge => Status::PayloadTooLarge,
        }
    }
}

impl From<IngestError> for Status {
    fn from(e: IngestError) -> Self {
        e.status()
    }
}

/// Parse a topic body
pub fn parse_document(body: &[u8]) -> Result<Value, IngestError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| IngestError::InvalidJson)?;
    // Re-encoding can grow a body (`1e15` prints in full)
    let encoded = serde_json::to_vec(&value).map_err(|_| IngestError::InvalidJson)?;
    if encoded.len() > MAX_DOCUMENT_SIZE {
        return Err(IngestError::TooLarge);
    }
    Ok(value)
}

/// Parse a `/set-time` body: `{"time": <unix seconds>}`
pub fn parse_set_time(body: &[u8]) -> Result<u64, IngestError> {
    let doc = parse_document(body)?;
    doc.get("time")
        .and_then(as_seconds)
        .ok_or(IngestError::MissingTime)
}
