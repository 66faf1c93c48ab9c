//! Per-key record

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One key's value plus its bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Last value written; absent until the first write
    #[serde(
        rename = "data",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "written_value"
    )]
    pub value: Option<Value>,
    /// Written since the last `clear_updated`
    #[serde(default)]
    pub updated: bool,
    /// Time of the last write in seconds, 0 if never written
    #[serde(default)]
    pub last_updated: u64,
}

/// A present `data` field is a write, even when it holds `null`
fn written_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl DataRecord {
    /// Record as created on first reference
    pub const fn empty() -> Self {
        Self {
            value: None,
            updated: false,
            last_updated: 0,
        }
    }
}
