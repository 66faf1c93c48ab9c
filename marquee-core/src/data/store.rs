//! Data store implementation

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::Value;

use super::record::DataRecord;

/// Errors from record encoding and decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Store could not be encoded as JSON
    Serialize,
    /// Snapshot is not a valid store document
    Deserialize,
}

/// Age reported for a record stamped in the future
pub const UNKNOWN_AGE: u64 = u64::MAX;

/// Mapping from topic key to its latest value
///
/// Records are created lazily the first time a key is referenced, by a
/// read or a write, and are never removed. Reads that can create a record
/// therefore take `&mut self`.
///
/// Writes and acknowledgements mark a key unsaved; the owner collects
/// those with [`DataStore::take_unsaved`] and persists each
/// [`DataStore::record_json`] wherever the platform keeps it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataStore {
    records: BTreeMap<String, DataRecord>,
    unsaved: BTreeSet<String>,
}

impl DataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn touch(&mut self, key: &str) -> &mut DataRecord {
        self.records
            .entry(String::from(key))
            .or_insert_with(DataRecord::empty)
    }

    /// Whether a record exists for `key`, written or only referenced
    pub fn has_item(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Store `value` under `key`, mark it updated and stamp it with `now`
    pub fn set_item(&mut self, key: &str, value: Value, now: u64) {
        let record = self.touch(key);
        record.value = Some(value);
        record.updated = true;
        record.last_updated = now;
        self.unsaved.insert(String::from(key));
        debug!("data: set {=str} at {=u64}", key, now);
    }

    /// Value under `key`, or `None` if it was never written
    pub fn get_item(&mut self, key: &str) -> Option<&Value> {
        self.touch(key).value.as_ref()
    }

    /// Value under `key`, or `default` if it was never written
    pub fn get_item_or<'a>(&'a mut self, key: &str, default: &'a Value) -> &'a Value {
        self.touch(key).value.as_ref().unwrap_or(default)
    }

    /// Whether `key` was written since its flag was last cleared
    pub fn is_updated(&mut self, key: &str) -> bool {
        self.touch(key).updated
    }

    /// Acknowledge the current value of `key`
    pub fn clear_updated(&mut self, key: &str) {
        let record = self.touch(key);
        if record.updated {
            record.updated = false;
            self.unsaved.insert(String::from(key));
        }
    }

    /// Time of the last write to `key`, 0 if never written
    pub fn last_updated(&mut self, key: &str) -> u64 {
        self.touch(key).last_updated
    }

    /// Seconds since `key` was written
    ///
    /// Never-written keys report `now`, i.e. older than any threshold
    /// once the clock has run for a while. A stamp ahead of `now` came
    /// from another timebase (a snapshot taken after time sync, restored
    /// before the next one) and reports [`UNKNOWN_AGE`].
    pub fn age(&mut self, key: &str, now: u64) -> u64 {
        let stamp = self.last_updated(key);
        if stamp > now {
            return UNKNOWN_AGE;
        }
        now - stamp
    }

    /// Whether `key` is older than `threshold` seconds
    pub fn is_stale(&mut self, key: &str, now: u64, threshold: u64) -> bool {
        self.age(key, now) > threshold
    }

    /// Read-only view of every record
    pub fn all(&self) -> &BTreeMap<String, DataRecord> {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keys written or acknowledged since the last call
    pub fn take_unsaved(&mut self) -> Vec<String> {
        core::mem::take(&mut self.unsaved).into_iter().collect()
    }

    /// Encode the store as one JSON document
    ///
    /// `{"<key>": {"data": <value>, "updated": bool, "last_updated": u64}}`
    pub fn to_json(&self) -> Result<Vec<u8>, PersistError> {
        serde_json::to_vec(&self.records).map_err(|_| PersistError::Serialize)
    }

    /// Encode one record, `None` if `key` has none
    pub fn record_json(&self, key: &str) -> Option<Result<Vec<u8>, PersistError>> {
        self.records
            .get(key)
            .map(|record| serde_json::to_vec(record).map_err(|_| PersistError::Serialize))
    }

    /// Load a record produced by [`DataStore::record_json`]
    ///
    /// A corrupt record leaves `key` untouched.
    pub fn restore_record(&mut self, key: &str, bytes: &[u8]) -> Result<(), PersistError> {
        match serde_json::from_slice::<DataRecord>(bytes) {
            Ok(record) => {
                self.records.insert(String::from(key), record);
                Ok(())
            }
            Err(_) => {
                warn!("data: record {=str} corrupt ({=usize} bytes)", key, bytes.len());
                Err(PersistError::Deserialize)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Save every record and load them into a fresh store
    fn reload(store: &DataStore) -> DataStore {
        let mut restored = DataStore::new();
        for key in store.all().keys() {
            let bytes = store.record_json(key).unwrap().unwrap();
            restored.restore_record(key, &bytes).unwrap();
        }
        restored
    }

    #[test]
    fn test_unknown_key_defaults() {
        let mut store = DataStore::new();
        assert!(!store.has_item("weather"));
        assert_eq!(store.get_item("weather"), None);
        assert!(!store.is_updated("weather"));
        assert_eq!(store.last_updated("weather"), 0);
        assert_eq!(store.age("weather", 5_000), 5_000);
    }

    #[test]
    fn test_reads_create_records() {
        let mut store = DataStore::new();
        store.is_updated("aqi");
        assert!(store.has_item("aqi"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()["aqi"], DataRecord::empty());
    }

    #[test]
    fn test_set_then_get() {
        let mut store = DataStore::new();
        store.set_item("aqi", json!({"aqi": 42}), 100);

        assert_eq!(store.get_item("aqi"), Some(&json!({"aqi": 42})));
        assert!(store.is_updated("aqi"));
        assert_eq!(store.age("aqi", 100), 0);
        assert_eq!(store.age("aqi", 160), 60);
    }

    #[test]
    fn test_get_item_or_default() {
        let mut store = DataStore::new();
        let fallback = json!({"refresh_interval": 21600});
        assert_eq!(store.get_item_or("ntp", &fallback), &fallback);
        store.set_item("ntp", json!({"refresh_interval": 60}), 1);
        assert_eq!(store.get_item_or("ntp", &fallback)["refresh_interval"], 60);
    }

    #[test]
    fn test_clear_keeps_value() {
        let mut store = DataStore::new();
        store.set_item("greet", json!({"person": "Ada L."}), 10);
        store.clear_updated("greet");
        assert!(!store.is_updated("greet"));
        assert_eq!(store.get_item("greet"), Some(&json!({"person": "Ada L."})));

        store.clear_updated("greet");
        assert!(!store.is_updated("greet"));
    }

    #[test]
    fn test_future_stamp_is_unknown_age() {
        let mut store = DataStore::new();
        store.set_item("uv", json!({"index": 3}), 1_000);
        assert_eq!(store.age("uv", 10), UNKNOWN_AGE);
        assert!(store.is_stale("uv", 10, 3600));
        assert_eq!(store.age("uv", 1_000), 0);
    }

    #[test]
    fn test_synced_snapshot_is_stale_before_resync() {
        let mut store = DataStore::new();
        store.set_item("weather", json!({"temperature": 61}), 1_700_000_000);
        // After a reboot the clock counts uptime until the next sync
        let mut restored = reload(&store);
        assert!(restored.is_stale("weather", 21, 3600));
        assert!(!restored.is_stale("weather", 1_700_000_010, 3600));
    }

    #[test]
    fn test_staleness_is_strictly_greater() {
        let mut store = DataStore::new();
        store.set_item("weather", json!({}), 0);
        assert!(!store.is_stale("weather", 3600, 3600));
        assert!(store.is_stale("weather", 3601, 3600));
    }

    #[test]
    fn test_unsaved_keys() {
        let mut store = DataStore::new();
        assert!(store.take_unsaved().is_empty());

        store.set_item("aqi", json!({"aqi": 5}), 1);
        store.set_item("uv", json!({"index": 2}), 1);
        store.set_item("aqi", json!({"aqi": 6}), 2);
        assert_eq!(store.take_unsaved(), ["aqi", "uv"]);
        assert!(store.take_unsaved().is_empty());

        // Reads create records but have nothing to save
        store.is_updated("solar");
        assert!(store.take_unsaved().is_empty());

        store.clear_updated("aqi");
        assert_eq!(store.take_unsaved(), ["aqi"]);

        // Already clear: nothing changed, nothing to save
        store.clear_updated("aqi");
        assert!(store.take_unsaved().is_empty());
    }

    #[test]
    fn test_snapshot_format() {
        let mut store = DataStore::new();
        store.set_item("aqi", json!({"aqi": 5}), 7);
        store.is_updated("solar");

        let bytes = store.to_json().unwrap();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            doc,
            json!({
                "aqi": {"data": {"aqi": 5}, "updated": true, "last_updated": 7},
                "solar": {"updated": false, "last_updated": 0}
            })
        );
    }

    #[test]
    fn test_snapshot_restores() {
        let mut store = DataStore::new();
        store.set_item("message", json!({"text": "hi", "color": 255}), 50);
        store.set_item("aqi", json!({"aqi": 12}), 60);
        store.clear_updated("aqi");

        let mut restored = reload(&store);

        assert!(restored.is_updated("message"));
        assert!(!restored.is_updated("aqi"));
        assert_eq!(restored.last_updated("aqi"), 60);
        assert_eq!(restored.get_item("message"), store.get_item("message"));
        assert!(restored.take_unsaved().is_empty());
    }

    #[test]
    fn test_null_value_survives_restore() {
        let mut store = DataStore::new();
        store.set_item("trimet", Value::Null, 5);
        store.is_updated("lunar");

        let mut restored = reload(&store);
        assert_eq!(restored.get_item("trimet"), Some(&Value::Null));
        assert_eq!(restored.get_item("lunar"), None);
    }

    #[test]
    fn test_record_format() {
        let mut store = DataStore::new();
        store.set_item("aqi", json!({"aqi": 5}), 7);
        assert_eq!(store.record_json("uv"), None);

        let bytes = store.record_json("aqi").unwrap().unwrap();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc, json!({"data": {"aqi": 5}, "updated": true, "last_updated": 7}));
    }

    #[test]
    fn test_corrupt_record_is_skipped() {
        let mut store = DataStore::new();
        store.set_item("aqi", json!({"aqi": 5}), 7);

        let corrupt: [&[u8]; 3] = [b"{\"data\": ", b"[1, 2, 3]", &[0xFF, 0xFE, 0x00]];
        for bytes in corrupt {
            assert_eq!(store.restore_record("aqi", bytes), Err(PersistError::Deserialize));
            assert_eq!(store.restore_record("uv", bytes), Err(PersistError::Deserialize));
        }
        assert_eq!(store.get_item("aqi"), Some(&json!({"aqi": 5})));
        assert!(!store.has_item("uv"));
    }

    #[test]
    fn test_partial_records_fill_defaults() {
        let mut store = DataStore::new();
        store
            .restore_record("uv", b"{\"data\": {\"index\": 4}}")
            .unwrap();
        assert_eq!(store.get_item("uv"), Some(&json!({"index": 4})));
        assert!(!store.is_updated("uv"));
        assert_eq!(store.last_updated("uv"), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn set_then_read_back(key in "[a-z]{1,12}", n in any::<i64>(), at in 0u64..1_000_000, later in 0u64..10_000) {
                let mut store = DataStore::new();
                store.set_item(&key, json!({"n": n}), at);
                prop_assert_eq!(store.get_item(&key), Some(&json!({"n": n})));
                prop_assert!(store.is_updated(&key));
                prop_assert_eq!(store.age(&key, at + later), later);
            }

            #[test]
            fn clear_is_idempotent(key in "[a-z]{1,12}", at in 0u64..1_000_000) {
                let mut store = DataStore::new();
                store.set_item(&key, json!(true), at);
                store.clear_updated(&key);
                let once = store.clone();
                store.clear_updated(&key);
                prop_assert_eq!(once.all(), store.all());
            }

            #[test]
            fn restore_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
                let _ = DataStore::new().restore_record("aqi", &bytes);
            }
        }
    }
}
