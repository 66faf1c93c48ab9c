//! Flash storage abstractions
//!
//! Key-value storage for data store records and the sign configuration,
//! implemented by chip HALs on top of their flash.

/// Byte value of [`StorageKey::SignConfig`]
const SIGN_CONFIG_KEY: u8 = 1;

/// Byte value of record slot 0
const RECORD_KEY_BASE: u8 = 0x10;

/// Number of record slots
pub const RECORD_SLOTS: u8 = 0x40;

/// Storage keys for persisted data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageKey {
    /// Sign configuration as TOML text
    SignConfig,
    /// One data store record (JSON text), by slot below [`RECORD_SLOTS`]
    Record(u8),
}

impl StorageKey {
    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        match self {
            StorageKey::SignConfig => SIGN_CONFIG_KEY,
            StorageKey::Record(slot) => RECORD_KEY_BASE + (slot % RECORD_SLOTS),
        }
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            SIGN_CONFIG_KEY => Some(StorageKey::SignConfig),
            v if (RECORD_KEY_BASE..RECORD_KEY_BASE + RECORD_SLOTS).contains(&v) => {
                Some(StorageKey::Record(v - RECORD_KEY_BASE))
            }
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Flash storage trait
///
/// Wear-leveled key-value storage. Writes replace the previous value for
/// the key; a failed write leaves the previous value readable.
pub trait FlashStorage {
    /// Read a value by key into the provided buffer
    ///
    /// Returns the number of bytes read.
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Write a value by key
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> impl core::future::Future<Output = bool>;

    /// Erase all stored data
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u8();
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u8(buffer[0]) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_byte_values() {
        assert_eq!(StorageKey::SignConfig.as_u8(), 1);
        assert_eq!(StorageKey::from_u8(1), Some(StorageKey::SignConfig));
        assert_eq!(StorageKey::from_u8(0), None);
        assert_eq!(StorageKey::from_u8(2), None);
    }

    #[test]
    fn test_record_slots_are_distinct_keys() {
        assert_eq!(StorageKey::Record(0).as_u8(), 0x10);
        assert_eq!(StorageKey::from_u8(0x10), Some(StorageKey::Record(0)));
        assert_eq!(
            StorageKey::from_u8(StorageKey::Record(14).as_u8()),
            Some(StorageKey::Record(14))
        );
        assert_eq!(StorageKey::from_u8(0x10 + RECORD_SLOTS), None);
        assert_ne!(StorageKey::Record(0), StorageKey::Record(1));
    }
}
