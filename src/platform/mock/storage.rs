//! Mock persistent store for testing
//!
//! Provides an in-memory store simulation for unit tests. Supports:
//! - Typed entries with the backend's key/value bounds enforced
//! - Fault injection for init and write failures
//! - Bookkeeping for erase cycles, commits, and handle balance

use crate::platform::error::StorageError;
use crate::platform::traits::storage::{NvsBackend, NvsToken, MAX_KEY_LEN, MAX_VALUE_LEN};
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum number of entries in the mock namespace
const MAX_ENTRIES: usize = 32;

/// One stored value
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Int(i32),
    Str(String<MAX_VALUE_LEN>),
}

/// Mock persistent store
///
/// # Example
///
/// ```
/// use trellis::platform::mock::MockNvs;
/// use trellis::platform::traits::NvsBackend;
///
/// let mut nvs = MockNvs::new();
/// nvs.init().unwrap();
///
/// let handle = nvs.open().unwrap();
/// nvs.set_i32(&handle, "TIME", 42).unwrap();
/// nvs.commit(&handle).unwrap();
/// nvs.close(handle);
///
/// assert_eq!(nvs.commit_count(), 1);
/// assert_eq!(nvs.open_handles(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockNvs {
    entries: FnvIndexMap<String<MAX_KEY_LEN>, Entry, MAX_ENTRIES>,
    initialized: bool,
    erase_count: u32,
    commit_count: u32,
    open_handles: u32,
    next_token: u32,
    fail_next_init: Option<StorageError>,
    fail_writes: bool,
}

impl MockNvs {
    /// Create an empty, uninitialized store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `init` call fail with `err` (consumed on use)
    pub fn fail_next_init(&mut self, err: StorageError) {
        self.fail_next_init = Some(err);
    }

    /// Make every write and commit fail until cleared
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of whole-store erase cycles performed
    pub fn erase_count(&self) -> u32 {
        self.erase_count
    }

    /// Number of commits performed
    pub fn commit_count(&self) -> u32 {
        self.commit_count
    }

    /// Number of handles currently open (0 when callers are balanced)
    pub fn open_handles(&self) -> u32 {
        self.open_handles
    }

    /// Number of entries in the namespace
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the namespace holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &str, entry: Entry) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        let key = String::try_from(key).map_err(|_| StorageError::InvalidKey)?;
        self.entries
            .insert(key, entry)
            .map(|_| ())
            .map_err(|_| StorageError::StoreFull)
    }

    fn lookup(&self, key: &str) -> Option<&Entry> {
        // A name beyond the key bound cannot have been stored
        let key = String::<MAX_KEY_LEN>::try_from(key).ok()?;
        self.entries.get(&key)
    }
}

impl NvsBackend for MockNvs {
    fn init(&mut self) -> Result<(), StorageError> {
        if let Some(err) = self.fail_next_init.take() {
            return Err(err);
        }
        self.initialized = true;
        Ok(())
    }

    fn erase(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.initialized = false;
        self.erase_count += 1;
        Ok(())
    }

    fn open(&mut self) -> Result<NvsToken, StorageError> {
        if !self.initialized {
            return Err(StorageError::OpenFailed);
        }
        self.open_handles += 1;
        self.next_token = self.next_token.wrapping_add(1);
        Ok(NvsToken::new(self.next_token))
    }

    fn close(&mut self, _token: NvsToken) {
        self.open_handles = self.open_handles.saturating_sub(1);
    }

    fn get_i32(&mut self, _token: &NvsToken, key: &str) -> Result<i32, StorageError> {
        match self.lookup(key) {
            Some(Entry::Int(v)) => Ok(*v),
            Some(Entry::Str(_)) => Err(StorageError::TypeMismatch),
            None => Err(StorageError::NotFound),
        }
    }

    fn set_i32(&mut self, _token: &NvsToken, key: &str, value: i32) -> Result<(), StorageError> {
        self.insert(key, Entry::Int(value))
    }

    fn str_len(&mut self, _token: &NvsToken, key: &str) -> Result<usize, StorageError> {
        match self.lookup(key) {
            Some(Entry::Str(s)) => Ok(s.len()),
            Some(Entry::Int(_)) => Err(StorageError::TypeMismatch),
            None => Err(StorageError::NotFound),
        }
    }

    fn get_str(
        &mut self,
        _token: &NvsToken,
        key: &str,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        let value = match self.lookup(key) {
            Some(Entry::Str(s)) => s,
            Some(Entry::Int(_)) => return Err(StorageError::TypeMismatch),
            None => return Err(StorageError::NotFound),
        };
        if buf.len() < value.len() {
            return Err(StorageError::BufferTooSmall {
                needed: value.len(),
            });
        }
        buf[..value.len()].copy_from_slice(value.as_bytes());
        Ok(value.len())
    }

    fn set_str(&mut self, _token: &NvsToken, key: &str, value: &str) -> Result<(), StorageError> {
        let value = String::try_from(value).map_err(|_| StorageError::ValueTooLarge)?;
        self.insert(key, Entry::Str(value))
    }

    fn commit(&mut self, _token: &NvsToken) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        self.commit_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialized() -> MockNvs {
        let mut nvs = MockNvs::new();
        nvs.init().unwrap();
        nvs
    }

    #[test]
    fn test_open_requires_init() {
        let mut nvs = MockNvs::new();
        assert_eq!(nvs.open().unwrap_err(), StorageError::OpenFailed);

        nvs.init().unwrap();
        let handle = nvs.open().unwrap();
        nvs.close(handle);
    }

    #[test]
    fn test_int_round_trip() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();

        nvs.set_i32(&handle, "TIME", 1234).unwrap();
        assert_eq!(nvs.get_i32(&handle, "TIME"), Ok(1234));

        nvs.close(handle);
    }

    #[test]
    fn test_str_round_trip() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();

        nvs.set_str(&handle, "WIFI_SSID", "greenroom").unwrap();
        assert_eq!(nvs.str_len(&handle, "WIFI_SSID"), Ok(9));

        let mut buf = [0u8; 16];
        let len = nvs.get_str(&handle, "WIFI_SSID", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"greenroom");

        nvs.close(handle);
    }

    #[test]
    fn test_missing_key() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();

        assert_eq!(nvs.get_i32(&handle, "NOPE"), Err(StorageError::NotFound));
        assert_eq!(nvs.str_len(&handle, "NOPE"), Err(StorageError::NotFound));

        nvs.close(handle);
    }

    #[test]
    fn test_type_mismatch() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();

        nvs.set_i32(&handle, "TIME", 0).unwrap();
        nvs.set_str(&handle, "WIFI_SSID", "x").unwrap();

        assert_eq!(
            nvs.str_len(&handle, "TIME"),
            Err(StorageError::TypeMismatch)
        );
        assert_eq!(
            nvs.get_i32(&handle, "WIFI_SSID"),
            Err(StorageError::TypeMismatch)
        );

        nvs.close(handle);
    }

    #[test]
    fn test_buffer_too_small_reports_needed() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();

        nvs.set_str(&handle, "BROKER_URL", "mqtt://broker").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(
            nvs.get_str(&handle, "BROKER_URL", &mut buf),
            Err(StorageError::BufferTooSmall { needed: 13 })
        );

        nvs.close(handle);
    }

    #[test]
    fn test_erase_clears_entries() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();
        nvs.set_i32(&handle, "TIME", 1).unwrap();
        nvs.close(handle);

        nvs.erase().unwrap();
        assert!(nvs.is_empty());
        assert_eq!(nvs.erase_count(), 1);

        // Erase leaves the store uninitialized, like a blank region
        assert_eq!(nvs.open().unwrap_err(), StorageError::OpenFailed);
    }

    #[test]
    fn test_fail_next_init_is_consumed() {
        let mut nvs = MockNvs::new();
        nvs.fail_next_init(StorageError::NoFreePages);

        assert_eq!(nvs.init().unwrap_err(), StorageError::NoFreePages);
        assert!(nvs.init().is_ok());
    }

    #[test]
    fn test_fail_writes() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();

        nvs.fail_writes(true);
        assert_eq!(
            nvs.set_i32(&handle, "TIME", 1),
            Err(StorageError::WriteFailed)
        );
        assert_eq!(nvs.commit(&handle), Err(StorageError::WriteFailed));

        nvs.fail_writes(false);
        assert!(nvs.set_i32(&handle, "TIME", 1).is_ok());

        nvs.close(handle);
    }

    #[test]
    fn test_handle_balance() {
        let mut nvs = initialized();

        let a = nvs.open().unwrap();
        let b = nvs.open().unwrap();
        assert_eq!(nvs.open_handles(), 2);
        assert_ne!(a.id(), b.id());

        nvs.close(a);
        nvs.close(b);
        assert_eq!(nvs.open_handles(), 0);
    }

    #[test]
    fn test_key_too_long() {
        let mut nvs = initialized();
        let handle = nvs.open().unwrap();

        let long_key = "K".repeat(MAX_KEY_LEN + 1);
        assert_eq!(
            nvs.set_i32(&handle, &long_key, 1),
            Err(StorageError::InvalidKey)
        );

        nvs.close(handle);
    }
}
