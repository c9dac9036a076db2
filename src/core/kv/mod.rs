//! Typed key-value configuration layer
//!
//! This module provides `has`/`get`/`set`/`default` accessors for `i32`
//! and bounded string values over the persistent store backend. The
//! quartet gives every configuration key safe bootstrap semantics: a
//! reflashed device keeps its prior configuration (default-seed never
//! overwrites), while a first-boot or freshly erased device gets sane
//! defaults applied automatically.
//!
//! Every accessor is a self-contained critical section: open a handle,
//! perform one operation, commit if mutating, close the handle. Handles
//! are never retained between calls.
//!
//! Failures are returned as [`KvError`]; the KV layer performs no process
//! control. The boot sequence decides whether a propagated error warrants
//! a restart (see [`bootstrap`]).

pub mod bootstrap;
pub mod defaults;
pub mod sync;

use crate::core::logging::{LogChannel, LogSink};
use crate::platform::error::StorageError;
use crate::platform::traits::storage::{NvsBackend, NvsToken, MAX_VALUE_LEN};
use core::fmt;
use core::fmt::Write as _;
use heapless::String;

/// Capacity of one formatted `key=value` line
type Line = String<{ crate::core::logging::LOG_LINE_SIZE }>;

/// Errors from KV operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KvError {
    /// Persistent store operation failed
    Storage(StorageError),
}

impl From<StorageError> for KvError {
    fn from(err: StorageError) -> Self {
        KvError::Storage(err)
    }
}

impl fmt::Display for KvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

/// Typed configuration store over a persistent backend
///
/// Owns the backend and the audit log sink. Single-threaded by design:
/// the surrounding system serializes configuration access.
pub struct KvStore<B: NvsBackend, L: LogSink> {
    backend: B,
    sink: L,
}

impl<B: NvsBackend, L: LogSink> KvStore<B, L> {
    /// Create a store over `backend`, logging to `sink`
    ///
    /// The backend is not touched until [`init`](Self::init) runs.
    pub fn new(backend: B, sink: L) -> Self {
        Self { backend, sink }
    }

    /// Initialize the persistent store
    ///
    /// A "no free pages" condition (space exhausted or corrupt layout) is
    /// recovered by erasing the whole region and retrying initialization
    /// exactly once; the recovery is recorded on the event channel. Any
    /// other failure propagates. On success one diagnostic handle is
    /// opened and closed to confirm availability.
    pub fn init(&mut self) -> Result<(), KvError> {
        if let Err(err) = self.backend.init() {
            if err != StorageError::NoFreePages {
                return Err(err.into());
            }
            self.backend.erase()?;
            self.sink
                .log(LogChannel::Event, "storage reset: no free pages");
            self.backend.init()?;
        }

        let handle = self.backend.open()?;
        self.backend.close(handle);
        Ok(())
    }

    /// Run one operation inside a scoped handle
    ///
    /// The handle is released before returning, on success and on error.
    fn with_handle<T, F>(&mut self, op: F) -> Result<T, KvError>
    where
        F: FnOnce(&mut B, &NvsToken) -> Result<T, StorageError>,
    {
        let handle = self.backend.open()?;
        let result = op(&mut self.backend, &handle);
        self.backend.close(handle);
        Ok(result?)
    }

    /// True iff `key` exists and holds an integer value
    ///
    /// Absence and type mismatch are normal `false` results, not errors.
    pub fn has_int(&mut self, key: &str) -> Result<bool, KvError> {
        self.with_handle(|nvs, h| match nvs.get_i32(h, key) {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound) | Err(StorageError::TypeMismatch) => Ok(false),
            Err(e) => Err(e),
        })
    }

    /// Read the integer stored under `key`
    ///
    /// Callers expecting absence must probe with
    /// [`has_int`](Self::has_int) first.
    pub fn get_int(&mut self, key: &str) -> Result<i32, KvError> {
        self.with_handle(|nvs, h| nvs.get_i32(h, key))
    }

    /// Write and commit an integer, then emit `key=value` on the metric
    /// channel
    pub fn set_int(&mut self, key: &str, value: i32) -> Result<(), KvError> {
        self.with_handle(|nvs, h| {
            nvs.set_i32(h, key, value)?;
            nvs.commit(h)
        })?;
        self.log_int(LogChannel::Metric, key, value);
        Ok(())
    }

    /// Seed `key` with `value` unless it already holds an integer
    ///
    /// The already-set branch reads and logs the existing value without
    /// modifying it.
    pub fn default_int(&mut self, key: &str, value: i32) -> Result<(), KvError> {
        if !self.has_int(key)? {
            self.set_int(key, value)
        } else {
            let current = self.get_int(key)?;
            self.log_int(defaults::log_channel_for(key), key, current);
            Ok(())
        }
    }

    /// True iff `key` exists and holds a string value
    ///
    /// Probes the stored length only; content is never fetched.
    pub fn has_str(&mut self, key: &str) -> Result<bool, KvError> {
        self.with_handle(|nvs, h| match nvs.str_len(h, key) {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound) | Err(StorageError::TypeMismatch) => Ok(false),
            Err(e) => Err(e),
        })
    }

    /// Read the string stored under `key` into `buf`
    ///
    /// `buf.len()` is the capacity; the returned slice is the actual
    /// value. [`StorageError::BufferTooSmall`] reports the required size
    /// when the value does not fit.
    pub fn get_str<'a>(&mut self, key: &str, buf: &'a mut [u8]) -> Result<&'a str, KvError> {
        let len = self.with_handle(|nvs, h| nvs.get_str(h, key, buf))?;
        core::str::from_utf8(&buf[..len]).map_err(|_| StorageError::ReadFailed.into())
    }

    /// Write and commit a string, then emit `key=value` on the metric
    /// channel
    pub fn set_str(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.with_handle(|nvs, h| {
            nvs.set_str(h, key, value)?;
            nvs.commit(h)
        })?;
        self.log_str(LogChannel::Metric, key, value);
        Ok(())
    }

    /// Seed `key` with `value` unless it already holds a string
    ///
    /// The already-set branch reads and logs the existing value without
    /// modifying it; keys flagged secret in the default table are routed
    /// to the non-transmitted channel so the value never reaches
    /// telemetry.
    pub fn default_str(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        if !self.has_str(key)? {
            self.set_str(key, value)
        } else {
            let mut buf = [0u8; MAX_VALUE_LEN];
            let current = self.get_str(key, &mut buf)?;
            self.log_str(defaults::log_channel_for(key), key, current);
            Ok(())
        }
    }

    /// Audit log sink
    pub fn sink(&self) -> &L {
        &self.sink
    }

    /// Audit log sink, mutable (tests drain recorded lines through this)
    pub fn sink_mut(&mut self) -> &mut L {
        &mut self.sink
    }

    /// Persistent backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persistent backend, mutable (tests inject faults through this)
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Tear the store apart, e.g. to rebuild it across a simulated reboot
    pub fn into_parts(self) -> (B, L) {
        (self.backend, self.sink)
    }

    fn log_int(&mut self, channel: LogChannel, key: &str, value: i32) {
        let mut line = Line::new();
        let _ = write!(line, "{}={}", key, value);
        self.sink.log(channel, &line);
    }

    fn log_str(&mut self, channel: LogChannel, key: &str, value: &str) {
        let mut line = Line::new();
        let _ = write!(line, "{}={}", key, value);
        self.sink.log(channel, &line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logging::RingBufferSink;
    use crate::platform::mock::MockNvs;

    fn store() -> KvStore<MockNvs, RingBufferSink> {
        let mut kv = KvStore::new(MockNvs::new(), RingBufferSink::new());
        kv.init().unwrap();
        kv
    }

    fn metric_lines(kv: &KvStore<MockNvs, RingBufferSink>) -> Vec<std::string::String> {
        kv.sink()
            .lines_on(LogChannel::Metric)
            .map(|l| l.line.as_str().to_string())
            .collect()
    }

    #[test]
    fn test_int_round_trip() {
        let mut kv = store();

        kv.set_int("TIME", 1234).unwrap();

        assert!(kv.has_int("TIME").unwrap());
        assert_eq!(kv.get_int("TIME").unwrap(), 1234);
    }

    #[test]
    fn test_str_round_trip() {
        let mut kv = store();

        kv.set_str("WIFI_SSID", "greenroom").unwrap();

        assert!(kv.has_str("WIFI_SSID").unwrap());
        let mut buf = [0u8; 64];
        assert_eq!(kv.get_str("WIFI_SSID", &mut buf).unwrap(), "greenroom");
    }

    #[test]
    fn test_has_int_false_on_absence_and_mismatch() {
        let mut kv = store();

        assert!(!kv.has_int("TIME").unwrap());

        kv.set_str("TIME", "not an int").unwrap();
        assert!(!kv.has_int("TIME").unwrap());
        assert!(kv.has_str("TIME").unwrap());
    }

    #[test]
    fn test_get_int_fails_on_absence() {
        let mut kv = store();
        assert_eq!(
            kv.get_int("TIME"),
            Err(KvError::Storage(StorageError::NotFound))
        );
    }

    #[test]
    fn test_default_int_never_overwrites() {
        let mut kv = store();

        kv.default_int("N_RESTARTS", 7).unwrap();
        assert_eq!(kv.get_int("N_RESTARTS").unwrap(), 7);

        kv.default_int("N_RESTARTS", 99).unwrap();
        assert_eq!(kv.get_int("N_RESTARTS").unwrap(), 7);
    }

    #[test]
    fn test_default_str_never_overwrites() {
        let mut kv = store();

        kv.default_str("WIFI_SSID", "first").unwrap();
        kv.default_str("WIFI_SSID", "second").unwrap();

        let mut buf = [0u8; 64];
        assert_eq!(kv.get_str("WIFI_SSID", &mut buf).unwrap(), "first");
    }

    #[test]
    fn test_set_int_logs_metric_line() {
        let mut kv = store();
        kv.set_int("TIME", 42).unwrap();

        assert_eq!(metric_lines(&kv), vec!["TIME=42"]);
    }

    #[test]
    fn test_default_logs_existing_value() {
        let mut kv = store();
        kv.set_int("TIME", 42).unwrap();
        kv.sink_mut().clear();

        kv.default_int("TIME", 0).unwrap();

        assert_eq!(metric_lines(&kv), vec!["TIME=42"]);
    }

    #[test]
    fn test_secret_key_routed_to_nosend_when_already_set() {
        let mut kv = store();
        kv.set_str(defaults::WIFI_PASSWORD, "hunter2").unwrap();
        kv.sink_mut().clear();

        kv.default_str(defaults::WIFI_PASSWORD, "").unwrap();

        assert_eq!(kv.sink().lines_on(LogChannel::Metric).count(), 0);
        let nosend: Vec<_> = kv.sink().lines_on(LogChannel::NoSend).collect();
        assert_eq!(nosend.len(), 1);
        assert_eq!(nosend[0].line.as_str(), "WPASS=hunter2");
    }

    #[test]
    fn test_plain_key_stays_on_metric_when_already_set() {
        let mut kv = store();
        kv.set_str(defaults::WIFI_SSID, "greenroom").unwrap();
        kv.sink_mut().clear();

        kv.default_str(defaults::WIFI_SSID, "").unwrap();

        assert_eq!(kv.sink().lines_on(LogChannel::NoSend).count(), 0);
        assert_eq!(metric_lines(&kv), vec!["WIFI_SSID=greenroom"]);
    }

    #[test]
    fn test_every_write_commits() {
        let mut kv = store();

        kv.set_int("TIME", 1).unwrap();
        kv.set_str("WIFI_SSID", "x").unwrap();
        kv.get_int("TIME").unwrap();

        assert_eq!(kv.backend().commit_count(), 2);
    }

    #[test]
    fn test_handles_released_after_each_call() {
        let mut kv = store();

        kv.set_int("TIME", 1).unwrap();
        let _ = kv.get_int("MISSING");
        let _ = kv.has_str("MISSING");

        assert_eq!(kv.backend().open_handles(), 0);
    }

    #[test]
    fn test_handle_released_on_write_failure() {
        let mut kv = store();
        kv.backend_mut().fail_writes(true);

        assert_eq!(
            kv.set_int("TIME", 1),
            Err(KvError::Storage(StorageError::WriteFailed))
        );
        assert_eq!(kv.backend().open_handles(), 0);
    }

    #[test]
    fn test_get_str_buffer_too_small() {
        let mut kv = store();
        kv.set_str("BROKER_URL", "mqtt://broker.local:1883").unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(
            kv.get_str("BROKER_URL", &mut buf),
            Err(KvError::Storage(StorageError::BufferTooSmall {
                needed: 24
            }))
        );
    }

    #[test]
    fn test_init_recovers_from_no_free_pages() {
        let mut backend = MockNvs::new();
        backend.fail_next_init(StorageError::NoFreePages);
        let mut kv = KvStore::new(backend, RingBufferSink::new());

        kv.init().unwrap();

        assert_eq!(kv.backend().erase_count(), 1);
        let events: Vec<_> = kv.sink().lines_on(LogChannel::Event).collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].line.as_str(), "storage reset: no free pages");
    }

    #[test]
    fn test_init_no_erase_on_healthy_store() {
        let kv = store();
        assert_eq!(kv.backend().erase_count(), 0);
    }

    #[test]
    fn test_init_propagates_other_failures() {
        let mut backend = MockNvs::new();
        backend.fail_next_init(StorageError::InitFailed);
        let mut kv = KvStore::new(backend, RingBufferSink::new());

        assert_eq!(
            kv.init(),
            Err(KvError::Storage(StorageError::InitFailed))
        );
        assert_eq!(kv.backend().erase_count(), 0);
    }
}
