//! Persistent store interface trait
//!
//! This module defines the non-volatile key-value store interface that
//! platform implementations must provide. The store backs the typed
//! configuration layer in [`crate::core::kv`].
//!
//! # Store Characteristics
//!
//! - One flat namespace of string keys, each holding an `i32` or a bounded
//!   string (never both at once)
//! - Handles are scoped: opened before an operation, released right after
//! - Mutations become durable on `commit`; a committed write either fully
//!   applies or fully fails
//! - Store-level `init` reports exhausted or corrupt page layout as
//!   [`StorageError::NoFreePages`], which the caller recovers from with
//!   `erase` followed by one retry

use crate::platform::error::StorageError;

/// Maximum key name length in bytes
pub const MAX_KEY_LEN: usize = 32;

/// Maximum string value length in bytes
pub const MAX_VALUE_LEN: usize = 128;

/// Opaque handle to an open store session, issued by [`NvsBackend::open`]
///
/// Tokens are not `Clone`: closing consumes the token, so a released
/// session cannot be used again.
#[derive(Debug, PartialEq, Eq)]
pub struct NvsToken(u32);

impl NvsToken {
    /// Create a token. Only backends should call this, from `open`.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Backend-assigned session id
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Persistent store interface trait
///
/// # Safety Invariants
///
/// - `init` must succeed before any handle is opened
/// - Every token from `open` must be returned through `close`
/// - `commit` must be called on a handle before `close` for mutations to
///   be durable
/// - No concurrent access: the surrounding system serializes callers
pub trait NvsBackend {
    /// Initialize the store's underlying state
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoFreePages`] when the page layout is
    /// exhausted or corrupt; the caller may `erase` and retry once.
    /// Returns [`StorageError::InitFailed`] for any other failure.
    fn init(&mut self) -> Result<(), StorageError>;

    /// Erase the entire storage region, destroying every entry
    fn erase(&mut self) -> Result<(), StorageError>;

    /// Open a handle to the namespace
    fn open(&mut self) -> Result<NvsToken, StorageError>;

    /// Release a handle. Uncommitted mutations are dropped.
    fn close(&mut self, token: NvsToken);

    /// Read an integer entry
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when the key is absent,
    /// [`StorageError::TypeMismatch`] when it holds a string.
    fn get_i32(&mut self, token: &NvsToken, key: &str) -> Result<i32, StorageError>;

    /// Write an integer entry, replacing any previous value
    fn set_i32(&mut self, token: &NvsToken, key: &str, value: i32) -> Result<(), StorageError>;

    /// Probe the byte length of a string entry without fetching content
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`] when the key is absent,
    /// [`StorageError::TypeMismatch`] when it holds an integer.
    fn str_len(&mut self, token: &NvsToken, key: &str) -> Result<usize, StorageError>;

    /// Read a string entry into `buf`, returning the number of bytes written
    ///
    /// # Errors
    ///
    /// [`StorageError::BufferTooSmall`] reports the required size when the
    /// value does not fit in `buf`.
    fn get_str(
        &mut self,
        token: &NvsToken,
        key: &str,
        buf: &mut [u8],
    ) -> Result<usize, StorageError>;

    /// Write a string entry, replacing any previous value
    ///
    /// # Errors
    ///
    /// [`StorageError::ValueTooLarge`] when `value` exceeds
    /// [`MAX_VALUE_LEN`].
    fn set_str(&mut self, token: &NvsToken, key: &str, value: &str) -> Result<(), StorageError>;

    /// Make the handle's mutations durable
    fn commit(&mut self, token: &NvsToken) -> Result<(), StorageError>;
}
