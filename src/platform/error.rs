//! Platform error types
//!
//! All platform implementations map their HAL-specific failures onto these
//! variants.

use core::fmt;

/// Errors reported by the persistent store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Key does not exist in the namespace
    NotFound,
    /// Key exists but holds the other value variant
    TypeMismatch,
    /// Key name exceeds the backend's key length bound
    InvalidKey,
    /// Destination buffer cannot hold the stored string
    BufferTooSmall {
        /// Bytes required to hold the value
        needed: usize,
    },
    /// Value exceeds the backend's value size bound
    ValueTooLarge,
    /// Namespace is out of entry slots
    StoreFull,
    /// Store layout has no free pages left (exhausted or corrupt)
    NoFreePages,
    /// Store initialization failed
    InitFailed,
    /// Handle could not be opened
    OpenFailed,
    /// Read failed below the namespace layer
    ReadFailed,
    /// Write or commit failed below the namespace layer
    WriteFailed,
}

/// Errors reported by the I2C bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Bus fault during driver install or teardown
    Fault,
    /// Pin assignment is not a usable GPIO number
    InvalidPin,
    /// Pin configuration could not be read from the store
    ConfigUnavailable,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound => write!(f, "key not found"),
            StorageError::TypeMismatch => write!(f, "value has a different type"),
            StorageError::InvalidKey => write!(f, "key name too long"),
            StorageError::BufferTooSmall { needed } => {
                write!(f, "buffer too small, {} bytes required", needed)
            }
            StorageError::ValueTooLarge => write!(f, "value exceeds size bound"),
            StorageError::StoreFull => write!(f, "store is full"),
            StorageError::NoFreePages => write!(f, "no free pages"),
            StorageError::InitFailed => write!(f, "store initialization failed"),
            StorageError::OpenFailed => write!(f, "handle open failed"),
            StorageError::ReadFailed => write!(f, "read failed"),
            StorageError::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Fault => write!(f, "bus fault"),
            BusError::InvalidPin => write!(f, "invalid pin assignment"),
            BusError::ConfigUnavailable => write!(f, "bus configuration unavailable"),
        }
    }
}
