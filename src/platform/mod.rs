//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the persistent store and
//! the I2C bus. Platform-specific code stays behind these traits; the mock
//! implementations are available for host testing.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{BusError, StorageError};
pub use traits::{I2cBus, I2cConfig, NvsBackend, NvsToken, MAX_KEY_LEN, MAX_VALUE_LEN};
