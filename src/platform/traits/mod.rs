//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod i2c;
pub mod storage;

// Re-export trait interfaces
pub use i2c::{I2cBus, I2cConfig};
pub use storage::{NvsBackend, NvsToken, MAX_KEY_LEN, MAX_VALUE_LEN};
