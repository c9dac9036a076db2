//! I2C bus interface trait
//!
//! This module defines the bus driver interface that platform
//! implementations must provide. Only lifecycle operations are modeled;
//! bus transactions are out of scope for this crate.

use crate::platform::error::BusError;

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Bus frequency in Hz (typically 100_000 or 400_000)
    pub frequency: u32,
    /// Timeout in microseconds
    pub timeout_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000,    // 100 kHz standard mode
            timeout_us: 1_000_000, // 1 second
        }
    }
}

/// I2C bus driver interface
///
/// # Safety Invariants
///
/// - Only one owner per bus instance
/// - `configure` must complete before any transaction is attempted
/// - `shutdown` must not be called while a transaction is in flight
pub trait I2cBus {
    /// Install the bus driver on the given signal pins
    fn configure(&mut self, sda: u32, scl: u32, config: &I2cConfig) -> Result<(), BusError>;

    /// Release the bus driver
    fn shutdown(&mut self) -> Result<(), BusError>;
}
