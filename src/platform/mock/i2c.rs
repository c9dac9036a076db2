//! Mock I2C bus implementation for testing

use crate::platform::error::BusError;
use crate::platform::traits::i2c::{I2cBus, I2cConfig};
use heapless::Vec;

/// Bus lifecycle event recorded by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusTransaction {
    /// Driver installed
    Configure { sda: u32, scl: u32, frequency: u32 },
    /// Driver released
    Shutdown,
}

/// Mock I2C bus
///
/// Records lifecycle calls for test verification and allows injecting a
/// failure into the next call.
#[derive(Debug, Default)]
pub struct MockI2cBus {
    transactions: Vec<BusTransaction, 8>,
    fail_next: Option<BusError>,
}

impl MockI2cBus {
    /// Create a new mock bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lifecycle log (for test verification)
    pub fn transactions(&self) -> &[BusTransaction] {
        &self.transactions
    }

    /// Make the next lifecycle call fail with `err` (consumed on use)
    pub fn fail_next(&mut self, err: BusError) {
        self.fail_next = Some(err);
    }
}

impl I2cBus for MockI2cBus {
    fn configure(&mut self, sda: u32, scl: u32, config: &I2cConfig) -> Result<(), BusError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        let _ = self.transactions.push(BusTransaction::Configure {
            sda,
            scl,
            frequency: config.frequency,
        });
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), BusError> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        let _ = self.transactions.push(BusTransaction::Shutdown);
        Ok(())
    }
}
