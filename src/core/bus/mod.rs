//! Sensor bus bring-up
//!
//! Placeholder lifecycle for the controller's I2C sensor bus. Pin
//! assignments come from the configuration store; the driver behind
//! [`I2cBus`] lives in the platform layer and carries no logic yet.

use crate::core::kv::{defaults, KvError, KvStore};
use crate::core::logging::LogSink;
use crate::platform::error::BusError;
use crate::platform::traits::i2c::{I2cBus, I2cConfig};
use crate::platform::traits::storage::NvsBackend;

/// Interval of the periodic bus service in milliseconds
pub const BUS_SERVICE_INTERVAL_MS: u32 = 2_000;

/// SDA pin assignment from the configuration store
pub fn bus_sda_pin<B: NvsBackend, L: LogSink>(kv: &mut KvStore<B, L>) -> Result<i32, KvError> {
    kv.get_int(defaults::I2C_SDA)
}

/// SCL pin assignment from the configuration store
pub fn bus_scl_pin<B: NvsBackend, L: LogSink>(kv: &mut KvStore<B, L>) -> Result<i32, KvError> {
    kv.get_int(defaults::I2C_SCL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BusState {
    Stopped,
    Started,
}

/// Lifecycle of the hardware bus, owned by the component bringing it up
pub struct BusLifecycle {
    state: BusState,
}

impl BusLifecycle {
    pub const fn new() -> Self {
        Self {
            state: BusState::Stopped,
        }
    }

    pub fn is_started(&self) -> bool {
        self.state == BusState::Started
    }

    /// Install the driver on the given pins. A second call is a no-op.
    pub fn start<I: I2cBus>(&mut self, bus: &mut I, sda: i32, scl: i32) -> Result<(), BusError> {
        if self.state == BusState::Started {
            return Ok(());
        }
        let sda = u32::try_from(sda).map_err(|_| BusError::InvalidPin)?;
        let scl = u32::try_from(scl).map_err(|_| BusError::InvalidPin)?;
        bus.configure(sda, scl, &I2cConfig::default())?;
        self.state = BusState::Started;
        Ok(())
    }

    /// Release the driver. A second call is a no-op.
    pub fn stop<I: I2cBus>(&mut self, bus: &mut I) -> Result<(), BusError> {
        if self.state == BusState::Stopped {
            return Ok(());
        }
        bus.shutdown()?;
        self.state = BusState::Stopped;
        Ok(())
    }
}

impl Default for BusLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Bring the bus up using the pins stored in configuration
pub fn start_bus<I, B, L>(
    lifecycle: &mut BusLifecycle,
    bus: &mut I,
    kv: &mut KvStore<B, L>,
) -> Result<(), BusError>
where
    I: I2cBus,
    B: NvsBackend,
    L: LogSink,
{
    let sda = bus_sda_pin(kv).map_err(|_| BusError::ConfigUnavailable)?;
    let scl = bus_scl_pin(kv).map_err(|_| BusError::ConfigUnavailable)?;
    lifecycle.start(bus, sda, scl)
}

/// Periodic bus service
///
/// Does no work yet; it reserves the executor slot and interval so driver
/// logic can land without touching the boot sequence. Must stay off the
/// configuration store.
pub struct BusService {
    interval_ms: u32,
}

impl BusService {
    pub const fn new() -> Self {
        Self {
            interval_ms: BUS_SERVICE_INTERVAL_MS,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// One service tick
    pub fn poll(&mut self) {}
}

impl Default for BusService {
    fn default() -> Self {
        Self::new()
    }
}
