//! Mock platform implementations for testing

pub mod i2c;
pub mod storage;

pub use i2c::{BusTransaction, MockI2cBus};
pub use storage::MockNvs;
