#![cfg_attr(not(test), no_std)]

//! trellis - configuration core for a connected plant-care controller
//!
//! This library provides the persistent key-value configuration layer that
//! every other subsystem reads at boot, plus bring-up for the controller's
//! sensor bus.

// Platform abstraction layer (persistent store backend, I2C bus)
pub mod platform;

// Core systems (KV layer, bootstrap, logging, bus lifecycle)
pub mod core;
