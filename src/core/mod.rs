//! Core controller functionality
//!
//! This module contains the configuration layer and the fundamental
//! infrastructure around it: audit logging and sensor bus bring-up.

pub mod bus;
pub mod kv;
pub mod logging;
