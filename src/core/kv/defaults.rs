//! Compiled-in configuration defaults
//!
//! One declarative table lists every configuration key with its typed
//! default and flags; [`seed_defaults`] applies it row by row through the
//! default-seed accessors. The table is configuration data: extend it by
//! adding rows, never by hand-writing seeding calls.
//!
//! String defaults come from build-time environment passthrough (see
//! `build.rs`); the secret flag keeps the Wi-Fi password off the metric
//! channel when seeding observes an already-configured device.

use crate::core::kv::{KvError, KvStore};
use crate::core::logging::{LogChannel, LogSink};
use crate::platform::traits::storage::NvsBackend;
use bitflags::bitflags;

// Key names, unique within the store's single namespace
pub const WIFI_SSID: &str = "WIFI_SSID";
pub const WIFI_PASSWORD: &str = "WPASS";
pub const TIME: &str = "TIME";
pub const N_RESTARTS: &str = "N_RESTARTS";
pub const OTA_TIMESTAMP: &str = "OTA_TIMESTAMP";
pub const OTA_SERVER_IP: &str = "OTA_SERVER_IP";
pub const OTA_SERVER_HOSTNAME: &str = "OTA_SERVER_HOSTNAME";
pub const OTA_SERVER_PORT: &str = "OTA_SERVER_PORT";
pub const OTA_VERSION_FILENAME: &str = "OTA_VERSION_FILENAME";
pub const OTA_FILENAME: &str = "OTA_FILENAME";
pub const BROKER_URL: &str = "BROKER_URL";
pub const I2C_SDA: &str = "I2C_SDA";
pub const I2C_SCL: &str = "I2C_SCL";

/// Default SDA pin for the sensor bus
pub const DEFAULT_I2C_SDA: i32 = 4;

/// Default SCL pin for the sensor bus
pub const DEFAULT_I2C_SCL: i32 = 5;

/// Seconds since epoch of this build, stamped by `build.rs`
pub const BUILD_TIMESTAMP: i32 = parse_epoch(env!("BUILD_TIMESTAMP"));

bitflags! {
    /// Per-key behavior flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyFlags: u8 {
        /// Value never leaves the device through telemetry
        const SECRET = 0b0000_0001;
    }
}

/// Typed default value for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Int(i32),
    Str(&'static str),
}

/// One row of the default table
#[derive(Debug, Clone, Copy)]
pub struct KeyDefault {
    pub key: &'static str,
    pub value: DefaultValue,
    pub flags: KeyFlags,
}

/// Every configuration key with its compiled-in default
pub static DEFAULTS: &[KeyDefault] = &[
    KeyDefault {
        key: WIFI_SSID,
        value: DefaultValue::Str(env!("WIFI_SSID")),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: WIFI_PASSWORD,
        value: DefaultValue::Str(env!("WIFI_PASSWORD")),
        flags: KeyFlags::SECRET,
    },
    KeyDefault {
        key: TIME,
        value: DefaultValue::Int(0),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: N_RESTARTS,
        value: DefaultValue::Int(0),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: OTA_TIMESTAMP,
        value: DefaultValue::Int(BUILD_TIMESTAMP),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: OTA_SERVER_IP,
        value: DefaultValue::Str(env!("OTA_SERVER_IP")),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: OTA_SERVER_HOSTNAME,
        value: DefaultValue::Str(env!("OTA_SERVER_HOSTNAME")),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: OTA_SERVER_PORT,
        value: DefaultValue::Str(env!("OTA_SERVER_PORT")),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: OTA_VERSION_FILENAME,
        value: DefaultValue::Str(env!("OTA_VERSION_FILENAME")),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: OTA_FILENAME,
        value: DefaultValue::Str(env!("OTA_FILENAME")),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: BROKER_URL,
        value: DefaultValue::Str(env!("BROKER_URL")),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: I2C_SDA,
        value: DefaultValue::Int(DEFAULT_I2C_SDA),
        flags: KeyFlags::empty(),
    },
    KeyDefault {
        key: I2C_SCL,
        value: DefaultValue::Int(DEFAULT_I2C_SCL),
        flags: KeyFlags::empty(),
    },
];

/// Flags for `key`, when it appears in the default table
pub fn flags_for(key: &str) -> Option<KeyFlags> {
    DEFAULTS.iter().find(|d| d.key == key).map(|d| d.flags)
}

/// Audit channel for `key`'s value lines
///
/// Secret keys route to the non-transmitted channel; everything else,
/// including keys outside the table, is a normal metric.
pub fn log_channel_for(key: &str) -> LogChannel {
    match flags_for(key) {
        Some(flags) if flags.contains(KeyFlags::SECRET) => LogChannel::NoSend,
        _ => LogChannel::Metric,
    }
}

/// Apply the default table through the default-seed accessors
///
/// Idempotent: rows whose key already exists are left untouched.
pub fn seed_defaults<B: NvsBackend, L: LogSink>(kv: &mut KvStore<B, L>) -> Result<(), KvError> {
    for row in DEFAULTS {
        match row.value {
            DefaultValue::Int(value) => kv.default_int(row.key, value)?,
            DefaultValue::Str(value) => kv.default_str(row.key, value)?,
        }
    }
    Ok(())
}

/// Parse the leading decimal digits of `s`, for build-time stamps
const fn parse_epoch(s: &str) -> i32 {
    let bytes = s.as_bytes();
    let mut value: i32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if digit < b'0' || digit > b'9' {
            break;
        }
        value = value * 10 + (digit - b'0') as i32;
        i += 1;
    }
    value
}
