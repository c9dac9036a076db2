//! Boot-time configuration sequences
//!
//! [`preinit`] must run before any other subsystem reads configuration;
//! [`postinit`] runs once the control link is up. Both propagate errors
//! instead of aborting: any `Err` means the configuration state is
//! unknown, and the caller's policy is to restart the process rather than
//! continue with silent misconfiguration.

use crate::core::kv::defaults;
use crate::core::kv::sync::LinkSync;
use crate::core::kv::{KvError, KvStore};
use crate::core::logging::LogSink;
use crate::platform::traits::storage::{NvsBackend, MAX_VALUE_LEN};

/// Connection state of the control link (runtime only, never persisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// In-memory state derived from configuration at boot
#[derive(Debug, Default)]
pub struct RuntimeState {
    link_status: LinkStatus,
}

impl RuntimeState {
    /// Create runtime state with the link marked disconnected
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_status(&self) -> LinkStatus {
        self.link_status
    }

    pub fn set_link_status(&mut self, status: LinkStatus) {
        self.link_status = status;
    }
}

/// Initialize the store and seed every default-table row
///
/// Runs before any other subsystem touches configuration. Idempotent
/// across boots: existing values are never overwritten.
pub fn preinit<B: NvsBackend, L: LogSink>(kv: &mut KvStore<B, L>) -> Result<(), KvError> {
    kv.init()?;
    defaults::seed_defaults(kv)
}

/// Push stored values to the control link and reset derived runtime state
///
/// Runs after the link layer is ready. The network identifier and the
/// device time go out via the sync hooks; the link status starts over at
/// disconnected.
pub fn postinit<B, L, S>(
    kv: &mut KvStore<B, L>,
    link: &mut S,
    runtime: &mut RuntimeState,
) -> Result<(), KvError>
where
    B: NvsBackend,
    L: LogSink,
    S: LinkSync,
{
    let mut buf = [0u8; MAX_VALUE_LEN];
    let ssid = kv.get_str(defaults::WIFI_SSID, &mut buf)?;
    link.sync_str(defaults::WIFI_SSID, ssid);

    let time = kv.get_int(defaults::TIME)?;
    link.sync_int(defaults::TIME, time);

    runtime.set_link_status(LinkStatus::Disconnected);
    Ok(())
}

/// Bump the persisted restart counter, returning the new count
///
/// Called once per boot, after [`preinit`] has seeded the counter.
pub fn record_restart<B: NvsBackend, L: LogSink>(kv: &mut KvStore<B, L>) -> Result<i32, KvError> {
    let count = kv.get_int(defaults::N_RESTARTS)?.saturating_add(1);
    kv.set_int(defaults::N_RESTARTS, count)?;
    Ok(count)
}
