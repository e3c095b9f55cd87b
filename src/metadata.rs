//! Device metadata snapshot.
//!
//! [`DeviceMeta`] is a lightweight, cloneable description of a device suitable
//! for UI display, logging, and persistence. It is derived from a built
//! [`Device`](crate::device::Device) via
//! [`Device::metadata`](crate::device::Device::metadata).
//!
//! ## Persistence notes
//! - `vid`/`pid` and `serial_number` (when present) are generally stable and useful for re-identification.
//! - `path` and `location_id` are platform-specific and may change across ports and reconnects;
//!   treat them as diagnostic first, identity second.

use serde::{Deserialize, Serialize};

use crate::device::ElementCounts;

/// Snapshot of metadata describing a single device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMeta {
    /// Transport classification (e.g., `"USB"`, `"Bluetooth"`).
    pub bus: String,
    pub vid: u16,
    pub pid: u16,
    pub version: u16,
    pub manufacturer: Option<String>,
    /// Human-readable product name from the driver/firmware.
    pub product_string: Option<String>,
    pub serial_number: Option<String>,
    /// HID interface index (platform-reported, `-1` when not applicable).
    pub interface_number: i32,
    pub usage_page: u16,
    pub usage: u16,
    /// Friendly name of the primary usage (e.g. `"Joystick"`).
    pub usage_name: String,
    pub location_id: u32,
    /// OS/topological path to the device. Opaque.
    pub path: String,
    pub counts: ElementCounts,
}
