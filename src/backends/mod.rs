//! Backends for `hidtree`.
//!
//! A [`Backend`] is the seam to the OS driver framework: it enumerates HID
//! interfaces, hands out their report descriptors, and opens a
//! [`DeviceInterface`] for report I/O. Everything above it (element trees,
//! counting, traversal, calibration) is backend-agnostic.
//!
//! # Feature flags
//! - **`hid`** (default) enables [`hid::HidApiBackend`] on top of `hidapi`.
//!
//! [`virtual_input::VirtualBackend`] is always available; it serves scripted
//! devices from memory for tests, demos and replay.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[cfg(feature = "hid")]
#[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
pub mod hid;
pub mod virtual_input;

/// Identity of one HID interface as reported by the backend.
///
/// `path` is backend-specific and opaque; it is only handed back to the same
/// backend to open the device again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    /// Product release number (bcdDevice on USB).
    pub version: u16,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial: Option<String>,
    /// Short transport name such as `"USB"` or `"Bluetooth"`.
    pub transport: String,
    /// Primary usage page of the interface's top-level collection.
    pub usage_page: u16,
    /// Primary usage of the interface's top-level collection.
    pub usage: u16,
    /// Some stacks use `-1` to mean "not applicable".
    pub interface_number: i32,
}

impl DeviceDescriptor {
    /// Location identifier derived from the path (FNV-1a, 32 bit).
    ///
    /// Stable for as long as the device stays in the same port.
    pub fn location_id(&self) -> u32 {
        self.path.bytes().fold(0x811c_9dc5u32, |h, b| {
            (h ^ b as u32).wrapping_mul(0x0100_0193)
        })
    }
}

/// Access to the driver framework.
pub trait Backend {
    /// Short name for logs (e.g. `"hidapi"`).
    fn name(&self) -> &str;

    /// List the HID interfaces currently attached.
    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>>;

    /// Raw report descriptor bytes of a device.
    fn report_descriptor(&mut self, device: &DeviceDescriptor) -> Result<Vec<u8>>;

    /// Open a device for report I/O.
    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn DeviceInterface>>;
}

/// An opened device.
///
/// Reports are exchanged as `[report_id][payload...]` when the device uses
/// report ids, and as bare `[payload...]` otherwise.
pub trait DeviceInterface: Send {
    /// Non-blocking read of one input report into `buf`. Returns `0` when none is pending.
    fn read_input_report(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Fetch a feature report. `buf[0]` holds the report id on entry (`0` for
    /// unnumbered reports); on return the buffer is `[report_id][payload...]`
    /// and the count includes the id byte.
    fn get_feature_report(&mut self, buf: &mut [u8]) -> Result<usize>;
}
