//! `hidapi` backend.
//!
//! [`HidApiBackend`] enumerates devices with `hidapi`, reads report
//! descriptors through `HidDevice::get_report_descriptor`, and opens devices
//! in non-blocking mode for polling.

use std::ffi::CString;

use hidapi::{BusType, DeviceInfo, HidApi, HidDevice};
use tracing::debug;

use super::{Backend, DeviceDescriptor, DeviceInterface};
use crate::error::{Error, Result};

/// Report descriptor buffer size used by hidapi itself.
const MAX_REPORT_DESCRIPTOR_SIZE: usize = 4096;

/// Backend over the platform HID stack via `hidapi`.
pub struct HidApiBackend {
    api: HidApi,
}

impl HidApiBackend {
    pub fn new() -> Result<Self> {
        Ok(Self::with_api(HidApi::new()?))
    }

    /// Wrap an existing `HidApi` context.
    pub fn with_api(api: HidApi) -> Self {
        Self { api }
    }

    fn open_raw(&self, device: &DeviceDescriptor) -> Result<HidDevice> {
        let path = CString::new(device.path.as_str())
            .map_err(|_| Error::Backend(format!("path contains NUL: {}", device.path)))?;
        Ok(self.api.open_path(&path)?)
    }
}

fn transport_name(bus: BusType) -> &'static str {
    match bus {
        BusType::Usb => "USB",
        BusType::Bluetooth => "Bluetooth",
        BusType::I2c => "I2C",
        BusType::Spi => "SPI",
        _ => "Unknown",
    }
}

fn describe(info: &DeviceInfo) -> DeviceDescriptor {
    DeviceDescriptor {
        path: info.path().to_string_lossy().to_string(),
        vendor_id: info.vendor_id(),
        product_id: info.product_id(),
        version: info.release_number(),
        manufacturer: info.manufacturer_string().map(|s| s.to_string()),
        product: info.product_string().map(|s| s.to_string()),
        serial: info
            .serial_number()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        transport: transport_name(info.bus_type()).to_string(),
        usage_page: info.usage_page(),
        usage: info.usage(),
        interface_number: info.interface_number(),
    }
}

impl Backend for HidApiBackend {
    fn name(&self) -> &str {
        "hidapi"
    }

    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>> {
        self.api.refresh_devices()?;
        let found: Vec<DeviceDescriptor> = self.api.device_list().map(describe).collect();
        debug!(count = found.len(), "hidapi enumeration");
        Ok(found)
    }

    fn report_descriptor(&mut self, device: &DeviceDescriptor) -> Result<Vec<u8>> {
        let raw = self.open_raw(device)?;
        let mut buf = vec![0u8; MAX_REPORT_DESCRIPTOR_SIZE];
        let n = raw.get_report_descriptor(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn DeviceInterface>> {
        let raw = self.open_raw(device)?;
        // Polling is host-driven; reads must not block.
        raw.set_blocking_mode(false)?;
        Ok(Box::new(HidApiInterface { raw }))
    }
}

struct HidApiInterface {
    raw: HidDevice,
}

impl DeviceInterface for HidApiInterface {
    fn read_input_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.raw.read(buf)?)
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.raw.get_feature_report(buf)?)
    }
}
