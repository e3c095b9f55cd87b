//! In-memory backend.
//!
//! [`VirtualBackend`] serves devices described by a [`DeviceDescriptor`] and a
//! raw report descriptor. Each added device returns a [`VirtualHandle`] used to
//! inject input reports, stage feature reports, and observe whether the
//! device is currently open.
//!
//! The backend is cheaply cloneable; clones share the same device set, so a
//! caller can keep one to plug and unplug devices after handing another to a
//! [`DeviceManager`](crate::manager::DeviceManager).

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{Backend, DeviceDescriptor, DeviceInterface};
use crate::error::{Error, Result};

#[derive(Default)]
struct Shared {
    input: VecDeque<Vec<u8>>,
    features: HashMap<u8, Vec<u8>>,
    open_interfaces: usize,
    refuse_open: bool,
}

struct VirtualDevice {
    info: DeviceDescriptor,
    report_descriptor: Vec<u8>,
    shared: Arc<Mutex<Shared>>,
}

/// Backend over scripted in-memory devices.
#[derive(Clone, Default)]
pub struct VirtualBackend {
    devices: Arc<Mutex<Vec<VirtualDevice>>>,
}

impl VirtualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plug in a device. Enumeration order follows insertion order.
    pub fn add_device(
        &self,
        info: DeviceDescriptor,
        report_descriptor: impl Into<Vec<u8>>,
    ) -> VirtualHandle {
        let shared = Arc::new(Mutex::new(Shared::default()));
        self.devices.lock().push(VirtualDevice {
            info,
            report_descriptor: report_descriptor.into(),
            shared: Arc::clone(&shared),
        });
        VirtualHandle { shared }
    }

    /// Unplug the device at `path`. Returns `false` if no such device exists.
    pub fn remove_device(&self, path: &str) -> bool {
        let mut devices = self.devices.lock();
        let before = devices.len();
        devices.retain(|d| d.info.path != path);
        devices.len() != before
    }

    fn shared_for(&self, device: &DeviceDescriptor) -> Result<Arc<Mutex<Shared>>> {
        self.devices
            .lock()
            .iter()
            .find(|d| d.info.path == device.path)
            .map(|d| Arc::clone(&d.shared))
            .ok_or_else(|| Error::Backend(format!("no virtual device at {}", device.path)))
    }
}

impl Backend for VirtualBackend {
    fn name(&self) -> &str {
        "virtual"
    }

    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>> {
        Ok(self.devices.lock().iter().map(|d| d.info.clone()).collect())
    }

    fn report_descriptor(&mut self, device: &DeviceDescriptor) -> Result<Vec<u8>> {
        self.devices
            .lock()
            .iter()
            .find(|d| d.info.path == device.path)
            .map(|d| d.report_descriptor.clone())
            .ok_or_else(|| Error::Backend(format!("no virtual device at {}", device.path)))
    }

    fn open(&mut self, device: &DeviceDescriptor) -> Result<Box<dyn DeviceInterface>> {
        let shared = self.shared_for(device)?;
        {
            let mut s = shared.lock();
            if s.refuse_open {
                return Err(Error::Backend(format!("access denied: {}", device.path)));
            }
            s.open_interfaces += 1;
        }
        Ok(Box::new(VirtualInterface { shared }))
    }
}

/// Control handle of a virtual device.
#[derive(Clone)]
pub struct VirtualHandle {
    shared: Arc<Mutex<Shared>>,
}

impl VirtualHandle {
    /// Queue one raw input report (`[report_id][payload]` when the device uses ids).
    pub fn feed(&self, report: impl Into<Vec<u8>>) {
        self.shared.lock().input.push_back(report.into());
    }

    /// Stage the payload returned for feature report `report_id`.
    pub fn set_feature(&self, report_id: u8, payload: impl Into<Vec<u8>>) {
        self.shared.lock().features.insert(report_id, payload.into());
    }

    /// Input reports not yet read.
    pub fn pending(&self) -> usize {
        self.shared.lock().input.len()
    }

    /// Is at least one interface to this device open?
    pub fn is_open(&self) -> bool {
        self.shared.lock().open_interfaces > 0
    }

    /// Make subsequent opens fail, as a device without access permission would.
    pub fn refuse_open(&self, refuse: bool) {
        self.shared.lock().refuse_open = refuse;
    }
}

struct VirtualInterface {
    shared: Arc<Mutex<Shared>>,
}

impl DeviceInterface for VirtualInterface {
    fn read_input_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(report) = self.shared.lock().input.pop_front() else {
            return Ok(0);
        };
        let n = report.len().min(buf.len());
        buf[..n].copy_from_slice(&report[..n]);
        Ok(n)
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(&report_id) = buf.first() else {
            return Ok(0);
        };
        let s = self.shared.lock();
        let payload = s
            .features
            .get(&report_id)
            .ok_or_else(|| Error::Backend(format!("no feature report {report_id}")))?;
        let n = (payload.len() + 1).min(buf.len());
        buf[1..n].copy_from_slice(&payload[..n - 1]);
        Ok(n)
    }
}

impl Drop for VirtualInterface {
    fn drop(&mut self) {
        let mut s = self.shared.lock();
        s.open_interfaces = s.open_interfaces.saturating_sub(1);
    }
}
