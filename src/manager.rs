//! Device list ownership.
//!
//! [`DeviceManager`] owns the backend and the device list built from it. The
//! list is built by [`DeviceManager::build_device_list`], which replaces any
//! previous list, and torn down by [`DeviceManager::release_device_list`] or
//! on drop. Every open interface and queue belongs to a device in the list,
//! so releasing the list releases them all.
//!
//! Callers only ever borrow devices and elements. [`DeviceId`]s carry the
//! generation of the list they came from and stop resolving after a rebuild.

use tracing::{debug, info, warn};

use crate::backends::{Backend, DeviceDescriptor};
use crate::config::{SavedElement, Settings};
use crate::device::{Device, DeviceId};
use crate::element::{ElementId, ElementTypeMask};
use crate::error::Result;
use crate::event::ElementEvent;

pub struct DeviceManager {
    backend: Box<dyn Backend>,
    settings: Settings,
    devices: Option<Vec<Device>>,
    generation: u32,
}

impl DeviceManager {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self::with_settings(backend, Settings::default())
    }

    pub fn with_settings(backend: impl Backend + 'static, settings: Settings) -> Self {
        Self {
            backend: Box::new(backend),
            settings,
            devices: None,
            generation: 0,
        }
    }

    /// Manager over the platform HID stack.
    #[cfg(feature = "hid")]
    pub fn discover() -> Result<Self> {
        Ok(Self::new(crate::backends::hid::HidApiBackend::new()?))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings changes apply to the next build.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Enumerate devices and build their element trees, replacing any previous list.
    ///
    /// Only devices whose primary usage page and usage match are kept; `0`
    /// matches anything. Devices whose report descriptor cannot be read or
    /// interpreted are skipped. Each kept device is opened; a device that
    /// refuses to open stays in the list without an interface.
    ///
    /// Returns `true` if at least one device was added. Fails only when the
    /// backend cannot enumerate at all, in which case no list exists.
    pub fn build_device_list(&mut self, usage_page: u16, usage: u16) -> Result<bool> {
        self.release_device_list();

        let found = self.backend.enumerate()?;
        self.generation = self.generation.wrapping_add(1);
        let user_range = (self.settings.user_min, self.settings.user_max);

        let mut devices = Vec::new();
        for info in found {
            if !matches_filter(&info, usage_page, usage) {
                continue;
            }
            let report_descriptor = match self.backend.report_descriptor(&info) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %info.path, error = %e, "skipping device: report descriptor unavailable");
                    continue;
                }
            };
            let id = DeviceId {
                generation: self.generation,
                index: devices.len(),
            };
            let path = info.path.clone();
            let mut device = match Device::build(id, info, &report_descriptor, user_range) {
                Ok(device) => device,
                Err(e) => {
                    warn!(path = %path, error = %e, "skipping device: report descriptor rejected");
                    continue;
                }
            };
            if let Err(e) = device.open(&mut *self.backend) {
                warn!(path = %path, error = %e, "device listed without an open interface");
            }
            devices.push(device);
        }

        info!(
            backend = self.backend.name(),
            devices = devices.len(),
            usage_page,
            usage,
            "built device list"
        );
        let added = !devices.is_empty();
        self.devices = Some(devices);
        Ok(added)
    }

    /// [`build_device_list`](Self::build_device_list) with the filter from [`Settings`].
    pub fn build_device_list_from_settings(&mut self) -> Result<bool> {
        let (page, usage) = (self.settings.usage_page, self.settings.usage);
        self.build_device_list(page, usage)
    }

    /// Close every device and drop the list. Does nothing without a list.
    pub fn release_device_list(&mut self) {
        if let Some(mut devices) = self.devices.take() {
            for device in &mut devices {
                device.close();
            }
            debug!(devices = devices.len(), "released device list");
        }
    }

    pub fn have_device_list(&self) -> bool {
        self.devices.is_some()
    }

    /// Number of devices in the list; 0 without a list.
    pub fn count_devices(&self) -> u32 {
        self.devices.as_ref().map_or(0, |d| d.len() as u32)
    }

    pub fn first_device(&self) -> Option<&Device> {
        self.devices.as_ref()?.first()
    }

    /// Device following `device` in list order.
    pub fn next_device(&self, device: &Device) -> Option<&Device> {
        let id = device.id();
        if id.generation != self.generation {
            return None;
        }
        self.devices.as_ref()?.get(id.index + 1)
    }

    /// Devices in list order; empty without a list.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().flatten()
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        if id.generation != self.generation {
            return None;
        }
        self.devices.as_ref()?.get(id.index)
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        if id.generation != self.generation {
            return None;
        }
        self.devices.as_mut()?.get_mut(id.index)
    }

    /// Open a device's interface (again). `Ok(false)` for an unknown id.
    pub fn open_device(&mut self, id: DeviceId) -> Result<bool> {
        if id.generation != self.generation {
            return Ok(false);
        }
        let Some(device) = self.devices.as_mut().and_then(|d| d.get_mut(id.index)) else {
            return Ok(false);
        };
        device.open(&mut *self.backend)?;
        Ok(true)
    }

    /// Close a device's interface and queue. `false` for an unknown id.
    pub fn close_device(&mut self, id: DeviceId) -> bool {
        match self.device_mut(id) {
            Some(device) => {
                device.close();
                true
            }
            None => false,
        }
    }

    /// Poll every open device that has a queue.
    ///
    /// A device whose read fails is logged and skipped for this call.
    pub fn poll_all(&mut self) -> Vec<(DeviceId, ElementEvent)> {
        let mut events = Vec::new();
        for device in self.devices.iter_mut().flatten() {
            if !device.is_open() || device.queued_len() == 0 {
                continue;
            }
            match device.poll_events() {
                Ok(batch) => events.extend(batch.into_iter().map(|e| (device.id(), e))),
                Err(e) => warn!(device = device.name(), error = %e, "poll failed"),
            }
        }
        events
    }

    /// Capture the calibration state of one element.
    pub fn save_element(&self, device: DeviceId, element: ElementId) -> Option<SavedElement> {
        let device = self.device(device)?;
        let element = device.element(element)?;
        Some(SavedElement::capture(device, element))
    }

    /// Apply a saved element state to the matching element of the current list.
    ///
    /// The device is matched by vendor, product and location, then by vendor
    /// and product alone. The element is matched by cookie (with the same
    /// usage), then by usage page and usage. Returns where it was applied.
    pub fn restore_element(&mut self, saved: &SavedElement) -> Option<(DeviceId, ElementId)> {
        let devices = self.devices.as_mut()?;
        let same_product =
            |d: &Device| d.vendor_id() == saved.vendor_id && d.product_id() == saved.product_id;
        let index = devices
            .iter()
            .position(|d| same_product(d) && d.location_id() == saved.location_id)
            .or_else(|| devices.iter().position(same_product))?;
        let device = &mut devices[index];

        let same_usage = |usage_page: u16, usage: u16| {
            usage_page == saved.usage_page && usage == saved.usage
        };
        let element = device
            .element_by_cookie(saved.cookie)
            .filter(|e| same_usage(e.usage_page, e.usage))
            .or_else(|| {
                device
                    .elements(ElementTypeMask::ALL)
                    .find(|e| same_usage(e.usage_page, e.usage))
            })?
            .id();

        device.restore_calibration(
            element,
            saved.observed(),
            (saved.user_min, saved.user_max),
        );
        debug!(device = device.name(), cookie = saved.cookie, "restored element state");
        Some((device.id(), element))
    }
}

impl Drop for DeviceManager {
    fn drop(&mut self) {
        self.release_device_list();
    }
}

fn matches_filter(info: &DeviceDescriptor, usage_page: u16, usage: u16) -> bool {
    (usage_page == 0 || info.usage_page == usage_page) && (usage == 0 || info.usage == usage)
}
