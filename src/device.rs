//! Device records and element-tree traversal.
//!
//! A [`Device`] is built from a backend [`DeviceDescriptor`] and the device's
//! report descriptor. It owns its elements (an arena indexed by
//! [`ElementId`]), the opened driver interface if any, and the element queue.
//!
//! Traversal follows the threaded tree:
//! - [`Device::next_element`] walks depth first: child, then sibling, then
//!   back up through `previous` links to the nearest enclosing collection
//!   that has a sibling.
//! - [`Device::previous_element`] walks strictly upward through `previous`
//!   links and never searches a level.
//!
//! Both skip elements whose type is outside the given mask.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backends::{Backend, DeviceDescriptor, DeviceInterface};
use crate::descriptor;
use crate::element::{Element, ElementId, ElementType, ElementTypeMask, ReportKind};
use crate::error::{Error, Result};
use crate::event::ElementEvent;
use crate::metadata::DeviceMeta;
use crate::queue::ElementQueue;
use crate::report;
use crate::usage::{self, generic_desktop as gd, page};

/// Reports drained per [`Device::poll_events`] call.
const MAX_REPORTS_PER_TICK: usize = 32;

/// Read buffer size when the descriptor declares no input report.
const FALLBACK_REPORT_LEN: usize = 64;

/// Identity of a device within one built list.
///
/// Ids from a previous build never resolve against a rebuilt list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DeviceId {
    pub(crate) generation: u32,
    pub(crate) index: usize,
}

impl DeviceId {
    /// Position of the device in list order.
    pub fn index(self) -> usize {
        self.index
    }
}

/// Per-category element counts of a device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementCounts {
    pub total: u32,
    pub inputs: u32,
    pub outputs: u32,
    pub features: u32,
    pub collections: u32,
    pub axes: u32,
    pub buttons: u32,
    pub hats: u32,
    pub sliders: u32,
    pub dials: u32,
    pub wheels: u32,
}

impl ElementCounts {
    fn tally(elements: &[Element]) -> Self {
        let mut c = Self::default();
        for e in elements {
            c.total += 1;
            match e.element_type {
                ElementType::Output => c.outputs += 1,
                ElementType::Feature => c.features += 1,
                ElementType::Collection => c.collections += 1,
                _ => {
                    c.inputs += 1;
                    match (e.usage_page, e.usage) {
                        (page::GENERIC_DESKTOP, gd::X..=gd::RZ) => c.axes += 1,
                        (page::GENERIC_DESKTOP, gd::SLIDER) => c.sliders += 1,
                        (page::GENERIC_DESKTOP, gd::DIAL) => c.dials += 1,
                        (page::GENERIC_DESKTOP, gd::WHEEL) => c.wheels += 1,
                        (page::GENERIC_DESKTOP, gd::HAT_SWITCH) => c.hats += 1,
                        (page::BUTTON, _) => c.buttons += 1,
                        _ => {}
                    }
                }
            }
        }
        c
    }

    /// Sum of the categories selected by `mask`.
    pub fn masked(&self, mask: ElementTypeMask) -> u32 {
        let mut n = 0;
        if mask.contains(ElementTypeMask::INPUT) {
            n += self.inputs;
        }
        if mask.contains(ElementTypeMask::OUTPUT) {
            n += self.outputs;
        }
        if mask.contains(ElementTypeMask::FEATURE) {
            n += self.features;
        }
        if mask.contains(ElementTypeMask::COLLECTION) {
            n += self.collections;
        }
        n
    }
}

/// One enumerated device and its element tree.
pub struct Device {
    id: DeviceId,
    info: DeviceDescriptor,
    location_id: u32,
    counts: ElementCounts,

    elements: Vec<Element>,
    uses_report_ids: bool,
    input_report_len: usize,
    feature_report_len: usize,

    interface: Option<Box<dyn DeviceInterface>>,
    queue: Option<ElementQueue>,
    /// Most recent input payload per report id.
    last_reports: HashMap<u8, Vec<u8>>,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("path", &self.info.path)
            .field("vendor_id", &self.info.vendor_id)
            .field("product_id", &self.info.product_id)
            .field("elements", &self.elements.len())
            .field("open", &self.interface.is_some())
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Build a device from its enumeration record and raw report descriptor.
    pub(crate) fn build(
        id: DeviceId,
        info: DeviceDescriptor,
        report_descriptor: &[u8],
        user_range: (i32, i32),
    ) -> Result<Self> {
        let mut parsed = descriptor::parse(report_descriptor, id)?;
        for e in &mut parsed.elements {
            e.calibration.user_min = user_range.0;
            e.calibration.user_max = user_range.1;
        }
        let counts = ElementCounts::tally(&parsed.elements);
        debug!(
            path = %info.path,
            elements = counts.total,
            "built element tree"
        );
        Ok(Self {
            id,
            location_id: info.location_id(),
            info,
            counts,
            elements: parsed.elements,
            uses_report_ids: parsed.uses_report_ids,
            input_report_len: parsed.input_report_len,
            feature_report_len: parsed.feature_report_len,
            interface: None,
            queue: None,
            last_reports: HashMap::new(),
        })
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Enumeration record the device was built from.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.info
    }

    pub fn transport(&self) -> &str {
        &self.info.transport
    }

    pub fn vendor_id(&self) -> u16 {
        self.info.vendor_id
    }

    pub fn product_id(&self) -> u16 {
        self.info.product_id
    }

    /// Device release number.
    pub fn version(&self) -> u16 {
        self.info.version
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.info.manufacturer.as_deref()
    }

    pub fn product(&self) -> Option<&str> {
        self.info.product.as_deref()
    }

    pub fn serial(&self) -> Option<&str> {
        self.info.serial.as_deref()
    }

    pub fn location_id(&self) -> u32 {
        self.location_id
    }

    /// Primary usage page.
    pub fn usage_page(&self) -> u16 {
        self.info.usage_page
    }

    /// Primary usage.
    pub fn usage(&self) -> u16 {
        self.info.usage
    }

    pub fn counts(&self) -> &ElementCounts {
        &self.counts
    }

    /// Product name, or a placeholder when the device reports none.
    pub fn name(&self) -> &str {
        self.info.product.as_deref().unwrap_or("Unknown HID Device")
    }

    pub fn metadata(&self) -> DeviceMeta {
        DeviceMeta {
            bus: self.info.transport.clone(),
            vid: self.info.vendor_id,
            pid: self.info.product_id,
            version: self.info.version,
            manufacturer: self.info.manufacturer.clone(),
            product_string: self.info.product.clone(),
            serial_number: self.info.serial.clone(),
            interface_number: self.info.interface_number,
            usage_page: self.info.usage_page,
            usage: self.info.usage,
            usage_name: usage::usage_name(self.info.usage_page, self.info.usage),
            location_id: self.location_id,
            path: self.info.path.clone(),
            counts: self.counts,
        }
    }

    // ---- element tree ----

    /// Number of elements whose category is in `mask`.
    pub fn count_elements(&self, mask: ElementTypeMask) -> u32 {
        self.counts.masked(mask)
    }

    /// Root of the element tree.
    pub fn head(&self) -> Option<&Element> {
        self.elements.first()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn element_by_cookie(&self, cookie: u32) -> Option<&Element> {
        let index = usize::try_from(cookie).ok()?.checked_sub(1)?;
        self.elements.get(index).filter(|e| e.cookie == cookie)
    }

    /// First element in depth-first order whose type is in `mask`.
    pub fn first_element(&self, mask: ElementTypeMask) -> Option<&Element> {
        let head = self.head()?;
        if mask.matches(head.element_type) {
            Some(head)
        } else {
            self.next_from(head.id, mask)
        }
    }

    /// Element following `element` in depth-first order whose type is in `mask`.
    ///
    /// Returns `None` at the end of the tree, or when `element` does not belong
    /// to this device.
    pub fn next_element(&self, element: &Element, mask: ElementTypeMask) -> Option<&Element> {
        if !self.owns(element) {
            return None;
        }
        self.next_from(element.id, mask)
    }

    /// Nearest element above `element` (through `previous` links) whose type is in `mask`.
    pub fn previous_element(&self, element: &Element, mask: ElementTypeMask) -> Option<&Element> {
        if !self.owns(element) {
            return None;
        }
        let mut current = element.previous;
        while let Some(id) = current {
            let e = &self.elements[id.0];
            if mask.matches(e.element_type) {
                return Some(e);
            }
            current = e.previous;
        }
        None
    }

    /// Depth-first iterator over elements whose type is in `mask`.
    pub fn elements(&self, mask: ElementTypeMask) -> Elements<'_> {
        Elements {
            device: self,
            next: self.first_element(mask).map(Element::id),
            mask,
        }
    }

    fn owns(&self, element: &Element) -> bool {
        element.device == self.id && element.id.0 < self.elements.len()
    }

    fn next_from(&self, mut current: ElementId, mask: ElementTypeMask) -> Option<&Element> {
        loop {
            current = self.step(current)?;
            let e = &self.elements[current.0];
            if mask.matches(e.element_type) {
                return Some(e);
            }
        }
    }

    /// One unmasked depth-first step.
    fn step(&self, from: ElementId) -> Option<ElementId> {
        let e = &self.elements[from.0];
        if let Some(child) = e.child {
            return Some(child);
        }
        if let Some(sibling) = e.sibling {
            return Some(sibling);
        }
        // Climb until a collection we entered through its child has a sibling.
        let mut came_from = from;
        let mut current = e.previous;
        while let Some(id) = current {
            let up = &self.elements[id.0];
            if up.is_collection() && up.sibling != Some(came_from) {
                if let Some(sibling) = up.sibling {
                    return Some(sibling);
                }
            }
            came_from = id;
            current = up.previous;
        }
        None
    }

    // ---- calibration ----

    /// Set the user scale range of an element. Returns `false` for an unknown id.
    pub fn set_user_range(&mut self, id: ElementId, user_min: i32, user_max: i32) -> bool {
        let Some(e) = self.elements.get_mut(id.0) else {
            return false;
        };
        e.calibration.user_min = user_min;
        e.calibration.user_max = user_max;
        true
    }

    /// Forget the observed range of an element. Returns `false` for an unknown id.
    pub fn reset_calibration(&mut self, id: ElementId) -> bool {
        let Some(e) = self.elements.get_mut(id.0) else {
            return false;
        };
        e.calibration.observed = None;
        true
    }

    pub(crate) fn restore_calibration(
        &mut self,
        id: ElementId,
        observed: Option<(i32, i32)>,
        user_range: (i32, i32),
    ) {
        if let Some(e) = self.elements.get_mut(id.0) {
            e.calibration.observed = observed;
            e.calibration.user_min = user_range.0;
            e.calibration.user_max = user_range.1;
        }
    }

    // ---- I/O ----

    pub fn is_open(&self) -> bool {
        self.interface.is_some()
    }

    /// Open the driver interface. A no-op when already open.
    pub(crate) fn open(&mut self, backend: &mut dyn Backend) -> Result<()> {
        if self.interface.is_some() {
            return Ok(());
        }
        self.interface = Some(backend.open(&self.info)?);
        debug!(path = %self.info.path, "opened device");
        Ok(())
    }

    /// Release the driver interface and the queue.
    pub fn close(&mut self) {
        if self.interface.take().is_some() {
            debug!(path = %self.info.path, "closed device");
        }
        self.queue = None;
        self.last_reports.clear();
    }

    /// Current raw value of an element.
    ///
    /// Input elements use the most recent input report for their report id,
    /// after draining everything the device has pending; `Ok(None)` until one
    /// has arrived. Feature elements fetch their feature report. The value is
    /// recorded into the element's observed range.
    pub fn read_element_value(&mut self, id: ElementId) -> Result<Option<i32>> {
        let Some(element) = self.elements.get(id.0) else {
            return Ok(None);
        };
        let cookie = element.cookie;
        let not_readable = |kind| Error::NotReadable { cookie, kind };
        let Some(loc) = element.report else {
            return Err(not_readable("collection"));
        };
        let payload = match loc.kind {
            ReportKind::Output => return Err(not_readable("output")),
            ReportKind::Input => {
                self.drain_input(None)?;
                match self.last_reports.get(&loc.report_id) {
                    Some(p) => p.clone(),
                    None => return Ok(None),
                }
            }
            ReportKind::Feature => self.fetch_feature(loc.report_id)?,
        };

        let value = report::decode(&self.elements[id.0], &loc, &payload);
        if let Some(v) = value {
            self.elements[id.0].calibration.observe(v);
        }
        Ok(value)
    }

    /// Add an input element to the queue, creating the queue on first use.
    ///
    /// Returns `false` for unknown ids, non-input elements, and elements
    /// already queued.
    pub fn queue_element(&mut self, id: ElementId) -> bool {
        let Some(element) = self.elements.get(id.0) else {
            return false;
        };
        if !element.element_type.is_input() {
            return false;
        }
        self.queue.get_or_insert_with(ElementQueue::default).insert(element)
    }

    /// Remove an element from the queue. Returns `false` if it was not queued.
    pub fn dequeue_element(&mut self, id: ElementId) -> bool {
        match (self.elements.get(id.0), self.queue.as_mut()) {
            (Some(element), Some(queue)) => queue.remove(element),
            _ => false,
        }
    }

    pub fn is_queued(&self, id: ElementId) -> bool {
        match (self.elements.get(id.0), self.queue.as_ref()) {
            (Some(element), Some(queue)) => queue.contains(element),
            _ => false,
        }
    }

    /// Number of queued elements.
    pub fn queued_len(&self) -> usize {
        self.queue.as_ref().map_or(0, ElementQueue::len)
    }

    /// Drop the queue and every registration in it.
    pub fn clear_queue(&mut self) {
        self.queue = None;
    }

    /// Drain pending input reports and return value changes of queued elements.
    ///
    /// At most 32 reports are consumed per call; the rest stay pending for
    /// the next call. Empty without a queue. Fails with [`Error::NotOpen`] when the device
    /// has a queue but no open interface.
    pub fn poll_events(&mut self) -> Result<Vec<ElementEvent>> {
        if self.queue.is_none() {
            return Ok(Vec::new());
        }
        self.drain_input(Some(MAX_REPORTS_PER_TICK))?;
        Ok(self
            .queue
            .as_mut()
            .map(ElementQueue::take_events)
            .unwrap_or_default())
    }

    fn interface(&mut self) -> Result<&mut Box<dyn DeviceInterface>> {
        self.interface
            .as_mut()
            .ok_or_else(|| Error::NotOpen(self.info.path.clone()))
    }

    /// Read pending input reports, up to `limit` when given, caching each by
    /// id and feeding the queue.
    fn drain_input(&mut self, limit: Option<usize>) -> Result<()> {
        let len = match self.input_report_len {
            0 => FALLBACK_REPORT_LEN,
            n => n,
        };
        let mut buf = vec![0u8; len];
        let uses_report_ids = self.uses_report_ids;

        let mut drained = 0;
        while limit.map_or(true, |max| drained < max) {
            let n = match self.interface()?.read_input_report(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    warn!(path = %self.info.path, error = %e, "input report read failed");
                    return Err(e);
                }
            };
            let (report_id, payload) = report::split_report(&buf[..n], uses_report_ids);
            if let Some(queue) = self.queue.as_mut() {
                queue.process(&mut self.elements, report_id, payload);
            }
            self.last_reports.insert(report_id, payload.to_vec());
            drained += 1;
        }
        Ok(())
    }

    fn fetch_feature(&mut self, report_id: u8) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.feature_report_len.max(2)];
        buf[0] = report_id;
        let n = self.interface()?.get_feature_report(&mut buf)?;
        Ok(buf.get(1..n).map(<[u8]>::to_vec).unwrap_or_default())
    }
}

/// Iterator returned by [`Device::elements`].
pub struct Elements<'a> {
    device: &'a Device,
    next: Option<ElementId>,
    mask: ElementTypeMask,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.device.next_from(current, self.mask).map(Element::id);
        self.device.element(current)
    }
}
