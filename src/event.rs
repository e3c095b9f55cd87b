//! Element value-change events.
//!
//! Produced by [`Device::poll_events`](crate::device::Device::poll_events) for
//! elements registered in the device's queue. Each event carries the raw
//! (uncalibrated) value; apply
//! [`Element::calibrate`](crate::element::Element::calibrate) and
//! [`Element::scale`](crate::element::Element::scale) as needed.

use crate::element::ElementId;

/// Timestamped change of one queued element.
#[derive(Clone, Debug)]
pub struct ElementEvent {
    /// Capture time (monotonic). Suitable for ordering / delta timing within a run.
    pub at: std::time::Instant,
    pub element: ElementId,
    pub cookie: u32,
    /// Raw value as decoded from the report.
    pub value: i32,
}
