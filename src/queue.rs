//! Per-device element queue.
//!
//! Tracks which elements report value changes and the last value seen for
//! each, so a stream of input reports can be reduced to change events.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::element::{Element, ReportKind};
use crate::event::ElementEvent;
use crate::report;

#[derive(Debug, Default)]
pub(crate) struct ElementQueue {
    /// Queued elements and the last value emitted for each.
    entries: BTreeMap<crate::element::ElementId, Option<i32>>,
    pending: Vec<ElementEvent>,
}

impl ElementQueue {
    pub fn insert(&mut self, element: &Element) -> bool {
        if self.entries.contains_key(&element.id) {
            return false;
        }
        self.entries.insert(element.id, None);
        true
    }

    pub fn remove(&mut self, element: &Element) -> bool {
        self.entries.remove(&element.id).is_some()
    }

    pub fn contains(&self, element: &Element) -> bool {
        self.entries.contains_key(&element.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Decode one input report for every queued element it carries.
    ///
    /// Changed values become pending events and widen the element's
    /// observed range.
    pub fn process(&mut self, elements: &mut [Element], report_id: u8, payload: &[u8]) {
        let at = Instant::now();
        for (id, last) in self.entries.iter_mut() {
            let Some(element) = elements.get_mut(id.0) else {
                continue;
            };
            let Some(loc) = element.report else {
                continue;
            };
            if loc.kind != ReportKind::Input || loc.report_id != report_id {
                continue;
            }
            let Some(value) = report::decode(element, &loc, payload) else {
                continue;
            };
            element.calibration.observe(value);
            if *last != Some(value) {
                *last = Some(value);
                self.pending.push(ElementEvent {
                    at,
                    element: *id,
                    cookie: element.cookie,
                    value,
                });
            }
        }
    }

    pub fn take_events(&mut self) -> Vec<ElementEvent> {
        std::mem::take(&mut self.pending)
    }
}
