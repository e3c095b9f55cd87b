//! Report descriptor interpretation.
//!
//! Turns a raw HID report descriptor (HID 1.11, section 6.2.2) into the
//! element arena of a device, linked as a threaded tree. Handles:
//! - Collections / End Collection (nesting becomes `child`/`sibling` links)
//! - Input, Output and Feature items (variable and array fields)
//! - Global Push/Pop, Report ID, logical/physical ranges, units
//! - Usage, Usage Minimum/Maximum (including 32-bit extended usages)
//!
//! Constant (padding) fields produce no element but still advance the bit
//! offset of their report. Long items are skipped.
//!
//! ## Element granularity
//! - Variable fields yield one element per report count. When there are more
//!   counts than usages, the last usage is repeated.
//! - Array fields yield one on/off element per listed usage; the element reads
//!   `1` when any slot of the array holds its usage. Usage 0 gets no element,
//!   and slots outside the logical range are empty.
//!
//! ## Limits
//! Data fields hold at most 32 bits, padding at most 256. A main item may
//! declare at most 12288 counts and a report may span at most 16384 bytes.
//! Descriptors past these bounds are rejected.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::device::DeviceId;
use crate::element::{
    ArraySlots, Calibration, Element, ElementId, ElementType, ReportKind, ReportLocation,
};
use crate::usage::{self, page};

const LONG_ITEM_PREFIX: u8 = 0xFE;

/// Upper bound on a single Usage Minimum..Maximum expansion.
const MAX_USAGE_RANGE: u32 = 4096;

/// Widest data field a value read can hold.
const MAX_FIELD_BITS: u32 = 32;
/// Widest constant (padding) field.
const MAX_PADDING_BITS: u32 = 256;
/// Upper bound on Report Count for one main item.
const MAX_REPORT_COUNT: u32 = 12288;
/// Upper bound on the length of one report, excluding the id prefix.
const MAX_REPORT_BYTES: usize = 16384;

// Main item data bits.
const CONSTANT: u32 = 1 << 0;
const VARIABLE: u32 = 1 << 1;
const RELATIVE: u32 = 1 << 2;
const WRAP: u32 = 1 << 3;
const NON_LINEAR: u32 = 1 << 4;
const NO_PREFERRED: u32 = 1 << 5;
const NULL_STATE: u32 = 1 << 6;

/// Malformed descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("truncated item at offset {offset}")]
    Truncated { offset: usize },

    #[error("End Collection without open collection at offset {offset}")]
    UnbalancedEndCollection { offset: usize },

    #[error("{open} collection(s) still open at end of descriptor")]
    UnclosedCollection { open: usize },

    #[error("Pop without matching Push at offset {offset}")]
    UnbalancedPop { offset: usize },

    #[error("field of {count} x {size} bits at offset {offset} is too large")]
    FieldTooLarge { offset: usize, size: u32, count: u32 },

    #[error("report {report_id} exceeds 16384 bytes at offset {offset}")]
    ReportTooLong { offset: usize, report_id: u8 },
}

/// Result of interpreting one descriptor.
#[derive(Debug)]
pub(crate) struct ParsedDescriptor {
    pub elements: Vec<Element>,
    /// True when any Report ID item appeared; reports are then prefixed by their id.
    pub uses_report_ids: bool,
    /// Longest input report in bytes, including the id prefix when ids are used.
    pub input_report_len: usize,
    /// Longest feature report in bytes, always including the id byte.
    pub feature_report_len: usize,
}

/// Item payload with its encoded width, kept raw so signedness can be decided late.
#[derive(Clone, Copy, Debug, Default)]
struct ItemData {
    raw: u32,
    size: usize,
}

impl ItemData {
    fn unsigned(self) -> u32 {
        self.raw
    }

    fn signed(self) -> i32 {
        match self.size {
            1 => self.raw as u8 as i8 as i32,
            2 => self.raw as u16 as i16 as i32,
            4 => self.raw as i32,
            _ => 0,
        }
    }

    /// Maximum values are read unsigned unless the paired minimum is negative.
    fn resolve_max(self, min: i32) -> i32 {
        if min < 0 {
            self.signed()
        } else {
            i32::try_from(self.unsigned()).unwrap_or(i32::MAX)
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Globals {
    usage_page: u16,
    logical_min: ItemData,
    logical_max: ItemData,
    physical_min: ItemData,
    physical_max: ItemData,
    unit_exp: ItemData,
    unit: u32,
    report_size: u32,
    report_id: u8,
    report_count: u32,
}

impl Globals {
    fn logical_range(&self) -> (i32, i32) {
        let min = self.logical_min.signed();
        (min, self.logical_max.resolve_max(min))
    }

    /// Physical range, falling back to the logical one when both bounds are zero.
    fn physical_range(&self) -> (i32, i32) {
        let min = self.physical_min.signed();
        let max = self.physical_max.resolve_max(min);
        if min == 0 && max == 0 {
            self.logical_range()
        } else {
            (min, max)
        }
    }

    /// Unit exponents are 4-bit two's complement when they fit a nibble.
    fn unit_exponent(&self) -> i32 {
        let d = self.unit_exp;
        if d.raw <= 0xF {
            ((d.raw as i32) << 28) >> 28
        } else {
            d.signed()
        }
    }
}

/// A usage as written in a local item; `page` is set only for extended (32-bit) usages.
#[derive(Clone, Copy, Debug)]
struct LocalUsage {
    page: Option<u16>,
    id: u16,
}

impl LocalUsage {
    fn from_item(d: ItemData) -> Self {
        if d.size == 4 {
            Self {
                page: Some((d.raw >> 16) as u16),
                id: d.raw as u16,
            }
        } else {
            Self {
                page: None,
                id: d.raw as u16,
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Locals {
    usages: Vec<LocalUsage>,
    usage_min: Option<LocalUsage>,
}

impl Locals {
    fn push_range(&mut self, max: LocalUsage) {
        let Some(min) = self.usage_min.take() else {
            return;
        };
        let (lo, hi) = (min.id as u32, max.id as u32);
        if hi < lo {
            return;
        }
        let mut last = hi;
        if hi - lo + 1 > MAX_USAGE_RANGE {
            warn!(lo, hi, "usage range too large, truncating");
            last = lo + MAX_USAGE_RANGE - 1;
        }
        let page = min.page.or(max.page);
        self.usages
            .extend((lo..=last).map(|id| LocalUsage { page, id: id as u16 }));
    }

    /// Resolve against the current global usage page.
    fn resolved(&self, global_page: u16) -> Vec<(u16, u16)> {
        self.usages
            .iter()
            .map(|u| (u.page.unwrap_or(global_page), u.id))
            .collect()
    }
}

struct Level {
    collection: ElementId,
    last_child: Option<ElementId>,
}

/// Links elements into the threaded tree as they are discovered.
struct TreeBuilder {
    device: DeviceId,
    elements: Vec<Element>,
    open: Vec<Level>,
    top_last: Option<ElementId>,
}

impl TreeBuilder {
    fn new(device: DeviceId) -> Self {
        Self {
            device,
            elements: Vec::new(),
            open: Vec::new(),
            top_last: None,
        }
    }

    fn attach(&mut self, mut element: Element) -> ElementId {
        let id = ElementId(self.elements.len());
        element.id = id;
        element.device = self.device;
        element.cookie = id.0 as u32 + 1;

        match self.open.last_mut() {
            Some(level) => {
                match level.last_child {
                    Some(prev) => {
                        self.elements[prev.0].sibling = Some(id);
                        element.previous = Some(prev);
                    }
                    None => {
                        self.elements[level.collection.0].child = Some(id);
                        element.previous = Some(level.collection);
                    }
                }
                level.last_child = Some(id);
            }
            None => {
                if let Some(prev) = self.top_last {
                    self.elements[prev.0].sibling = Some(id);
                    element.previous = Some(prev);
                }
                self.top_last = Some(id);
            }
        }

        self.elements.push(element);
        id
    }

    fn begin_collection(&mut self, element: Element) {
        let id = self.attach(element);
        self.open.push(Level {
            collection: id,
            last_child: None,
        });
    }

    fn end_collection(&mut self) -> bool {
        self.open.pop().is_some()
    }
}

fn blank(element_type: ElementType, usage_page: u16, usage: u16) -> Element {
    Element {
        id: ElementId(0),
        device: DeviceId::default(),
        element_type,
        usage_page,
        usage,
        cookie: 0,
        min: 0,
        max: 0,
        scaled_min: 0,
        scaled_max: 0,
        size: 0,
        relative: false,
        wrapping: false,
        non_linear: false,
        preferred_state: false,
        null_state: false,
        units: 0,
        unit_exp: 0,
        name: usage::usage_name(usage_page, usage),
        report: None,
        calibration: Calibration::default(),
        previous: None,
        child: None,
        sibling: None,
    }
}

/// Classify a field by its report kind and usage.
fn classify(kind: ReportKind, usage_page: u16, usage: u16, one_bit: bool) -> ElementType {
    match kind {
        ReportKind::Output => ElementType::Output,
        ReportKind::Feature => ElementType::Feature,
        ReportKind::Input => match usage_page {
            page::KEYBOARD => ElementType::InputScanCodes,
            page::BUTTON => ElementType::InputButton,
            _ if one_bit => ElementType::InputButton,
            page::GENERIC_DESKTOP if (0x30..=0x39).contains(&usage) => ElementType::InputAxis,
            page::SIMULATION => ElementType::InputAxis,
            _ => ElementType::InputMisc,
        },
    }
}

struct Field<'a> {
    kind: ReportKind,
    flags: u32,
    globals: &'a Globals,
    usages: Vec<(u16, u16)>,
    base_offset: usize,
}

fn emit_field(builder: &mut TreeBuilder, f: Field<'_>) {
    let g = f.globals;
    let (lmin, lmax) = g.logical_range();
    let (pmin, pmax) = g.physical_range();
    let apply_common = |e: &mut Element| {
        e.relative = f.flags & RELATIVE != 0;
        e.wrapping = f.flags & WRAP != 0;
        e.non_linear = f.flags & NON_LINEAR != 0;
        e.preferred_state = f.flags & NO_PREFERRED == 0;
        e.null_state = f.flags & NULL_STATE != 0;
        e.units = g.unit;
        e.unit_exp = g.unit_exponent();
        e.size = g.report_size;
    };

    if f.flags & VARIABLE != 0 {
        for i in 0..g.report_count as usize {
            let (up, u) = f
                .usages
                .get(i)
                .or_else(|| f.usages.last())
                .copied()
                .unwrap_or((g.usage_page, 0));
            let ty = classify(f.kind, up, u, g.report_size == 1);
            let mut e = blank(ty, up, u);
            apply_common(&mut e);
            e.min = lmin;
            e.max = lmax;
            e.scaled_min = pmin;
            e.scaled_max = pmax;
            e.report = Some(ReportLocation {
                kind: f.kind,
                report_id: g.report_id,
                bit_offset: f.base_offset + i * g.report_size as usize,
                array: None,
            });
            builder.attach(e);
        }
    } else {
        for (idx, &(up, u)) in f.usages.iter().enumerate() {
            // Usage 0 in an array slot means "no control".
            if u == 0 {
                continue;
            }
            let ty = classify(f.kind, up, u, true);
            let mut e = blank(ty, up, u);
            apply_common(&mut e);
            e.min = 0;
            e.max = 1;
            e.scaled_min = 0;
            e.scaled_max = 1;
            e.report = Some(ReportLocation {
                kind: f.kind,
                report_id: g.report_id,
                bit_offset: f.base_offset,
                array: Some(ArraySlots {
                    count: g.report_count as usize,
                    usage_index: idx as i32,
                    logical_min: lmin,
                    logical_max: lmax,
                }),
            });
            builder.attach(e);
        }
    }
}

/// Interpret `bytes` as a report descriptor for the device `device`.
pub(crate) fn parse(bytes: &[u8], device: DeviceId) -> Result<ParsedDescriptor, DescriptorError> {
    let mut builder = TreeBuilder::new(device);
    let mut globals = Globals::default();
    let mut global_stack: Vec<Globals> = Vec::new();
    let mut locals = Locals::default();
    let mut bit_offsets: HashMap<(ReportKind, u8), usize> = HashMap::new();
    let mut uses_report_ids = false;

    let mut pos = 0;
    while pos < bytes.len() {
        let offset = pos;
        let prefix = bytes[pos];

        if prefix == LONG_ITEM_PREFIX {
            let len = *bytes.get(pos + 1).ok_or(DescriptorError::Truncated { offset })? as usize;
            pos += 3 + len;
            if pos > bytes.len() {
                return Err(DescriptorError::Truncated { offset });
            }
            continue;
        }

        let size = match prefix & 0x03 {
            3 => 4,
            n => n as usize,
        };
        let payload = bytes
            .get(pos + 1..pos + 1 + size)
            .ok_or(DescriptorError::Truncated { offset })?;
        pos += 1 + size;
        let data = ItemData {
            raw: payload
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32),
            size,
        };
        let tag = prefix >> 4;

        match (prefix >> 2) & 0x03 {
            // Main
            0 => {
                match tag {
                    0x8 | 0x9 | 0xB => {
                        let kind = match tag {
                            0x8 => ReportKind::Input,
                            0x9 => ReportKind::Output,
                            _ => ReportKind::Feature,
                        };
                        let flags = data.unsigned();
                        let constant = flags & CONSTANT != 0;
                        let size_limit = if constant {
                            MAX_PADDING_BITS
                        } else {
                            MAX_FIELD_BITS
                        };
                        if globals.report_size > size_limit
                            || globals.report_count > MAX_REPORT_COUNT
                        {
                            return Err(DescriptorError::FieldTooLarge {
                                offset,
                                size: globals.report_size,
                                count: globals.report_count,
                            });
                        }

                        let key = (kind, globals.report_id);
                        let base_offset = bit_offsets.get(&key).copied().unwrap_or(0);
                        let width = globals.report_size as usize * globals.report_count as usize;
                        let end = base_offset
                            .checked_add(width)
                            .filter(|&bits| bits <= MAX_REPORT_BYTES * 8)
                            .ok_or(DescriptorError::ReportTooLong {
                                offset,
                                report_id: globals.report_id,
                            })?;
                        bit_offsets.insert(key, end);

                        if !constant {
                            emit_field(
                                &mut builder,
                                Field {
                                    kind,
                                    flags,
                                    globals: &globals,
                                    usages: locals.resolved(globals.usage_page),
                                    base_offset,
                                },
                            );
                        }
                    }
                    0xA => {
                        let (up, u) = locals
                            .resolved(globals.usage_page)
                            .first()
                            .copied()
                            .unwrap_or((globals.usage_page, 0));
                        builder.begin_collection(blank(ElementType::Collection, up, u));
                    }
                    0xC => {
                        if !builder.end_collection() {
                            return Err(DescriptorError::UnbalancedEndCollection { offset });
                        }
                    }
                    _ => {}
                }
                locals = Locals::default();
            }
            // Global
            1 => match tag {
                0x0 => globals.usage_page = data.unsigned() as u16,
                0x1 => globals.logical_min = data,
                0x2 => globals.logical_max = data,
                0x3 => globals.physical_min = data,
                0x4 => globals.physical_max = data,
                0x5 => globals.unit_exp = data,
                0x6 => globals.unit = data.unsigned(),
                0x7 => globals.report_size = data.unsigned(),
                0x8 => {
                    uses_report_ids = true;
                    globals.report_id = data.unsigned() as u8;
                }
                0x9 => globals.report_count = data.unsigned(),
                0xA => global_stack.push(globals),
                0xB => {
                    globals = global_stack
                        .pop()
                        .ok_or(DescriptorError::UnbalancedPop { offset })?;
                }
                _ => {}
            },
            // Local
            2 => match tag {
                0x0 => locals.usages.push(LocalUsage::from_item(data)),
                0x1 => locals.usage_min = Some(LocalUsage::from_item(data)),
                0x2 => locals.push_range(LocalUsage::from_item(data)),
                _ => {}
            },
            _ => {}
        }
    }

    if !builder.open.is_empty() {
        return Err(DescriptorError::UnclosedCollection {
            open: builder.open.len(),
        });
    }

    let longest = |kind: ReportKind| {
        bit_offsets
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|(_, &bits)| bits.div_ceil(8))
            .max()
            .unwrap_or(0)
    };
    let id_prefix = usize::from(uses_report_ids);

    Ok(ParsedDescriptor {
        elements: builder.elements,
        uses_report_ids,
        input_report_len: longest(ReportKind::Input) + id_prefix,
        feature_report_len: longest(ReportKind::Feature) + 1,
    })
}
