//! Element records and type masks.
//!
//! An [`Element`] is one reportable unit of a device: a button, an axis, a hat,
//! an output (LED, rumble), a feature, or a collection grouping other elements.
//! Elements of a device live in an arena owned by the
//! [`Device`](crate::device::Device) and are linked as a threaded tree:
//!
//! - `previous`: the parent collection for a first child, otherwise the
//!   preceding sibling (`None` at the list head)
//! - `child`: the first child (collections only)
//! - `sibling`: the next element at the same level
//!
//! This supports depth-first descent and upward-only reverse walks, see
//! [`Device::next_element`](crate::device::Device::next_element) and
//! [`Device::previous_element`](crate::device::Device::previous_element).
//!
//! Elements are read-only to callers. Calibration and user-scale fields are
//! runtime state mutated only through the owning device.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

use crate::device::DeviceId;

/// Default lower bound of the user scale range.
pub const DEFAULT_USER_MIN: i32 = 0;
/// Default upper bound of the user scale range.
pub const DEFAULT_USER_MAX: i32 = 255;

/// Kind of an element, mirroring the driver-level classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    InputMisc,
    InputButton,
    InputAxis,
    InputScanCodes,
    Output,
    Feature,
    Collection,
}

impl ElementType {
    /// Raw driver type code (IOKit numbering).
    pub fn code(self) -> u32 {
        match self {
            ElementType::InputMisc => 1,
            ElementType::InputButton => 2,
            ElementType::InputAxis => 3,
            ElementType::InputScanCodes => 4,
            ElementType::Output => 129,
            ElementType::Feature => 257,
            ElementType::Collection => 513,
        }
    }

    /// Inverse of [`ElementType::code`].
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            1 => ElementType::InputMisc,
            2 => ElementType::InputButton,
            3 => ElementType::InputAxis,
            4 => ElementType::InputScanCodes,
            129 => ElementType::Output,
            257 => ElementType::Feature,
            513 => ElementType::Collection,
            _ => return None,
        })
    }

    pub fn is_input(self) -> bool {
        matches!(
            self,
            ElementType::InputMisc
                | ElementType::InputButton
                | ElementType::InputAxis
                | ElementType::InputScanCodes
        )
    }

    /// The mask category this type belongs to.
    pub fn category(self) -> ElementTypeMask {
        match self {
            t if t.is_input() => ElementTypeMask::INPUT,
            ElementType::Output => ElementTypeMask::OUTPUT,
            ElementType::Feature => ElementTypeMask::FEATURE,
            _ => ElementTypeMask::COLLECTION,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(crate::usage::type_name(*self))
    }
}

/// Bit mask restricting which element categories a query sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementTypeMask(u32);

impl ElementTypeMask {
    pub const INPUT: Self = Self(1 << 1);
    pub const OUTPUT: Self = Self(1 << 2);
    pub const FEATURE: Self = Self(1 << 3);
    pub const COLLECTION: Self = Self(1 << 4);
    /// Every non-collection element.
    pub const IO: Self = Self(Self::INPUT.0 | Self::OUTPUT.0 | Self::FEATURE.0);
    pub const ALL: Self = Self(Self::IO.0 | Self::COLLECTION.0);

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from raw bits; unknown bits are dropped.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Does an element of `ty` pass this mask?
    pub fn matches(self, ty: ElementType) -> bool {
        self.contains(ty.category())
    }
}

impl BitOr for ElementTypeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Index of an element inside its device's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which report an element's value travels in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    Input,
    Output,
    Feature,
}

/// Where an element's bits live inside its report payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ReportLocation {
    pub kind: ReportKind,
    pub report_id: u8,
    pub bit_offset: usize,
    /// Present for array fields: the element is "on" when any slot holds its index.
    pub array: Option<ArraySlots>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ArraySlots {
    pub count: usize,
    pub usage_index: i32,
    pub logical_min: i32,
    pub logical_max: i32,
}

/// Runtime calibration and user-scale state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Calibration {
    /// Observed `(min, max)`; empty until the first value is read.
    pub observed: Option<(i32, i32)>,
    pub user_min: i32,
    pub user_max: i32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            observed: None,
            user_min: DEFAULT_USER_MIN,
            user_max: DEFAULT_USER_MAX,
        }
    }
}

impl Calibration {
    pub fn observe(&mut self, value: i32) {
        self.observed = Some(match self.observed {
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
            None => (value, value),
        });
    }
}

/// One reportable unit of a device.
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) id: ElementId,
    pub(crate) device: DeviceId,

    pub element_type: ElementType,
    pub usage_page: u16,
    pub usage: u16,
    /// Stable per-device identifier, assigned in descriptor order starting at 1.
    pub cookie: u32,
    /// Reported (logical) minimum.
    pub min: i32,
    /// Reported (logical) maximum.
    pub max: i32,
    /// Reported physical minimum; equals `min` when the descriptor declares none.
    pub scaled_min: i32,
    pub scaled_max: i32,
    /// Size of the value in bits.
    pub size: u32,
    pub relative: bool,
    pub wrapping: bool,
    pub non_linear: bool,
    pub preferred_state: bool,
    pub null_state: bool,
    pub units: u32,
    pub unit_exp: i32,
    pub name: String,

    pub(crate) report: Option<ReportLocation>,
    pub(crate) calibration: Calibration,

    pub(crate) previous: Option<ElementId>,
    pub(crate) child: Option<ElementId>,
    pub(crate) sibling: Option<ElementId>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Device this element belongs to.
    pub fn device_id(&self) -> DeviceId {
        self.device
    }

    pub fn is_collection(&self) -> bool {
        self.element_type == ElementType::Collection
    }

    pub fn previous(&self) -> Option<ElementId> {
        self.previous
    }

    pub fn child(&self) -> Option<ElementId> {
        self.child
    }

    pub fn sibling(&self) -> Option<ElementId> {
        self.sibling
    }

    /// Report id the element is carried in, if it carries a value.
    pub fn report_id(&self) -> Option<u8> {
        self.report.map(|r| r.report_id)
    }

    pub fn report_kind(&self) -> Option<ReportKind> {
        self.report.map(|r| r.kind)
    }

    /// Lowest value observed since the list was built (or calibration was reset).
    pub fn min_report(&self) -> Option<i32> {
        self.calibration.observed.map(|(lo, _)| lo)
    }

    /// Highest value observed since the list was built (or calibration was reset).
    pub fn max_report(&self) -> Option<i32> {
        self.calibration.observed.map(|(_, hi)| hi)
    }

    pub fn user_min(&self) -> i32 {
        self.calibration.user_min
    }

    pub fn user_max(&self) -> i32 {
        self.calibration.user_max
    }

    /// See [`calibrate_value`](crate::calibration::calibrate_value).
    pub fn calibrate(&self, value: i32) -> i32 {
        crate::calibration::calibrate_value(value, self)
    }

    /// See [`scale_value`](crate::calibration::scale_value).
    pub fn scale(&self, value: i32) -> i32 {
        crate::calibration::scale_value(value, self)
    }

    /// Human-readable usage name (e.g. `"X-Axis"`, `"Button #3"`).
    pub fn usage_name(&self) -> String {
        crate::usage::usage_name(self.usage_page, self.usage)
    }
}
