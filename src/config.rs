//! Persistent configuration.
//!
//! - [`Settings`]: library defaults (user scale range, device filter), TOML.
//! - [`SavedElement`]: calibration and user range of one element, keyed so it
//!   can be matched back to the element after the device list is rebuilt or
//!   the device is replugged. JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::element::{Element, DEFAULT_USER_MAX, DEFAULT_USER_MIN};
use crate::error::Result;

/// Library defaults applied when building a device list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// User range given to every element of a freshly built list.
    #[serde(default = "default_user_min")]
    pub user_min: i32,
    #[serde(default = "default_user_max")]
    pub user_max: i32,
    /// Usage page filter for [`build_device_list_from_settings`]; 0 matches any.
    ///
    /// [`build_device_list_from_settings`]: crate::manager::DeviceManager::build_device_list_from_settings
    #[serde(default)]
    pub usage_page: u16,
    /// Usage filter; 0 matches any.
    #[serde(default)]
    pub usage: u16,
}

fn default_user_min() -> i32 {
    DEFAULT_USER_MIN
}

fn default_user_max() -> i32 {
    DEFAULT_USER_MAX
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_min: DEFAULT_USER_MIN,
            user_max: DEFAULT_USER_MAX,
            usage_page: 0,
            usage: 0,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load settings from a file, or return defaults if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Saved calibration state of one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedElement {
    pub vendor_id: u16,
    pub product_id: u16,
    pub location_id: u32,
    pub usage_page: u16,
    pub usage: u16,
    pub cookie: u32,
    /// Observed range; absent when nothing had been observed.
    pub min_report: Option<i32>,
    pub max_report: Option<i32>,
    pub user_min: i32,
    pub user_max: i32,
}

impl SavedElement {
    pub fn capture(device: &Device, element: &Element) -> Self {
        Self {
            vendor_id: device.vendor_id(),
            product_id: device.product_id(),
            location_id: device.location_id(),
            usage_page: element.usage_page,
            usage: element.usage,
            cookie: element.cookie,
            min_report: element.min_report(),
            max_report: element.max_report(),
            user_min: element.user_min(),
            user_max: element.user_max(),
        }
    }

    /// Observed range as stored on the element.
    pub(crate) fn observed(&self) -> Option<(i32, i32)> {
        match (self.min_report, self.max_report) {
            (Some(lo), Some(hi)) if lo <= hi => Some((lo, hi)),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
