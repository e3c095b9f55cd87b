//! hidtree: HID device and element enumeration for Rust.
//!
//! Builds a list of connected HID devices (joysticks, gamepads, custom
//! controllers), interprets each device's report descriptor into a threaded
//! tree of elements (buttons, axes, hats, collections, outputs, features),
//! and converts raw element values into calibrated and user-scaled ranges.
//!
//! ```no_run
//! use hidtree::{DeviceManager, ElementTypeMask};
//!
//! # #[cfg(not(feature = "hid"))] fn main() {}
//! # #[cfg(feature = "hid")]
//! # fn main() -> hidtree::Result<()> {
//! let mut manager = DeviceManager::discover()?;
//! manager.build_device_list(0x01, 0x04)?; // Generic Desktop / Joystick
//! for device in manager.devices() {
//!     println!("{} ({} inputs)", device.name(), device.count_elements(ElementTypeMask::INPUT));
//!     for element in device.elements(ElementTypeMask::IO) {
//!         println!("  {:>3} {} [{}]", element.cookie, element.name, element.element_type);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod calibration;
pub mod config;
mod descriptor;
pub mod device;
pub mod element;
pub mod error;
pub mod event;
pub mod manager;
pub mod metadata;
mod queue;
mod report;
pub mod usage;

#[cfg(feature = "hid")]
pub use backends::hid::HidApiBackend;
pub use backends::virtual_input::{VirtualBackend, VirtualHandle};
pub use backends::{Backend, DeviceDescriptor, DeviceInterface};
pub use calibration::*;
pub use config::*;
pub use descriptor::DescriptorError;
pub use device::*;
pub use element::*;
pub use error::*;
pub use event::*;
pub use manager::*;
pub use metadata::*;
