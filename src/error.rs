//! Error types.
//!
//! Absence conditions (no list, unknown device, element not in this device)
//! are not errors: the accessors return `None`, `0` or `false`. [`Error`] is
//! reserved for real failures coming from the backend, a malformed report
//! descriptor, or configuration I/O.

use thiserror::Error;

use crate::descriptor::DescriptorError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by `hidtree`.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend failed to enumerate, open, or talk to a device.
    #[error("HID backend error: {0}")]
    Backend(String),

    /// The device's report descriptor could not be interpreted.
    #[error("invalid report descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    /// The device has no open interface (it failed to open at build time or was closed).
    #[error("device {0} has no open interface")]
    NotOpen(String),

    /// The element cannot be read (collections and output elements carry no readable value).
    #[error("element with cookie {cookie} is not readable ({kind})")]
    NotReadable { cookie: u32, kind: &'static str },

    /// A configuration file could not be read or written.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A TOML settings file could not be parsed.
    #[error("settings parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("settings encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// A saved element record could not be (de)serialized.
    #[error("element record error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(feature = "hid")]
impl From<hidapi::HidError> for Error {
    fn from(e: hidapi::HidError) -> Self {
        Error::Backend(e.to_string())
    }
}
