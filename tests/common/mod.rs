#![allow(dead_code)]

use hidtree::{DeviceDescriptor, DeviceManager, VirtualBackend, VirtualHandle};
use tracing_subscriber::EnvFilter;

/// Joystick: X/Y (10 bit) in a physical collection, a hat, four buttons,
/// 4 bits of padding, and a Num Lock LED output. No report ids.
///
/// Cookies: 1 application, 2 physical, 3 X, 4 Y, 5 hat, 6..=9 buttons, 10 LED.
pub const JOYSTICK: &[u8] = &[
    0x05, 0x01, 0x09, 0x04, 0xA1, 0x01, // Generic Desktop / Joystick, Application
    0x09, 0x01, 0xA1, 0x00, //   Pointer, Physical
    0x09, 0x30, 0x09, 0x31, 0x15, 0x00, 0x26, 0xFF, 0x03, //     X, Y, 0..1023
    0x75, 0x0A, 0x95, 0x02, 0x81, 0x02, //     2 x 10 bit input
    0xC0, //   End Collection
    0x09, 0x39, 0x15, 0x00, 0x25, 0x07, 0x35, 0x00, 0x46, 0x3B, 0x01, // Hat, 0..7, 0..315
    0x65, 0x14, 0x75, 0x04, 0x95, 0x01, 0x81, 0x42, // degrees, 4 bit, null state
    0x45, 0x00, 0x65, 0x00, //   reset physical max and unit
    0x05, 0x09, 0x19, 0x01, 0x29, 0x04, 0x15, 0x00, 0x25, 0x01, // Buttons 1..4
    0x75, 0x01, 0x95, 0x04, 0x81, 0x02, //   4 x 1 bit input
    0x75, 0x04, 0x95, 0x01, 0x81, 0x03, //   padding
    0x05, 0x08, 0x09, 0x01, 0x75, 0x01, 0x91, 0x02, //   LED Num Lock output
    0x75, 0x07, 0x91, 0x03, //   padding
    0xC0,
];

/// Keyboard-ish device: one modifier byte and a feature report with id 2.
pub const KEYPAD: &[u8] = &[
    0x05, 0x01, 0x09, 0x06, 0xA1, 0x01, // Generic Desktop / Keyboard, Application
    0x85, 0x01, // Report ID 1
    0x05, 0x07, 0x19, 0xE0, 0x29, 0xE7, 0x15, 0x00, 0x25, 0x01, // LeftControl..Right GUI
    0x75, 0x01, 0x95, 0x08, 0x81, 0x02, //   8 x 1 bit input
    0x85, 0x02, // Report ID 2
    0x06, 0x00, 0xFF, 0x09, 0x01, 0x15, 0x00, 0x26, 0xFF, 0x00, // Vendor usage, 0..255
    0x75, 0x08, 0x95, 0x01, 0xB1, 0x02, //   feature byte
    0xC0,
];

/// One 32-bit X axis with the given logical range.
pub fn axis_descriptor(min: i32, max: i32) -> Vec<u8> {
    let mut d = vec![0x05, 0x01, 0x09, 0x04, 0xA1, 0x01, 0x09, 0x30];
    d.push(0x17);
    d.extend_from_slice(&min.to_le_bytes());
    d.push(0x27);
    d.extend_from_slice(&max.to_le_bytes());
    d.extend_from_slice(&[0x75, 0x20, 0x95, 0x01, 0x81, 0x02, 0xC0]);
    d
}

pub fn joystick_info(path: &str) -> DeviceDescriptor {
    DeviceDescriptor {
        path: path.into(),
        vendor_id: 0x1234,
        product_id: 0x5678,
        version: 0x0100,
        manufacturer: Some("Test Inc.".into()),
        product: Some("Test Stick".into()),
        transport: "Virtual".into(),
        usage_page: 0x01,
        usage: 0x04,
        interface_number: -1,
        ..Default::default()
    }
}

pub fn keypad_info(path: &str) -> DeviceDescriptor {
    DeviceDescriptor {
        path: path.into(),
        vendor_id: 0x1234,
        product_id: 0x0006,
        product: Some("Test Keypad".into()),
        transport: "Virtual".into(),
        usage_page: 0x01,
        usage: 0x06,
        ..Default::default()
    }
}

/// A manager over a shared virtual backend, plus a handle for each added joystick.
pub fn joystick_rig(paths: &[&str]) -> (DeviceManager, VirtualBackend, Vec<VirtualHandle>) {
    init_tracing();
    let backend = VirtualBackend::new();
    let handles = paths
        .iter()
        .map(|p| backend.add_device(joystick_info(p), JOYSTICK))
        .collect();
    let manager = DeviceManager::new(backend.clone());
    (manager, backend, handles)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
