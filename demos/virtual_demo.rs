use hidtree::{DeviceDescriptor, DeviceManager, ElementTypeMask, VirtualBackend};

/// Two-axis, two-button gamepad.
const GAMEPAD: &[u8] = &[
    0x05, 0x01, 0x09, 0x05, 0xA1, 0x01, // Generic Desktop / Game Pad, Application
    0x09, 0x30, 0x09, 0x31, 0x15, 0x81, 0x25, 0x7F, // X, Y, -127..127
    0x75, 0x08, 0x95, 0x02, 0x81, 0x02, // 2 x 8 bit, Input (Data,Var,Abs)
    0x05, 0x09, 0x19, 0x01, 0x29, 0x02, // Buttons 1..2
    0x15, 0x00, 0x25, 0x01, 0x75, 0x01, 0x95, 0x02, 0x81, 0x02,
    0x75, 0x06, 0x95, 0x01, 0x81, 0x03, // padding
    0xC0,
];

fn main() -> hidtree::Result<()> {
    let backend = VirtualBackend::new();
    let pad = backend.add_device(
        DeviceDescriptor {
            path: "virtual:demo".into(),
            vendor_id: 0x1209,
            product_id: 0x0001,
            product: Some("Demo Virtual Gamepad".into()),
            transport: "Virtual".into(),
            usage_page: 0x01,
            usage: 0x05,
            ..Default::default()
        },
        GAMEPAD,
    );

    let mut mgr = DeviceManager::new(backend);
    mgr.build_device_list(0, 0)?;
    let Some(id) = mgr.first_device().map(|d| d.id()) else {
        return Ok(());
    };
    let Some(device) = mgr.device_mut(id) else {
        return Ok(());
    };

    // Inject some sample input: X full left, Y centred, button 1 down.
    pad.feed(vec![0x81, 0x00, 0b01]);

    let inputs: Vec<_> = device.elements(ElementTypeMask::INPUT).map(|e| e.id()).collect();
    for e in inputs {
        let value = device.read_element_value(e)?;
        if let (Some(v), Some(el)) = (value, device.element(e)) {
            println!("(Virtual) {} = {} (scaled {})", el.name, v, el.scale(v));
        }
    }
    Ok(())
}
