use hidtree::{DeviceManager, ElementTypeMask};
use tracing_subscriber::EnvFilter;

fn main() -> hidtree::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut mgr = DeviceManager::discover()?;
    if !mgr.build_device_list(0, 0)? {
        println!("No HID devices found.");
        return Ok(());
    }

    let mut next = mgr.first_device();
    while let Some(d) = next {
        let c = d.counts();
        println!(
            "VID:PID={:04x}:{:04x} {} [{}] loc=0x{:08x} usage={} elements={} axes={} buttons={} hats={}",
            d.vendor_id(),
            d.product_id(),
            d.name(),
            d.transport(),
            d.location_id(),
            hidtree::usage::usage_name(d.usage_page(), d.usage()),
            d.count_elements(ElementTypeMask::ALL),
            c.axes,
            c.buttons,
            c.hats,
        );
        for e in d.elements(ElementTypeMask::ALL) {
            println!(
                "  #{:<4} {:<22} {:<20} {}..{} ({} bit)",
                e.cookie,
                e.name,
                e.element_type.to_string(),
                e.min,
                e.max,
                e.size
            );
        }
        next = mgr.next_device(d);
    }
    Ok(())
}
