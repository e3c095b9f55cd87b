use hidtree::{usage, DeviceManager, ElementTypeMask};
use tracing_subscriber::EnvFilter;

fn main() -> hidtree::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut mgr = DeviceManager::discover()?;
    // Joysticks only; pass 0, 0 to watch everything.
    mgr.build_device_list(usage::page::GENERIC_DESKTOP, usage::generic_desktop::JOYSTICK)?;

    let ids: Vec<_> = mgr.devices().map(|d| d.id()).collect();
    for id in &ids {
        let Some(d) = mgr.device_mut(*id) else { continue };
        let inputs: Vec<_> = d.elements(ElementTypeMask::INPUT).map(|e| e.id()).collect();
        for e in inputs {
            d.queue_element(e);
        }
        println!("- {} ({} queued)", d.name(), d.queued_len());
    }

    loop {
        for (id, ev) in mgr.poll_all() {
            let Some(e) = mgr.device(id).and_then(|d| d.element(ev.element)) else {
                continue;
            };
            println!(
                "{:?} {}: raw={} calibrated={} scaled={}",
                id,
                e.name,
                ev.value,
                e.calibrate(ev.value),
                e.scale(e.calibrate(ev.value))
            );
        }
        // Sleep a touch to avoid pegging the CPU in the demo
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}
