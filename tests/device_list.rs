mod common;

use common::*;
use hidtree::{
    DeviceDescriptor, DeviceManager, ElementType, ElementTypeMask, Error, SavedElement,
    VirtualBackend,
};

#[test]
fn no_list_yields_sentinels() {
    let (mut mgr, _backend, _) = joystick_rig(&["js0"]);
    assert!(!mgr.have_device_list());
    assert_eq!(mgr.count_devices(), 0);
    assert!(mgr.first_device().is_none());
    assert_eq!(mgr.devices().count(), 0);
    mgr.release_device_list();
    assert!(!mgr.have_device_list());
}

#[test]
fn build_filters_by_usage() {
    init_tracing();
    let backend = VirtualBackend::new();
    backend.add_device(joystick_info("js0"), JOYSTICK);
    backend.add_device(keypad_info("kb0"), KEYPAD);
    let mut mgr = DeviceManager::new(backend);

    assert!(mgr.build_device_list(0x01, 0x04).unwrap());
    assert_eq!(mgr.count_devices(), 1);
    assert_eq!(mgr.first_device().unwrap().product(), Some("Test Stick"));

    assert!(mgr.build_device_list(0, 0).unwrap());
    assert_eq!(mgr.count_devices(), 2);

    // Nothing matches: a list exists but is empty.
    assert!(!mgr.build_device_list(0x0C, 0).unwrap());
    assert!(mgr.have_device_list());
    assert_eq!(mgr.count_devices(), 0);
}

#[test]
fn devices_follow_enumeration_order() {
    let (mut mgr, _backend, _) = joystick_rig(&["a", "b", "c"]);
    mgr.build_device_list(0, 0).unwrap();

    let mut paths = Vec::new();
    let mut next = mgr.first_device();
    while let Some(d) = next {
        paths.push(d.descriptor().path.clone());
        next = mgr.next_device(d);
    }
    assert_eq!(paths, ["a", "b", "c"]);
    let indices: Vec<usize> = mgr.devices().map(|d| d.id().index()).collect();
    assert_eq!(indices, [0, 1, 2]);
}

#[test]
fn malformed_descriptors_are_skipped() {
    init_tracing();
    let backend = VirtualBackend::new();
    backend.add_device(joystick_info("bad"), vec![0x05]);
    backend.add_device(joystick_info("unbalanced"), vec![0xC0]);
    backend.add_device(
        joystick_info("huge"),
        vec![
            0x77, 0xFF, 0xFF, 0xFF, 0xFF, 0x97, 0xFF, 0xFF, 0xFF, 0xFF, 0x81, 0x03, 0x81, 0x03,
        ],
    );
    backend.add_device(joystick_info("good"), JOYSTICK);
    let mut mgr = DeviceManager::new(backend);

    assert!(mgr.build_device_list(0, 0).unwrap());
    assert_eq!(mgr.count_devices(), 1);
    assert_eq!(mgr.first_device().unwrap().descriptor().path, "good");
}

#[test]
fn device_records_carry_identity_and_counts() {
    let (mut mgr, _backend, _) = joystick_rig(&["js0"]);
    mgr.build_device_list(0, 0).unwrap();
    let d = mgr.first_device().unwrap();

    assert_eq!((d.vendor_id(), d.product_id(), d.version()), (0x1234, 0x5678, 0x0100));
    assert_eq!(d.manufacturer(), Some("Test Inc."));
    assert_eq!(d.transport(), "Virtual");
    assert_eq!((d.usage_page(), d.usage()), (0x01, 0x04));
    assert_eq!(d.location_id(), d.descriptor().location_id());

    let c = d.counts();
    assert_eq!((c.total, c.inputs, c.outputs, c.collections), (10, 7, 1, 2));
    assert_eq!((c.axes, c.buttons, c.hats), (2, 4, 1));
    assert_eq!(
        d.count_elements(ElementTypeMask::IO),
        c.inputs + c.outputs + c.features
    );

    let meta = d.metadata();
    assert_eq!(meta.product_string.as_deref(), Some("Test Stick"));
    assert_eq!(meta.usage_name, "Joystick");
}

#[test]
fn element_fields_come_from_the_descriptor() {
    let (mut mgr, _backend, _) = joystick_rig(&["js0"]);
    mgr.build_device_list(0, 0).unwrap();
    let d = mgr.first_device().unwrap();

    let hat = d.element_by_cookie(5).unwrap();
    assert_eq!(hat.element_type, ElementType::InputAxis);
    assert_eq!(hat.name, "Hat Switch");
    assert_eq!((hat.min, hat.max), (0, 7));
    assert_eq!((hat.scaled_min, hat.scaled_max), (0, 315));
    assert_eq!(hat.units, 0x14);
    assert!(hat.null_state);
    assert_eq!(hat.size, 4);

    let button = d.element_by_cookie(6).unwrap();
    assert_eq!(button.element_type, ElementType::InputButton);
    assert_eq!(button.name, "Button #1");
    assert_eq!((button.user_min(), button.user_max()), (0, 255));
    assert_eq!(button.min_report(), None);

    let led = d.element_by_cookie(10).unwrap();
    assert_eq!(led.element_type, ElementType::Output);
    assert_eq!(led.name, "Num Lock");
}

#[test]
fn traversal_visits_the_tree_depth_first() {
    let (mut mgr, _backend, _) = joystick_rig(&["js0"]);
    mgr.build_device_list(0, 0).unwrap();
    let d = mgr.first_device().unwrap();

    let mut cookies = Vec::new();
    let mut next = d.first_element(ElementTypeMask::ALL);
    while let Some(e) = next {
        cookies.push(e.cookie);
        next = d.next_element(e, ElementTypeMask::ALL);
    }
    assert_eq!(cookies, (1..=10).collect::<Vec<_>>());

    let inputs: Vec<u32> = d.elements(ElementTypeMask::INPUT).map(|e| e.cookie).collect();
    assert_eq!(inputs, [3, 4, 5, 6, 7, 8, 9]);

    // Upward from the last button: predecessors only, never into the physical collection.
    let b4 = d.element_by_cookie(9).unwrap();
    let mut up = Vec::new();
    let mut prev = d.previous_element(b4, ElementTypeMask::ALL);
    while let Some(e) = prev {
        up.push(e.cookie);
        prev = d.previous_element(e, ElementTypeMask::ALL);
    }
    assert_eq!(up, [8, 7, 6, 5, 2, 1]);
}

#[test]
fn elements_from_another_device_are_rejected() {
    let (mut mgr, _backend, _) = joystick_rig(&["a", "b"]);
    mgr.build_device_list(0, 0).unwrap();
    let a = mgr.first_device().unwrap();
    let b = mgr.next_device(a).unwrap();
    let x_of_b = b.element_by_cookie(3).unwrap();
    assert!(a.next_element(x_of_b, ElementTypeMask::ALL).is_none());
    assert!(a.previous_element(x_of_b, ElementTypeMask::ALL).is_none());
}

#[test]
fn values_feed_calibration_and_scaling() {
    let (mut mgr, _backend, handles) = joystick_rig(&["js0"]);
    mgr.build_device_list(0, 0).unwrap();
    let id = mgr.first_device().unwrap().id();
    let d = mgr.device_mut(id).unwrap();
    assert!(d.is_open());
    let x = d.element_by_cookie(3).unwrap().id();

    // X = 100, then X = 900 (10-bit little-endian at offset 0).
    handles[0].feed(vec![0x64, 0x00, 0x00, 0x00]);
    assert_eq!(d.read_element_value(x).unwrap(), Some(100));
    handles[0].feed(vec![0x84, 0x03, 0x00, 0x00]);
    assert_eq!(d.read_element_value(x).unwrap(), Some(900));

    let e = d.element(x).unwrap();
    assert_eq!((e.min_report(), e.max_report()), (Some(100), Some(900)));
    assert_eq!(e.calibrate(100), 0);
    assert_eq!(e.calibrate(900), 1023);
    assert_eq!(e.scale(e.calibrate(900)), 255);

    assert!(d.set_user_range(x, -1000, 1000));
    let e = d.element(x).unwrap();
    assert_eq!(e.scale(0), -1000);
    assert_eq!(e.scale(1023), 1000);
}

#[test]
fn output_elements_are_not_readable() {
    let (mut mgr, _backend, _) = joystick_rig(&["js0"]);
    mgr.build_device_list(0, 0).unwrap();
    let id = mgr.first_device().unwrap().id();
    let d = mgr.device_mut(id).unwrap();
    let led = d.element_by_cookie(10).unwrap().id();
    assert!(matches!(
        d.read_element_value(led),
        Err(Error::NotReadable { cookie: 10, .. })
    ));
}

#[test]
fn report_ids_route_values() {
    init_tracing();
    let backend = VirtualBackend::new();
    let kb = backend.add_device(keypad_info("kb0"), KEYPAD);
    let mut mgr = DeviceManager::new(backend);
    mgr.build_device_list(0, 0).unwrap();
    let id = mgr.first_device().unwrap().id();
    let d = mgr.device_mut(id).unwrap();

    let left_shift = d
        .elements(ElementTypeMask::INPUT)
        .find(|e| e.usage == 0xE1)
        .unwrap()
        .id();
    assert_eq!(d.element(left_shift).unwrap().element_type, ElementType::InputScanCodes);
    kb.feed(vec![0x01, 0b0000_0010]);
    assert_eq!(d.read_element_value(left_shift).unwrap(), Some(1));

    let feature = d.first_element(ElementTypeMask::FEATURE).unwrap().id();
    kb.set_feature(2, vec![0x2A]);
    assert_eq!(d.read_element_value(feature).unwrap(), Some(0x2A));
}

#[test]
fn refused_devices_stay_listed_until_reopened() {
    init_tracing();
    let backend = VirtualBackend::new();
    let js = backend.add_device(joystick_info("js0"), JOYSTICK);
    js.refuse_open(true);
    let mut mgr = DeviceManager::new(backend);

    assert!(mgr.build_device_list(0, 0).unwrap());
    let id = mgr.first_device().unwrap().id();
    assert!(!mgr.device(id).unwrap().is_open());
    let x = mgr.device(id).unwrap().element_by_cookie(3).unwrap().id();
    assert!(matches!(
        mgr.device_mut(id).unwrap().read_element_value(x),
        Err(Error::NotOpen(_))
    ));

    assert!(mgr.open_device(id).is_err());
    js.refuse_open(false);
    assert!(mgr.open_device(id).unwrap());
    assert!(mgr.device(id).unwrap().is_open());
    assert!(js.is_open());
}

#[test]
fn release_and_drop_close_every_interface() {
    let (mut mgr, _backend, handles) = joystick_rig(&["a", "b"]);
    mgr.build_device_list(0, 0).unwrap();
    assert!(handles.iter().all(|h| h.is_open()));

    mgr.release_device_list();
    assert!(handles.iter().all(|h| !h.is_open()));
    assert!(!mgr.have_device_list());

    mgr.build_device_list(0, 0).unwrap();
    assert!(handles.iter().all(|h| h.is_open()));
    drop(mgr);
    assert!(handles.iter().all(|h| !h.is_open()));
}

#[test]
fn rebuild_reflects_unplugged_devices() {
    let (mut mgr, backend, handles) = joystick_rig(&["a", "b"]);
    mgr.build_device_list(0, 0).unwrap();
    assert_eq!(mgr.count_devices(), 2);

    assert!(backend.remove_device("a"));
    mgr.build_device_list(0, 0).unwrap();
    assert_eq!(mgr.count_devices(), 1);
    assert_eq!(mgr.first_device().unwrap().descriptor().path, "b");
    assert!(!handles[0].is_open());
}

#[test]
fn queued_elements_report_changes() {
    let (mut mgr, _backend, handles) = joystick_rig(&["js0"]);
    mgr.build_device_list(0, 0).unwrap();
    let id = mgr.first_device().unwrap().id();
    {
        let d = mgr.device_mut(id).unwrap();
        let inputs: Vec<_> = d.elements(ElementTypeMask::INPUT).map(|e| e.id()).collect();
        for e in inputs {
            assert!(d.queue_element(e));
        }
        assert_eq!(d.queued_len(), 7);
    }

    // X = 512, Y = 1023, hat = 3, buttons 1 and 3.
    handles[0].feed(vec![0x00, 0xFE, 0x3F, 0x05]);
    let events = mgr.poll_all();
    let changes: Vec<(u32, i32)> = events.iter().map(|(_, e)| (e.cookie, e.value)).collect();
    assert_eq!(
        changes,
        [(3, 512), (4, 1023), (5, 3), (6, 1), (7, 0), (8, 1), (9, 0)]
    );
    assert!(events.iter().all(|(d, _)| *d == id));

    // Only button 3 released.
    handles[0].feed(vec![0x00, 0xFE, 0x3F, 0x01]);
    let changes: Vec<(u32, i32)> = mgr
        .poll_all()
        .iter()
        .map(|(_, e)| (e.cookie, e.value))
        .collect();
    assert_eq!(changes, [(8, 0)]);
    assert!(mgr.poll_all().is_empty());
}

#[test]
fn saved_elements_survive_a_rebuild() {
    let (mut mgr, _backend, handles) = joystick_rig(&["js0"]);
    mgr.build_device_list(0, 0).unwrap();
    let id = mgr.first_device().unwrap().id();
    let x = {
        let d = mgr.device_mut(id).unwrap();
        let x = d.element_by_cookie(3).unwrap().id();
        handles[0].feed(vec![0x10, 0x00, 0x00, 0x00]);
        handles[0].feed(vec![0xF0, 0x03, 0x00, 0x00]);
        d.read_element_value(x).unwrap();
        d.set_user_range(x, -50, 50);
        x
    };
    let saved = mgr.save_element(id, x).unwrap();
    // Only the latest report was decoded.
    assert_eq!((saved.min_report, saved.max_report), (Some(0x3F0), Some(0x3F0)));
    let json = saved.to_json().unwrap();

    mgr.build_device_list(0, 0).unwrap();
    let fresh = mgr.first_device().unwrap().element_by_cookie(3).unwrap();
    assert_eq!(fresh.min_report(), None);
    assert_eq!(fresh.user_max(), 255);

    let restored = SavedElement::from_json(&json).unwrap();
    let (dev, el) = mgr.restore_element(&restored).unwrap();
    let e = mgr.device(dev).unwrap().element(el).unwrap();
    assert_eq!(e.cookie, 3);
    assert_eq!((e.min_report(), e.max_report()), (Some(0x3F0), Some(0x3F0)));
    assert_eq!((e.user_min(), e.user_max()), (-50, 50));
}

#[test]
fn restore_falls_back_to_product_and_usage() {
    let (mut mgr, _backend, _) = joystick_rig(&["moved"]);
    mgr.build_device_list(0, 0).unwrap();
    let saved = SavedElement {
        vendor_id: 0x1234,
        product_id: 0x5678,
        location_id: 0xDEAD_BEEF,
        usage_page: 0x01,
        usage: 0x31,
        cookie: 99,
        min_report: Some(5),
        max_report: Some(1000),
        user_min: 0,
        user_max: 100,
    };
    let (dev, el) = mgr.restore_element(&saved).unwrap();
    let e = mgr.device(dev).unwrap().element(el).unwrap();
    assert_eq!(e.cookie, 4);
    assert_eq!(e.calibrate(5), 0);
    assert_eq!(e.calibrate(1000), 1023);

    let other = SavedElement {
        vendor_id: 0xFFFF,
        ..saved
    };
    assert!(mgr.restore_element(&other).is_none());
}

#[test]
fn build_fails_without_list_when_enumeration_fails() {
    struct Broken;
    impl hidtree::Backend for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn enumerate(&mut self) -> hidtree::Result<Vec<DeviceDescriptor>> {
            Err(Error::Backend("no driver".into()))
        }
        fn report_descriptor(&mut self, _: &DeviceDescriptor) -> hidtree::Result<Vec<u8>> {
            unreachable!()
        }
        fn open(
            &mut self,
            _: &DeviceDescriptor,
        ) -> hidtree::Result<Box<dyn hidtree::DeviceInterface>> {
            unreachable!()
        }
    }

    let mut mgr = DeviceManager::new(Broken);
    assert!(mgr.build_device_list(0, 0).is_err());
    assert!(!mgr.have_device_list());
    assert_eq!(mgr.backend_name(), "broken");
}
