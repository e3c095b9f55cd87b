//! Human-readable names for element types, usage pages and usages.
//!
//! Lookups never fail: unknown values fall back to text carrying the numeric
//! values, and unknown raw type codes map to the empty string.

use crate::element::ElementType;

/// Usage page constants used across the crate.
pub mod page {
    pub const GENERIC_DESKTOP: u16 = 0x01;
    pub const SIMULATION: u16 = 0x02;
    pub const VR: u16 = 0x03;
    pub const SPORT: u16 = 0x04;
    pub const GAME: u16 = 0x05;
    pub const GENERIC_DEVICE: u16 = 0x06;
    pub const KEYBOARD: u16 = 0x07;
    pub const LED: u16 = 0x08;
    pub const BUTTON: u16 = 0x09;
    pub const ORDINAL: u16 = 0x0A;
    pub const TELEPHONY: u16 = 0x0B;
    pub const CONSUMER: u16 = 0x0C;
    pub const DIGITIZER: u16 = 0x0D;
    pub const PID: u16 = 0x0F;
    pub const UNICODE: u16 = 0x10;
    pub const ALPHANUMERIC_DISPLAY: u16 = 0x14;
    pub const MEDICAL: u16 = 0x40;
    pub const POWER_DEVICE: u16 = 0x84;
    pub const BATTERY_SYSTEM: u16 = 0x85;
    pub const BAR_CODE_SCANNER: u16 = 0x8C;
    pub const SCALE: u16 = 0x8D;
    pub const MAGNETIC_STRIPE_READER: u16 = 0x8E;
    pub const CAMERA_CONTROL: u16 = 0x90;
    pub const ARCADE: u16 = 0x91;
    pub const VENDOR_DEFINED_START: u16 = 0xFF00;
}

/// Generic Desktop usages the crate counts (axes, sliders, dials, wheels, hats).
pub mod generic_desktop {
    pub const JOYSTICK: u16 = 0x04;
    pub const GAME_PAD: u16 = 0x05;
    pub const MULTI_AXIS_CONTROLLER: u16 = 0x08;
    pub const X: u16 = 0x30;
    pub const Y: u16 = 0x31;
    pub const Z: u16 = 0x32;
    pub const RX: u16 = 0x33;
    pub const RY: u16 = 0x34;
    pub const RZ: u16 = 0x35;
    pub const SLIDER: u16 = 0x36;
    pub const DIAL: u16 = 0x37;
    pub const WHEEL: u16 = 0x38;
    pub const HAT_SWITCH: u16 = 0x39;
}

/// Display name of an element type.
pub fn type_name(ty: ElementType) -> &'static str {
    match ty {
        ElementType::InputMisc => "Miscellaneous Input",
        ElementType::InputButton => "Button Input",
        ElementType::InputAxis => "Axis Input",
        ElementType::InputScanCodes => "Scan Code Input",
        ElementType::Output => "Output",
        ElementType::Feature => "Feature",
        ElementType::Collection => "Collection",
    }
}

/// Display name for a raw driver type code; empty for unknown codes.
pub fn type_name_raw(code: u32) -> &'static str {
    ElementType::from_code(code).map(type_name).unwrap_or("")
}

/// Name of a usage page, if known.
pub fn usage_page_name(usage_page: u16) -> Option<&'static str> {
    Some(match usage_page {
        page::GENERIC_DESKTOP => "Generic Desktop",
        page::SIMULATION => "Simulation",
        page::VR => "VR",
        page::SPORT => "Sport",
        page::GAME => "Game",
        page::GENERIC_DEVICE => "Generic Device Controls",
        page::KEYBOARD => "Keyboard",
        page::LED => "LED",
        page::BUTTON => "Button",
        page::ORDINAL => "Ordinal",
        page::TELEPHONY => "Telephony",
        page::CONSUMER => "Consumer",
        page::DIGITIZER => "Digitizer",
        page::PID => "PID",
        page::UNICODE => "Unicode",
        page::ALPHANUMERIC_DISPLAY => "Alphanumeric Display",
        page::MEDICAL => "Medical Instruments",
        0x80..=0x83 => "Monitor",
        page::POWER_DEVICE => "Power Device",
        page::BATTERY_SYSTEM => "Battery System",
        page::BAR_CODE_SCANNER => "Bar Code Scanner",
        page::SCALE => "Scale",
        page::MAGNETIC_STRIPE_READER => "Magnetic Stripe Reader",
        page::CAMERA_CONTROL => "Camera Control",
        page::ARCADE => "Arcade",
        page::VENDOR_DEFINED_START..=0xFFFF => "Vendor Defined",
        _ => return None,
    })
}

/// Name of a usage within a usage page.
///
/// - Button page: `"Button #n"` (`"No Button"` for 0)
/// - Ordinal page: `"Instance #n"`
/// - vendor pages: `"Vendor Defined Usage 0x…"`
/// - known page, unknown usage: `"<Page> Usage 0x…"`
/// - unknown page: `"Page: 0x…, Usage: 0x…"`
pub fn usage_name(usage_page: u16, usage: u16) -> String {
    let known = match usage_page {
        page::GENERIC_DESKTOP => generic_desktop_name(usage),
        page::SIMULATION => simulation_name(usage),
        page::VR => vr_name(usage),
        page::SPORT => sport_name(usage),
        page::GAME => game_name(usage),
        page::KEYBOARD => return keyboard_name(usage),
        page::LED => led_name(usage),
        page::BUTTON => {
            return if usage == 0 {
                "No Button".to_string()
            } else {
                format!("Button #{usage}")
            }
        }
        page::ORDINAL => return format!("Instance #{usage}"),
        page::TELEPHONY => telephony_name(usage),
        page::CONSUMER => consumer_name(usage),
        page::DIGITIZER => digitizer_name(usage),
        page::PID => pid_name(usage),
        page::VENDOR_DEFINED_START..=0xFFFF => {
            return format!("Vendor Defined Usage 0x{usage:x}")
        }
        _ => None,
    };

    match (known, usage_page_name(usage_page)) {
        (Some(name), _) => name.to_string(),
        (None, Some(page_name)) => format!("{page_name} Usage 0x{usage:x}"),
        (None, None) => format!("Page: 0x{usage_page:x}, Usage: 0x{usage:x}"),
    }
}

fn generic_desktop_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Pointer",
        0x02 => "Mouse",
        0x04 => "Joystick",
        0x05 => "GamePad",
        0x06 => "Keyboard",
        0x07 => "Keypad",
        0x08 => "Multi-Axis Controller",
        0x09 => "Tablet PC System Controls",
        0x30 => "X-Axis",
        0x31 => "Y-Axis",
        0x32 => "Z-Axis",
        0x33 => "X-Rotation",
        0x34 => "Y-Rotation",
        0x35 => "Z-Rotation",
        0x36 => "Slider",
        0x37 => "Dial",
        0x38 => "Wheel",
        0x39 => "Hat Switch",
        0x3A => "Counted Buffer",
        0x3B => "Byte Count",
        0x3C => "Motion Wakeup",
        0x3D => "Start",
        0x3E => "Select",
        0x40 => "Vx",
        0x41 => "Vy",
        0x42 => "Vz",
        0x43 => "Vbrx",
        0x44 => "Vbry",
        0x45 => "Vbrz",
        0x46 => "Vno",
        0x47 => "Feature Notification",
        0x48 => "Resolution Multiplier",
        0x80 => "System Control",
        0x81 => "System Power Down",
        0x82 => "System Sleep",
        0x83 => "System Wake Up",
        0x84 => "System Context Menu",
        0x85 => "System Main Menu",
        0x86 => "System App Menu",
        0x87 => "System Menu Help",
        0x88 => "System Menu Exit",
        0x89 => "System Menu Select",
        0x8A => "System Menu Right",
        0x8B => "System Menu Left",
        0x8C => "System Menu Up",
        0x8D => "System Menu Down",
        0x90 => "D-pad Up",
        0x91 => "D-pad Down",
        0x92 => "D-pad Right",
        0x93 => "D-pad Left",
        _ => return None,
    })
}

fn simulation_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Flight Simulation Device",
        0x02 => "Automobile Simulation Device",
        0x03 => "Tank Simulation Device",
        0x04 => "Spaceship Simulation Device",
        0x05 => "Submarine Simulation Device",
        0x06 => "Sailing Simulation Device",
        0x07 => "Motorcycle Simulation Device",
        0x08 => "Sports Simulation Device",
        0x09 => "Airplane Simulation Device",
        0x0A => "Helicopter Simulation Device",
        0x0B => "Magic Carpet Simulation Device",
        0x0C => "Bicycle Simulation Device",
        0x20 => "Flight Control Stick",
        0x21 => "Flight Stick",
        0x22 => "Cyclic Control",
        0x23 => "Cyclic Trim",
        0x24 => "Flight Yoke",
        0x25 => "Track Control",
        0xB0 => "Aileron",
        0xB1 => "Aileron Trim",
        0xB2 => "Anti-Torque Control",
        0xB3 => "Autopilot Enable",
        0xB4 => "Chaff Release",
        0xB5 => "Collective Control",
        0xB6 => "Dive Brake",
        0xB7 => "Electronic Countermeasures",
        0xB8 => "Elevator",
        0xB9 => "Elevator Trim",
        0xBA => "Rudder",
        0xBB => "Throttle",
        0xBC => "Flight Communications",
        0xBD => "Flare Release",
        0xBE => "Landing Gear",
        0xBF => "Toe Brake",
        0xC0 => "Trigger",
        0xC1 => "Weapons Arm",
        0xC2 => "Weapons Select",
        0xC3 => "Wing Flaps",
        0xC4 => "Accelerator",
        0xC5 => "Brake",
        0xC6 => "Clutch",
        0xC7 => "Shifter",
        0xC8 => "Steering",
        0xC9 => "Turret Direction",
        0xCA => "Barrel Elevation",
        0xCB => "Dive Plane",
        0xCC => "Ballast",
        0xCD => "Bicycle Crank",
        0xCE => "Handle Bars",
        0xCF => "Front Brake",
        0xD0 => "Rear Brake",
        _ => return None,
    })
}

fn vr_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Belt",
        0x02 => "Body Suit",
        0x03 => "Flexor",
        0x04 => "Glove",
        0x05 => "Head Tracker",
        0x06 => "Head Mounted Display",
        0x07 => "Hand Tracker",
        0x08 => "Oculometer",
        0x09 => "Vest",
        0x0A => "Animatronic Device",
        0x20 => "Stereo Enable",
        0x21 => "Display Enable",
        _ => return None,
    })
}

fn sport_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Baseball Bat",
        0x02 => "Golf Club",
        0x03 => "Rowing Machine",
        0x04 => "Treadmill",
        0x30 => "Oar",
        0x31 => "Slope",
        0x32 => "Rate",
        0x33 => "Stick Speed",
        0x34 => "Stick Face Angle",
        0x35 => "Stick Heel/Toe",
        0x36 => "Stick Follow Through",
        0x37 => "Stick Tempo",
        0x38 => "Stick Type",
        0x39 => "Stick Height",
        0x50 => "Putter",
        _ => return None,
    })
}

fn game_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "3D Game Controller",
        0x02 => "Pinball Device",
        0x03 => "Gun Device",
        0x20 => "Point of View",
        0x21 => "Turn Right/Left",
        0x22 => "Pitch Forward/Backward",
        0x23 => "Roll Right/Left",
        0x24 => "Move Right/Left",
        0x25 => "Move Forward/Backward",
        0x26 => "Move Up/Down",
        0x27 => "Lean Right/Left",
        0x28 => "Lean Forward/Backward",
        0x29 => "Height of POV",
        0x2A => "Flipper",
        0x2B => "Secondary Flipper",
        0x2C => "Bump",
        0x2D => "New Game",
        0x2E => "Shoot Ball",
        0x2F => "Player",
        0x30 => "Gun Bolt",
        0x31 => "Gun Clip",
        0x32 => "Gun Selector",
        0x33 => "Gun Single Shot",
        0x34 => "Gun Burst",
        0x35 => "Gun Automatic",
        0x36 => "Gun Safety",
        0x37 => "Gamepad Fire/Jump",
        0x39 => "Gamepad Trigger",
        _ => return None,
    })
}

fn keyboard_name(usage: u16) -> String {
    let fixed = match usage {
        0x01 => "Error Roll Over",
        0x02 => "POST Fail",
        0x03 => "Error Undefined",
        0x27 => "Keyboard 0",
        0x28 => "Return (Enter)",
        0x29 => "Escape",
        0x2A => "Delete (Backspace)",
        0x2B => "Tab",
        0x2C => "Spacebar",
        0x2D => "Hyphen",
        0x2E => "Equal Sign",
        0x2F => "Open Bracket",
        0x30 => "Close Bracket",
        0x31 => "Backslash",
        0x32 => "Non-US Pound",
        0x33 => "Semicolon",
        0x34 => "Quote",
        0x35 => "Grave Accent",
        0x36 => "Comma",
        0x37 => "Period",
        0x38 => "Slash",
        0x39 => "Caps Lock",
        0x46 => "Print Screen",
        0x47 => "Scroll Lock",
        0x48 => "Pause",
        0x49 => "Insert",
        0x4A => "Home",
        0x4B => "Page Up",
        0x4C => "Delete Forward",
        0x4D => "End",
        0x4E => "Page Down",
        0x4F => "Right Arrow",
        0x50 => "Left Arrow",
        0x51 => "Down Arrow",
        0x52 => "Up Arrow",
        0x53 => "Keypad Num Lock",
        0x54 => "Keypad /",
        0x55 => "Keypad *",
        0x56 => "Keypad -",
        0x57 => "Keypad +",
        0x58 => "Keypad Enter",
        0x62 => "Keypad 0",
        0x63 => "Keypad Period",
        0xE0 => "Left Control",
        0xE1 => "Left Shift",
        0xE2 => "Left Alt",
        0xE3 => "Left GUI",
        0xE4 => "Right Control",
        0xE5 => "Right Shift",
        0xE6 => "Right Alt",
        0xE7 => "Right GUI",
        0x04..=0x1D => {
            let letter = char::from(b'A' + (usage - 0x04) as u8);
            return format!("Keyboard {letter}");
        }
        0x1E..=0x26 => return format!("Keyboard {}", usage - 0x1D),
        0x3A..=0x45 => return format!("F{}", usage - 0x39),
        0x59..=0x61 => return format!("Keypad {}", usage - 0x58),
        _ => return format!("Keyboard Usage 0x{usage:x}"),
    };
    fixed.to_string()
}

fn led_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Num Lock",
        0x02 => "Caps Lock",
        0x03 => "Scroll Lock",
        0x04 => "Compose",
        0x05 => "Kana",
        0x06 => "Power",
        0x07 => "Shift",
        0x08 => "Do Not Disturb",
        0x09 => "Mute",
        0x4B => "Generic Indicator",
        _ => return None,
    })
}

fn telephony_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Phone",
        0x02 => "Answering Machine",
        0x03 => "Message Controls",
        0x04 => "Handset",
        0x05 => "Headset",
        0x20 => "Hook Switch",
        0x21 => "Flash",
        0x2F => "Phone Mute",
        _ => return None,
    })
}

fn consumer_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Consumer Control",
        0x02 => "Numeric Key Pad",
        0x03 => "Programmable Buttons",
        0x04 => "Microphone",
        0x05 => "Headphone",
        0x06 => "Graphic Equalizer",
        0x30 => "Power",
        0x40 => "Menu",
        0xB0 => "Play",
        0xB1 => "Pause",
        0xB2 => "Record",
        0xB3 => "Fast Forward",
        0xB4 => "Rewind",
        0xB5 => "Scan Next Track",
        0xB6 => "Scan Previous Track",
        0xB7 => "Stop",
        0xB8 => "Eject",
        0xCD => "Play/Pause",
        0xE0 => "Volume",
        0xE2 => "Mute",
        0xE9 => "Volume Increment",
        0xEA => "Volume Decrement",
        0x0238 => "AC Pan",
        _ => return None,
    })
}

fn digitizer_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Digitizer",
        0x02 => "Pen",
        0x03 => "Light Pen",
        0x04 => "Touch Screen",
        0x05 => "Touch Pad",
        0x20 => "Stylus",
        0x22 => "Finger",
        0x30 => "Tip Pressure",
        0x32 => "In Range",
        0x33 => "Touch",
        0x3D => "X Tilt",
        0x3E => "Y Tilt",
        0x42 => "Tip Switch",
        0x44 => "Barrel Switch",
        0x45 => "Eraser",
        0x47 => "Touch Valid",
        0x51 => "Contact Identifier",
        0x54 => "Contact Count",
        _ => return None,
    })
}

fn pid_name(usage: u16) -> Option<&'static str> {
    Some(match usage {
        0x01 => "Physical Interface Device",
        0x21 => "Set Effect Report",
        0x22 => "Effect Block Index",
        0x25 => "Effect Type",
        0x26 => "Constant Force",
        0x27 => "Ramp",
        0x30 => "Square",
        0x31 => "Sine",
        0x32 => "Triangle",
        0x40 => "Spring",
        0x41 => "Damper",
        0x42 => "Inertia",
        0x43 => "Friction",
        0x50 => "Duration",
        0x52 => "Trigger Button",
        0x53 => "Trigger Repeat Interval",
        0x54 => "Sample Period",
        0x55 => "Gain",
        0x7D => "Device Gain",
        _ => return None,
    })
}
