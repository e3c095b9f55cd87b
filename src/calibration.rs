//! Calibration and user scaling of element values.
//!
//! - **Calibration** stretches the range actually observed for an element
//!   (`min_report..=max_report`) onto its reported range (`min..=max`). Until
//!   at least two distinct values have been seen the value passes through.
//! - **Scaling** maps a value in the reported range onto the user range
//!   (`user_min..=user_max`, default `0..=255`).
//!
//! Both compute `(value - lo) * span_out / span_in + out_lo` exactly. The
//! quotient truncates toward zero before `out_lo` is added, so a result
//! just below zero rounds down: scaling 511 from `0..=1023` onto
//! `-100..=100` gives `-1`, where truncating the whole sum would give `0`.
//! Results saturate at the `i32` bounds.

use crate::element::Element;

/// Map `value` from the element's observed range onto its reported range.
pub fn calibrate_value(value: i32, element: &Element) -> i32 {
    match element.calibration.observed {
        Some((lo, hi)) if hi != lo => remap(value, lo, hi, element.min, element.max),
        _ => value,
    }
}

/// Map `value` from the element's reported range onto its user range.
pub fn scale_value(value: i32, element: &Element) -> i32 {
    if element.max == element.min {
        return value;
    }
    remap(
        value,
        element.min,
        element.max,
        element.calibration.user_min,
        element.calibration.user_max,
    )
}

/// Linear remap of `value` from `[from_lo, from_hi]` to `[to_lo, to_hi]`.
///
/// The product is formed exactly before dividing; `from_hi != from_lo` must hold.
fn remap(value: i32, from_lo: i32, from_hi: i32, to_lo: i32, to_hi: i32) -> i32 {
    let from = from_hi as i128 - from_lo as i128;
    let to = to_hi as i128 - to_lo as i128;
    let n = (value as i128 - from_lo as i128) * to / from + to_lo as i128;
    n.clamp(i32::MIN as i128, i32::MAX as i128) as i32
}
