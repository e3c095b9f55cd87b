//! Report payload decoding.

use crate::element::{Element, ReportLocation};

/// Split a raw report into `(report_id, payload)`.
///
/// Devices that declare report ids prefix every report with its id; devices
/// that do not send the bare payload, which is reported as id `0`.
#[inline]
pub(crate) fn split_report(data: &[u8], uses_report_ids: bool) -> (u8, &[u8]) {
    if !uses_report_ids {
        return (0, data);
    }
    match data.split_first() {
        Some((&id, payload)) => (id, payload),
        None => (0, &[]),
    }
}

/// Read `size` bits (at most 32) starting at `bit_offset`, little-endian.
///
/// Returns `None` if the payload is too short.
pub(crate) fn extract_bits(payload: &[u8], bit_offset: usize, size: u32) -> Option<u32> {
    if size == 0 {
        return Some(0);
    }
    let size = size.min(32) as usize;
    let end = bit_offset + size;
    if end > payload.len() * 8 {
        return None;
    }
    let first = bit_offset / 8;
    let last = (end - 1) / 8;
    // At most 5 bytes: 32 bits plus a 7 bit misalignment.
    let acc = payload[first..=last]
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc | (b as u64) << (8 * i));
    let mask = (1u64 << size) - 1;
    Some(((acc >> (bit_offset % 8)) & mask) as u32)
}

/// Two's complement sign extension of a `size`-bit value.
pub(crate) fn sign_extend(value: u32, size: u32) -> i32 {
    if size == 0 || size >= 32 {
        return value as i32;
    }
    let shift = 32 - size;
    ((value << shift) as i32) >> shift
}

/// Decode an element's current value from a payload of its report.
pub(crate) fn decode(element: &Element, loc: &ReportLocation, payload: &[u8]) -> Option<i32> {
    let size = element.size;
    match loc.array {
        Some(slots) => {
            let signed = slots.logical_min < 0;
            for slot in 0..slots.count {
                let raw = extract_bits(payload, loc.bit_offset + slot * size as usize, size)?;
                let v = if signed {
                    sign_extend(raw, size)
                } else {
                    raw as i32
                };
                if v < slots.logical_min || v > slots.logical_max {
                    continue;
                }
                if v.wrapping_sub(slots.logical_min) == slots.usage_index {
                    return Some(1);
                }
            }
            Some(0)
        }
        None => {
            let raw = extract_bits(payload, loc.bit_offset, size)?;
            Some(if element.min < 0 {
                sign_extend(raw, size)
            } else {
                raw as i32
            })
        }
    }
}
