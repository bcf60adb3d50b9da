//! Attribute value codecs.
//!
//! Every position attribute is a single byte: an unsigned percent for the
//! absolute attributes and a two's-complement delta for the relative ones.
//! The client characteristic configuration descriptor (CCCD) is the usual
//! little-endian `u16` with bit 0 enabling notifications.

/// 128-bit UUID of the servo control service, in over-the-air byte order.
pub const SERVO_SERVICE_UUID: [u8; 16] = [
    0x3c, 0x5a, 0x81, 0x2e, 0x47, 0x0b, 0x9d, 0xa6, 0x5e, 0x41, 0x3f, 0x7b, 0x10, 0x00, 0xd2, 0x6a,
];

/// CCCD bit enabling notifications.
const CCCD_NOTIFY: u16 = 0x0001;

/// Encode a percent for an absolute attribute.
#[inline]
#[must_use]
pub fn encode_percent(percent: u8) -> [u8; 1] {
    [percent]
}

/// Encode a delta for a relative attribute.
#[inline]
#[must_use]
pub fn encode_relative(delta: i8) -> [u8; 1] {
    delta.to_le_bytes()
}

/// Decode an absolute attribute write.
///
/// Only the first byte is significant; range checking is left to the
/// command constructor, which clamps.
#[inline]
#[must_use]
pub fn decode_absolute(data: &[u8]) -> Option<u8> {
    data.first().copied()
}

/// Decode a relative attribute write.
#[inline]
#[must_use]
pub fn decode_relative(data: &[u8]) -> Option<i8> {
    data.first().map(|&b| i8::from_le_bytes([b]))
}

/// Decode a CCCD write into "notifications enabled".
///
/// A single byte is accepted as the low half of the value.
#[must_use]
pub fn decode_cccd(data: &[u8]) -> Option<bool> {
    let value = match data {
        [lo] => u16::from(*lo),
        [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]),
        [] => return None,
    };
    Some(value & CCCD_NOTIFY != 0)
}
