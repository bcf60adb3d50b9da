//! Best-effort parser for BLE advertising data.
//!
//! Advertising data is a sequence of `(length, type, data)` structures where
//! `length` counts the type byte plus the data bytes. Only two types matter
//! to the controller:
//!
//! - `0x09` Complete Local Name
//! - `0x07` Complete List of 128-bit Service UUIDs
//!
//! The first occurrence of each wins and later ones are ignored. The parser
//! never reads past the supplied slice: a structure whose declared length
//! runs off the end is treated as absent, and parsing stops there.

use heapless::Vec;

/// Largest legacy advertising payload.
pub const MAX_ADV_PAYLOAD: usize = 31;

/// Longest name that fits in a legacy payload (31 minus length and type).
pub const MAX_NAME_LEN: usize = MAX_ADV_PAYLOAD - 2;

/// Size of a 128-bit UUID.
pub const UUID128_LEN: usize = 16;

/// AD type: Complete Local Name.
pub const AD_TYPE_COMPLETE_NAME: u8 = 0x09;

/// AD type: Complete List of 128-bit Service Class UUIDs.
pub const AD_TYPE_UUID128_COMPLETE: u8 = 0x07;

/// Fields extracted from one scan result.
///
/// Rebuilt from scratch for every scan callback; nothing is carried over
/// between advertisements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdvertisementInfo {
    name: Vec<u8, MAX_NAME_LEN>,
    service_uuid: Vec<u8, UUID128_LEN>,
}

impl AdvertisementInfo {
    /// Raw device name bytes (empty if no name was advertised).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Length of the device name in bytes.
    #[inline]
    #[must_use]
    pub fn name_len(&self) -> usize {
        self.name.len()
    }

    /// Device name as UTF-8, if present and valid.
    #[must_use]
    pub fn name_str(&self) -> Option<&str> {
        if self.name.is_empty() {
            return None;
        }
        core::str::from_utf8(&self.name).ok()
    }

    /// Service UUID bytes in over-the-air (little-endian) order.
    #[inline]
    #[must_use]
    pub fn service_uuid(&self) -> &[u8] {
        &self.service_uuid
    }

    /// Length of the service UUID field in bytes (0 or 16).
    #[inline]
    #[must_use]
    pub fn service_uuid_len(&self) -> usize {
        self.service_uuid.len()
    }

    /// Whether the advertised service UUID equals `uuid`.
    #[must_use]
    pub fn has_service(&self, uuid: &[u8; UUID128_LEN]) -> bool {
        self.service_uuid.as_slice() == uuid.as_slice()
    }
}

/// Parse an advertising payload.
///
/// Never fails: malformed input yields whatever was complete before the
/// first malformed structure.
pub fn parse_advertisement(payload: &[u8]) -> AdvertisementInfo {
    let mut info = AdvertisementInfo::default();
    let mut have_name = false;
    let mut have_uuid = false;
    let mut pos = 0;

    while pos < payload.len() {
        let len = payload[pos] as usize;
        if len == 0 {
            // Zero length marks early termination of the significant part.
            break;
        }

        // Structure occupies payload[pos..=pos + len]
        let end = pos + 1 + len;
        if end > payload.len() {
            break;
        }

        let ad_type = payload[pos + 1];
        let data = &payload[pos + 2..end];

        match ad_type {
            AD_TYPE_COMPLETE_NAME if !have_name => {
                have_name = true;
                if let Ok(name) = Vec::from_slice(data) {
                    info.name = name;
                }
            }
            AD_TYPE_UUID128_COMPLETE if !have_uuid => {
                have_uuid = true;
                if data.len() == UUID128_LEN {
                    if let Ok(uuid) = Vec::from_slice(data) {
                        info.service_uuid = uuid;
                    }
                }
            }
            _ => {}
        }

        pos = end;
    }

    info
}
