//! Wire formats shared by the dual servo controller.
//!
//! This crate holds everything that crosses a byte boundary between the
//! controller and the outside world, without any platform dependencies:
//!
//! - **Types**: [`ActuatorId`], [`CommandKind`] and [`PositionCommand`], the
//!   unit of work every input source produces.
//! - **Advertising data**: [`parse_advertisement`] extracts the device name
//!   and the 128-bit service UUID from a scan response.
//! - **Attribute values**: one-byte percent/delta codecs and the
//!   subscription descriptor value ([`decode_absolute`], [`decode_cccd`], ...).
//! - **Console**: the single-key command map ([`parse_key`]) and the status
//!   line ([`write_status`]).
//!
//! # Example
//!
//! ```
//! use servo_proto::{parse_advertisement, SERVO_SERVICE_UUID};
//!
//! let payload = [2, 0x0A, 0x00, 4, 0x09, b'A', b'B', b'C'];
//! let info = parse_advertisement(&payload);
//! assert_eq!(info.name(), b"ABC");
//! assert!(!info.has_service(&SERVO_SERVICE_UUID));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod advertising;
pub mod attribute;
pub mod console;
pub mod types;

pub use advertising::{
    parse_advertisement, AdvertisementInfo, AD_TYPE_COMPLETE_NAME, AD_TYPE_UUID128_COMPLETE,
    MAX_ADV_PAYLOAD, MAX_NAME_LEN, UUID128_LEN,
};
pub use attribute::{
    decode_absolute, decode_cccd, decode_relative, encode_percent, encode_relative,
    SERVO_SERVICE_UUID,
};
pub use console::{parse_key, write_status, ConsoleCommand, HELP_TEXT, NUDGE_STEP};
pub use types::{ActuatorId, CommandKind, PositionCommand, PERCENT_MAX, PERCENT_MIN};
