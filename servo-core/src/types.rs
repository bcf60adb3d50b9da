//! Controller-level types layered on the wire types from `servo_proto`.

pub use servo_proto::{ActuatorId, CommandKind, PositionCommand, PERCENT_MAX, PERCENT_MIN};

/// Which input source is currently in control.
///
/// Held in the shared [`EventFlags`](crate::events::EventFlags) so every
/// task sees the same value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputMode {
    /// The inertial sensor is tilted; the mode supervisor drives both actuators.
    Motion,
    /// The device is at rest; touch and console inputs drive the actuators.
    #[default]
    Touch,
}

impl InputMode {
    /// Upper-case label for the console.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            InputMode::Motion => "MOTION",
            InputMode::Touch => "TOUCH",
        }
    }
}

/// Who caused an attribute value to change.
///
/// Every attribute-store mutation carries one of these. Peer-initiated
/// writes are committed silently; only locally-initiated writes may be
/// pushed out as notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteOrigin {
    /// Value refreshed from actuator hardware by this device.
    LocallyInitiated,
    /// Value written by the connected peer.
    PeerInitiated,
}
