//! Command types: ActuatorId, CommandKind, PositionCommand.

/// Lowest reportable actuator position, in percent.
pub const PERCENT_MIN: u8 = 0;

/// Highest reportable actuator position, in percent.
pub const PERCENT_MAX: u8 = 100;

/// One of the two independently positioned output channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorId {
    A,
    B,
}

impl ActuatorId {
    /// Both channels, in channel order.
    pub const ALL: [ActuatorId; 2] = [ActuatorId::A, ActuatorId::B];

    /// Array index of this channel (A = 0, B = 1).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ActuatorId::A => 0,
            ActuatorId::B => 1,
        }
    }

    /// Single-letter label used on the console.
    #[inline]
    #[must_use]
    pub const fn label(self) -> char {
        match self {
            ActuatorId::A => 'A',
            ActuatorId::B => 'B',
        }
    }
}

/// Whether a command sets a position or nudges it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// Move to `amount` percent.
    Absolute,
    /// Move by `amount` percentage points from the current position.
    Relative,
}

/// A single positioning request for one actuator.
///
/// Commands are plain values: producers build one, hand it to the command
/// queue and never see it again. The amount is clamped into the domain of
/// its kind at construction (`0..=100` for absolute, `-100..=100` for
/// relative); out-of-range requests are never rejected.
///
/// # Example
///
/// ```
/// use servo_proto::{ActuatorId, PositionCommand};
///
/// let cmd = PositionCommand::absolute(ActuatorId::A, 250);
/// assert_eq!(cmd.amount(), 100);
///
/// let cmd = PositionCommand::relative(ActuatorId::B, -300);
/// assert_eq!(cmd.amount(), -100);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub struct PositionCommand {
    actuator: ActuatorId,
    kind: CommandKind,
    amount: i16,
}

impl PositionCommand {
    /// Build an absolute command, clamping `percent` to `0..=100`.
    pub const fn absolute(actuator: ActuatorId, percent: i16) -> Self {
        Self {
            actuator,
            kind: CommandKind::Absolute,
            amount: clamp_i16(percent, PERCENT_MIN as i16, PERCENT_MAX as i16),
        }
    }

    /// Build a relative command, clamping `delta` to `-100..=100`.
    pub const fn relative(actuator: ActuatorId, delta: i16) -> Self {
        Self {
            actuator,
            kind: CommandKind::Relative,
            amount: clamp_i16(delta, -(PERCENT_MAX as i16), PERCENT_MAX as i16),
        }
    }

    /// Target channel.
    #[inline]
    #[must_use]
    pub const fn actuator(&self) -> ActuatorId {
        self.actuator
    }

    /// Absolute or relative.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Percent (absolute) or percentage-point delta (relative).
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> i16 {
        self.amount
    }
}

const fn clamp_i16(value: i16, min: i16, max: i16) -> i16 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
