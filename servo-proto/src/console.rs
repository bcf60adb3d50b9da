//! Console key map and status line.
//!
//! The console speaks single keystrokes, no line editing:
//!
//! | Key | Action |
//! |-----|--------|
//! | `q` | actuator A up by [`NUDGE_STEP`] |
//! | `a` | actuator A down by [`NUDGE_STEP`] |
//! | `w` | actuator B up by [`NUDGE_STEP`] |
//! | `s` | actuator B down by [`NUDGE_STEP`] |
//! | `p` | print status |
//! | `?` / `h` | print help |

use crate::types::ActuatorId;
use core::fmt::Write;
use heapless::String;

/// Percentage points moved per nudge key.
pub const NUDGE_STEP: i8 = 10;

/// Help text printed on `?`.
pub const HELP_TEXT: &str = "\r\n\
    q/a  actuator A up/down\r\n\
    w/s  actuator B up/down\r\n\
    p    status\r\n\
    ?    help\r\n";

/// A decoded console keystroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleCommand {
    /// Move one actuator by a relative amount.
    Nudge { actuator: ActuatorId, delta: i8 },
    /// Print both positions and the input mode.
    Status,
    /// Print the key map.
    Help,
}

/// Map a received byte to a command. Unknown keys (including CR/LF) map to
/// `None`.
#[must_use]
pub fn parse_key(byte: u8) -> Option<ConsoleCommand> {
    let cmd = match byte {
        b'q' => ConsoleCommand::Nudge {
            actuator: ActuatorId::A,
            delta: NUDGE_STEP,
        },
        b'a' => ConsoleCommand::Nudge {
            actuator: ActuatorId::A,
            delta: -NUDGE_STEP,
        },
        b'w' => ConsoleCommand::Nudge {
            actuator: ActuatorId::B,
            delta: NUDGE_STEP,
        },
        b's' => ConsoleCommand::Nudge {
            actuator: ActuatorId::B,
            delta: -NUDGE_STEP,
        },
        b'p' => ConsoleCommand::Status,
        b'?' | b'h' => ConsoleCommand::Help,
        _ => return None,
    };
    Some(cmd)
}

/// Format the status line into `out`, replacing its contents.
///
/// ```
/// use servo_proto::write_status;
///
/// let mut line = heapless::String::<48>::new();
/// write_status(&mut line, 50, 100, "TOUCH").unwrap();
/// assert_eq!(line.as_str(), "A:  50%  B: 100%  mode: TOUCH\r\n");
/// ```
pub fn write_status<const N: usize>(
    out: &mut String<N>,
    a: u8,
    b: u8,
    mode: &str,
) -> Result<(), core::fmt::Error> {
    out.clear();
    write!(out, "A: {:>3}%  B: {:>3}%  mode: {}\r\n", a, b, mode)
}
