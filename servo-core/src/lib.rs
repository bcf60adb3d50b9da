//! Platform-agnostic task logic for a dual servo controller.
//!
//! Several input sources compete for two actuators. They never touch the
//! hardware: each one turns its input into a [`PositionCommand`] and drops
//! it into the shared [`CommandQueue`]. The [`ActuatorTask`] is the only
//! writer of the compare registers and announces every change through the
//! shared [`EventFlags`], which the radio and mirror tasks wait on.
//!
//! ```text
//!  ConsoleTask ─┐
//!  TouchInput  ─┤                                   ┌─> PeripheralLink (notify)
//!  ModeSupervisor ─> CommandQueue ─> ActuatorTask ──┤
//!  PeripheralLink ┘                   (EventFlags)  └─> MirrorTask
//! ```
//!
//! # Modules
//!
//! - [`actuator`]: percent arithmetic on the compare registers and the task
//!   draining the queue.
//! - [`supervisor`]: debounced motion/touch arbitration from an accelerometer.
//! - [`touch`], [`console`]: the local input tasks.
//! - [`radio`]: deferred-interrupt bridge to a wireless stack, in peripheral
//!   (attribute server) and central (remote control) roles.
//! - [`mirror`]: two-byte register image for an I2C master.
//! - [`ports`]: the traits board crates implement.
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt instead of the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod actuator;
pub mod config;
pub mod console;
pub mod convert;
pub mod events;
pub mod mirror;
pub mod ports;
pub mod queue;
pub mod radio;
pub mod semaphore;
pub mod supervisor;
pub mod touch;
pub mod types;

#[cfg(test)]
mod test_util;

pub use actuator::{read_percent, ActuatorDriver, ActuatorTask};
pub use config::{ArbitrationPolicy, ControlConfig, ServoTiming, DEFAULT_CONFIG};
pub use console::ConsoleTask;
pub use events::EventFlags;
pub use mirror::{MirrorRegisters, MirrorTask};
pub use ports::{
    AccelSample, Accelerometer, Console, ConsoleError, MirrorSink, SensorError, ServoOutput,
    ServoReadback, StatusIndicator, TouchSensor,
};
pub use queue::{CommandDropped, CommandQueue, QUEUE_CAPACITY};
pub use radio::{CentralLink, PeripheralLink, RadioError, RadioEvent, StackDriver};
pub use semaphore::CountingSignal;
pub use supervisor::ModeSupervisor;
pub use touch::TouchInput;
pub use types::{ActuatorId, CommandKind, InputMode, PositionCommand, WriteOrigin};
