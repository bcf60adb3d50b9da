//! Hardware seams.
//!
//! Each trait here is the only thing a task knows about its peripheral.
//! Board crates implement them over HAL drivers; tests implement them over
//! plain memory.

use core::future::Future;

use crate::types::ActuatorId;

/// Read access to the actuator timer's compare registers.
///
/// The compare registers are the single source of truth for actuator
/// position; nothing caches a percent value.
pub trait ServoReadback {
    fn compare(&self, id: ActuatorId) -> u16;
}

/// Write access to the actuator timer. Only the actuator task holds one.
pub trait ServoOutput: ServoReadback {
    fn set_compare(&mut self, id: ActuatorId, ticks: u16);
}

/// Centroid value a slider reports when nothing touches it.
pub const SLIDER_NOT_TOUCHED: u16 = u16::MAX;

/// Capacitive touch controller.
///
/// Scans are started explicitly and run in the background; results are read
/// per widget once [`is_busy`](TouchSensor::is_busy) turns false.
pub trait TouchSensor {
    fn start_scan(&mut self);
    fn is_busy(&self) -> bool;
    /// Process raw scan data for one widget.
    fn process_widget(&mut self, widget: u8);
    /// Slider centroid in `0..=resolution`, or [`SLIDER_NOT_TOUCHED`].
    fn centroid(&self, widget: u8) -> u16;
    fn is_button_active(&self, widget: u8) -> bool;
    /// Drift compensation. Runs once per scan cycle.
    fn update_baselines(&mut self);
}

/// Raw accelerometer reading in sensor counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSample {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transfer failed.
    Bus,
    /// Device did not identify as expected.
    NotPresent,
}

pub trait Accelerometer {
    fn read_acceleration(&mut self) -> impl Future<Output = Result<AccelSample, SensorError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// UART/communication I/O error.
    Io,
    /// UART framing error.
    Framing,
    /// Receiver overrun.
    Overrun,
}

/// Byte-oriented serial console.
pub trait Console {
    fn read_byte(&mut self) -> impl Future<Output = Result<u8, ConsoleError>>;
    fn write(&mut self, bytes: &[u8]) -> impl Future<Output = Result<(), ConsoleError>>;
}

/// Connection indicator (usually an LED).
pub trait StatusIndicator {
    fn set_connected(&mut self, connected: bool);
}

/// Destination for the two-byte position mirror.
pub trait MirrorSink {
    fn publish(&mut self, positions: [u8; 2]);
}
