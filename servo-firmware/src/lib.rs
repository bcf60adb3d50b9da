//! Dual servo controller for RP2040.
//!
//! Board support for [`servo_core`]: every hardware port the core tasks
//! need is implemented here over embassy-rp drivers.
//!
//! # Hardware Configuration
//!
//! | Function    | GPIO | Description |
//! |-------------|------|-------------|
//! | PWM0 A      | 0    | Servo A signal |
//! | PWM0 B      | 1    | Servo B signal |
//! | I2C0 SDA    | 4    | Accelerometer (LIS3DH @ 0x18) |
//! | I2C0 SCL    | 5    | Accelerometer |
//! | UART1 TX    | 8    | Console transmit |
//! | UART1 RX    | 9    | Console receive |
//! | I2C1 SDA    | 18   | Position mirror target (@ 0x40) |
//! | I2C1 SCL    | 19   | Position mirror target |
//! | LED         | 25   | On-board LED (motion mode) |
//!
//! # Architecture
//!
//! Five tasks share one command queue and one event flag group:
//!
//! - **Actuator Task**: sole owner of the PWM slice, drains the queue
//! - **Supervisor Task**: tilts take over both servos while the board moves
//! - **Console Task**: `q/a/w/s` nudges, `p` status, `?` help
//! - **Mirror Task**: refreshes the two-byte register image on change
//! - **I2C Target Task**: answers bus reads with the register image
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

pub use servo_core::{
    ActuatorDriver, ActuatorTask, CommandQueue, ConsoleTask, EventFlags, MirrorRegisters,
    MirrorTask, ModeSupervisor, DEFAULT_CONFIG,
};

pub mod accel;
pub mod console;
pub mod mirror;
pub mod servos;

pub use accel::Lis3dh;
pub use console::UartConsole;
pub use mirror::{serve_mirror, MIRROR_ADDRESS};
pub use servos::{PwmReadback, PwmServos, BOARD_TIMING};
