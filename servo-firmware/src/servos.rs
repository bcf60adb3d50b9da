//! Servo outputs on PWM slice 0.
//!
//! The slice runs at 1 MHz (125 MHz / 125) with a 20 000 tick period, so
//! one tick is one microsecond and the frame rate is 50 Hz.

use embassy_rp::pwm::{Config, Pwm};
use fixed::types::U12F4;
use fixed_macro::fixed;
use servo_core::{ActuatorId, ServoOutput, ServoReadback, ServoTiming};

/// Timing of slice 0 as configured by [`PwmServos::new`].
pub const BOARD_TIMING: ServoTiming = ServoTiming::new(125_000_000, 125, 1000, 2000, 20_000);

const SLICE: usize = 0;

fn read_compare(id: ActuatorId) -> u16 {
    let cc = embassy_rp::pac::PWM.ch(SLICE).cc().read();
    match id {
        ActuatorId::A => cc.a(),
        ActuatorId::B => cc.b(),
    }
}

/// Read-only view of the slice's compare registers, for tasks other than
/// the actuator task.
#[derive(Clone, Copy)]
pub struct PwmReadback;

impl ServoReadback for PwmReadback {
    fn compare(&self, id: ActuatorId) -> u16 {
        read_compare(id)
    }
}

/// Owning handle to both servo channels.
pub struct PwmServos<'d> {
    pwm: Pwm<'d>,
    config: Config,
}

impl<'d> PwmServos<'d> {
    /// Take over a slice and start both outputs at `initial` ticks.
    pub fn new(pwm: Pwm<'d>, initial: u16) -> Self {
        let mut config = Config::default();
        config.divider = fixed!(125: U12F4);
        config.top = BOARD_TIMING.period_ticks - 1;
        config.compare_a = initial;
        config.compare_b = initial;
        let mut servos = Self { pwm, config };
        servos.pwm.set_config(&servos.config);
        servos
    }
}

impl ServoReadback for PwmServos<'_> {
    fn compare(&self, id: ActuatorId) -> u16 {
        read_compare(id)
    }
}

impl ServoOutput for PwmServos<'_> {
    fn set_compare(&mut self, id: ActuatorId, ticks: u16) {
        match id {
            ActuatorId::A => self.config.compare_a = ticks,
            ActuatorId::B => self.config.compare_b = ticks,
        }
        self.pwm.set_config(&self.config);
    }
}
