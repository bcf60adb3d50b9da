//! Compile-time configuration.
//!
//! Every tunable lives in a plain struct with a `const` default. Boards
//! override by declaring their own const, e.g.:
//!
//! ```
//! use servo_core::config::{ControlConfig, ServoTiming, DEFAULT_CONFIG};
//!
//! const BOARD_CONFIG: ControlConfig = ControlConfig {
//!     servo: ServoTiming::new(125_000_000, 125, 1000, 2000, 20_000),
//!     ..DEFAULT_CONFIG
//! };
//! assert_eq!(BOARD_CONFIG.servo.ticks_per_us, 1);
//! ```

use embassy_time::Duration;
use servo_proto::SERVO_SERVICE_UUID;

/// Pulse-width timing of the actuator timer.
///
/// `ticks_per_us` is derived from the timer clock and prescaler and must be
/// an exact integer, otherwise positions would drift by rounding. The
/// constructor enforces this at compile time when used in a `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoTiming {
    /// Pulse width at 0 %.
    pub min_pulse_us: u16,
    /// Pulse width at 100 %.
    pub max_pulse_us: u16,
    /// Timer ticks per microsecond.
    pub ticks_per_us: u16,
    /// Timer period in ticks (the counter wraps here).
    pub period_ticks: u16,
}

impl ServoTiming {
    /// Build timing from the timer clock, its prescaler and the pulse range.
    ///
    /// Panics (at compile time in const context) if the tick rate is not a
    /// whole number of ticks per microsecond, if the pulse range is empty,
    /// or if the period does not fit the 16-bit counter.
    #[must_use]
    pub const fn new(
        clock_hz: u32,
        prescaler: u32,
        min_pulse_us: u16,
        max_pulse_us: u16,
        period_us: u32,
    ) -> Self {
        assert!(prescaler > 0, "prescaler must be non-zero");
        assert!(
            clock_hz % (prescaler * 1_000_000) == 0,
            "timer tick rate must be a whole number of ticks per microsecond"
        );
        assert!(min_pulse_us < max_pulse_us, "empty pulse range");
        let ticks_per_us = clock_hz / prescaler / 1_000_000;
        assert!(ticks_per_us > 0, "timer slower than 1 MHz");
        let period_ticks = period_us * ticks_per_us;
        assert!(period_ticks <= u16::MAX as u32, "period overflows the counter");
        assert!(
            (max_pulse_us as u32) < period_us,
            "pulse longer than period"
        );
        Self {
            min_pulse_us,
            max_pulse_us,
            ticks_per_us: ticks_per_us as u16,
            period_ticks: period_ticks as u16,
        }
    }
}

/// Debounce and scaling of the inertial mode supervisor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SupervisorConfig {
    /// Sensor counts corresponding to 1 g.
    pub full_scale_counts: i16,
    /// Percent reported when an axis is level.
    pub neutral_percent: f32,
    /// Deviation from neutral (percentage points) that counts as movement.
    pub movement_threshold: f32,
    /// Time without movement before control returns to touch.
    pub quiet_period: Duration,
    /// Sampling cadence.
    pub poll_interval: Duration,
}

/// Capacitive widget layout and scan pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchConfig {
    /// Widget id of the linear slider.
    pub slider_widget: u8,
    /// Widget id of the button selecting actuator A.
    pub button_a_widget: u8,
    /// Widget id of the button selecting actuator B.
    pub button_b_widget: u8,
    /// Highest centroid the slider reports.
    pub slider_resolution: u16,
    /// Sleep between busy checks while a scan is running.
    pub busy_retry: Duration,
    /// Pause between completed scan cycles.
    pub cycle_interval: Duration,
}

/// Radio bring-up and central-role target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioConfig {
    /// Sleep between readiness polls while the stack starts.
    pub ready_poll: Duration,
    /// Service UUID the central role connects to.
    pub target_service: [u8; 16],
}

/// How touch input behaves while motion input is in control.
///
/// The touch task historically never consulted the input mode, so touch and
/// motion commands could interleave on the same actuator. `Concurrent`
/// keeps that behaviour; `MotionPreemptsTouch` drops touch commands while
/// the mode is [`InputMode::Motion`](crate::types::InputMode::Motion).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArbitrationPolicy {
    #[default]
    Concurrent,
    MotionPreemptsTouch,
}

/// Complete controller configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlConfig {
    /// PWM timing shared by both channels.
    pub servo: ServoTiming,
    /// Inertial sampling and debounce.
    pub supervisor: SupervisorConfig,
    /// Touch widget ids and scan pacing.
    pub touch: TouchConfig,
    /// Radio bring-up and target service.
    pub radio: RadioConfig,
    /// Whether touch yields to motion.
    pub arbitration: ArbitrationPolicy,
}

/// 24 MHz timer clock / 12 = 2 ticks per microsecond, 50 Hz frame.
pub const DEFAULT_SERVO_TIMING: ServoTiming = ServoTiming::new(24_000_000, 12, 1000, 2000, 20_000);

pub const DEFAULT_SUPERVISOR: SupervisorConfig = SupervisorConfig {
    full_scale_counts: 16_384,
    neutral_percent: 50.0,
    movement_threshold: 3.0,
    quiet_period: Duration::from_millis(1000),
    poll_interval: Duration::from_millis(20),
};

pub const DEFAULT_TOUCH: TouchConfig = TouchConfig {
    slider_widget: 0,
    button_a_widget: 1,
    button_b_widget: 2,
    slider_resolution: 100,
    busy_retry: Duration::from_millis(1),
    cycle_interval: Duration::from_millis(10),
};

pub const DEFAULT_RADIO: RadioConfig = RadioConfig {
    ready_poll: Duration::from_millis(10),
    target_service: SERVO_SERVICE_UUID,
};

pub const DEFAULT_CONFIG: ControlConfig = ControlConfig {
    servo: DEFAULT_SERVO_TIMING,
    supervisor: DEFAULT_SUPERVISOR,
    touch: DEFAULT_TOUCH,
    radio: DEFAULT_RADIO,
    arbitration: ArbitrationPolicy::Concurrent,
};
