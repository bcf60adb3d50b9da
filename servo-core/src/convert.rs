//! Percent <-> timer compare conversion.
//!
//! Two affine stages: percent to pulse width in microseconds, then pulse
//! width to timer ticks. The reverse path rounds to the nearest percent, so
//! every compare value produced from a valid percent converts back to that
//! same percent.

use crate::config::ServoTiming;
use crate::types::{PERCENT_MAX, PERCENT_MIN};

/// Clamp an intermediate result into `0..=100`.
#[inline]
#[must_use]
pub fn clamp_percent(value: i32) -> u8 {
    value.clamp(PERCENT_MIN as i32, PERCENT_MAX as i32) as u8
}

/// Percent to pulse width. Inputs above 100 are treated as 100.
#[must_use]
pub fn percent_to_pulse_us(timing: &ServoTiming, percent: u8) -> u16 {
    let percent = percent.min(PERCENT_MAX) as u32;
    let span = (timing.max_pulse_us - timing.min_pulse_us) as u32;
    let offset = (span * percent + PERCENT_MAX as u32 / 2) / PERCENT_MAX as u32;
    timing.min_pulse_us + offset as u16
}

/// Pulse width to timer ticks.
#[inline]
#[must_use]
pub fn pulse_us_to_ticks(timing: &ServoTiming, pulse_us: u16) -> u16 {
    (pulse_us as u32 * timing.ticks_per_us as u32).min(u16::MAX as u32) as u16
}

/// Percent to timer compare value.
#[inline]
#[must_use]
pub fn percent_to_compare(timing: &ServoTiming, percent: u8) -> u16 {
    pulse_us_to_ticks(timing, percent_to_pulse_us(timing, percent))
}

/// Timer compare value to percent, rounded and clamped to `0..=100`.
#[must_use]
pub fn compare_to_percent(timing: &ServoTiming, ticks: u16) -> u8 {
    let tpu = timing.ticks_per_us as u32;
    let min_ticks = timing.min_pulse_us as u32 * tpu;
    let span_ticks = (timing.max_pulse_us - timing.min_pulse_us) as u32 * tpu;
    let ticks = ticks as u32;
    if ticks <= min_ticks {
        return PERCENT_MIN;
    }
    let percent = ((ticks - min_ticks) * PERCENT_MAX as u32 + span_ticks / 2) / span_ticks;
    clamp_percent(percent as i32)
}
