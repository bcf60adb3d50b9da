//! Inertial mode supervisor.
//!
//! Tilting the device takes control away from the touch slider: while any
//! axis deviates from level, both actuators follow the tilt angles. After a
//! quiet period without movement, control returns to touch.

use core::f32::consts::PI;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Instant, Timer};

use crate::config::SupervisorConfig;
use crate::events::EventFlags;
use crate::ports::{AccelSample, Accelerometer, SensorError};
use crate::queue::CommandQueue;
use crate::types::{ActuatorId, InputMode, PositionCommand};

/// Degrees of tilt per percentage point.
const DEGREES_PER_PERCENT: f32 = 1.8;

/// Map one acceleration axis to a percentage.
///
/// The axis is normalised to g and clamped to ±1 g; level (0 g) maps to
/// 50 %, +1 g to 0 % and -1 g to 100 %.
pub fn tilt_percent(counts: i16, full_scale_counts: i16) -> f32 {
    let g = (counts as f32 / full_scale_counts as f32).clamp(-1.0, 1.0);
    libm::acosf(g) * 360.0 / (2.0 * PI * DEGREES_PER_PERCENT)
}

/// Time-debounced movement detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionDebounce {
    last_movement: Option<Instant>,
}

impl MotionDebounce {
    pub const fn new() -> Self {
        Self { last_movement: None }
    }

    /// Feed one pair of percentages taken at `now` and return the mode.
    pub fn update(&mut self, config: &SupervisorConfig, percents: [f32; 2], now: Instant) -> InputMode {
        let moved = percents
            .iter()
            .any(|p| libm::fabsf(p - config.neutral_percent) > config.movement_threshold);
        if moved {
            self.last_movement = Some(now);
        }
        match self.last_movement {
            Some(t) if now.saturating_duration_since(t) <= config.quiet_period => InputMode::Motion,
            _ => InputMode::Touch,
        }
    }
}

pub struct ModeSupervisor<'a, M: RawMutex, A> {
    sensor: A,
    queue: &'a CommandQueue<M>,
    flags: &'a EventFlags<M>,
    config: SupervisorConfig,
    debounce: MotionDebounce,
}

impl<'a, M: RawMutex, A: Accelerometer> ModeSupervisor<'a, M, A> {
    pub fn new(
        sensor: A,
        queue: &'a CommandQueue<M>,
        flags: &'a EventFlags<M>,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            sensor,
            queue,
            flags,
            config,
            debounce: MotionDebounce::new(),
        }
    }

    pub async fn run(&mut self) -> ! {
        loop {
            let _ = self.sample_once(Instant::now()).await;
            Timer::after(self.config.poll_interval).await;
        }
    }

    /// Read the sensor once and act on the sample.
    pub async fn sample_once(&mut self, now: Instant) -> Result<InputMode, SensorError> {
        let sample = self.sensor.read_acceleration().await.map_err(|e| {
            warn!("accelerometer read failed: {:?}", e);
            e
        })?;
        Ok(self.on_sample(sample, now))
    }

    /// Update the mode from one sample and, in motion mode, command both
    /// actuators from the tilt angles.
    pub fn on_sample(&mut self, sample: AccelSample, now: Instant) -> InputMode {
        let fs = self.config.full_scale_counts;
        let percents = [tilt_percent(sample.x, fs), tilt_percent(sample.y, fs)];
        let mode = self.debounce.update(&self.config, percents, now);

        if self.flags.set_mode(mode) {
            info!("input mode -> {}", mode.label());
        }

        if mode == InputMode::Motion {
            for (id, p) in ActuatorId::ALL.into_iter().zip(percents) {
                let amount = libm::roundf(p) as i16;
                let _ = self.queue.enqueue(PositionCommand::absolute(id, amount));
            }
        }
        mode
    }
}
