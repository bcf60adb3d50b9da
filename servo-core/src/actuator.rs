//! Actuator driver and the task that owns it.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::config::ServoTiming;
use crate::convert::{clamp_percent, compare_to_percent, percent_to_compare};
use crate::events::{EventFlags, ACTUATOR_CHANGED};
use crate::ports::{ServoOutput, ServoReadback};
use crate::queue::CommandQueue;
use crate::types::{ActuatorId, CommandKind, PositionCommand};

/// Current percentage of `id`, read back from the compare register.
pub fn read_percent<R: ServoReadback + ?Sized>(servos: &R, timing: &ServoTiming, id: ActuatorId) -> u8 {
    compare_to_percent(timing, servos.compare(id))
}

/// Applies commands to the two compare registers.
///
/// Holds no position state of its own: relative commands read the current
/// position back from hardware before adding.
pub struct ActuatorDriver<S> {
    servos: S,
    timing: ServoTiming,
}

impl<S: ServoOutput> ActuatorDriver<S> {
    pub fn new(servos: S, timing: ServoTiming) -> Self {
        Self { servos, timing }
    }

    pub fn percent(&self, id: ActuatorId) -> u8 {
        read_percent(&self.servos, &self.timing, id)
    }

    /// Apply one command and return the resulting percentage.
    ///
    /// Relative amounts are added before clamping, so +60 from 60 lands on
    /// 100 rather than being rejected.
    pub fn apply(&mut self, cmd: PositionCommand) -> u8 {
        let id = cmd.actuator();
        let target = match cmd.kind() {
            CommandKind::Absolute => clamp_percent(cmd.amount() as i32),
            CommandKind::Relative => {
                clamp_percent(self.percent(id) as i32 + cmd.amount() as i32)
            }
        };
        let ticks = percent_to_compare(&self.timing, target);
        self.servos.set_compare(id, ticks);
        trace!("actuator {:?} -> {}% ({} ticks)", id, target, ticks);
        target
    }

    pub fn servos(&self) -> &S {
        &self.servos
    }

    pub fn into_inner(self) -> S {
        self.servos
    }
}

/// Drains the command queue into the actuator driver.
pub struct ActuatorTask<'a, M: RawMutex, S> {
    driver: ActuatorDriver<S>,
    queue: &'a CommandQueue<M>,
    flags: &'a EventFlags<M>,
}

impl<'a, M: RawMutex, S: ServoOutput> ActuatorTask<'a, M, S> {
    pub fn new(driver: ActuatorDriver<S>, queue: &'a CommandQueue<M>, flags: &'a EventFlags<M>) -> Self {
        Self { driver, queue, flags }
    }

    /// Announce the initial positions, then apply commands forever.
    pub async fn run(&mut self) -> ! {
        self.flags.set(ACTUATOR_CHANGED);
        loop {
            self.process_one().await;
        }
    }

    /// Wait for one command, apply it and signal the change.
    pub async fn process_one(&mut self) -> u8 {
        let cmd = self.queue.dequeue().await;
        let percent = self.driver.apply(cmd);
        self.flags.set(ACTUATOR_CHANGED);
        percent
    }

    pub fn driver(&self) -> &ActuatorDriver<S> {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SERVO_TIMING;
    use crate::events::{MIRROR_REFRESH, RADIO_REFRESH};
    use crate::test_util::{block_on, poll_once, MockServos};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    fn driver_at(percent: u8) -> ActuatorDriver<MockServos> {
        ActuatorDriver::new(MockServos::at(percent), DEFAULT_SERVO_TIMING)
    }

    #[test]
    fn test_relative_clamps_after_add() {
        let mut driver = driver_at(50);
        assert_eq!(driver.apply(PositionCommand::relative(ActuatorId::A, 10)), 60);
        assert_eq!(driver.apply(PositionCommand::relative(ActuatorId::A, 60)), 100);
        assert_eq!(driver.percent(ActuatorId::A), 100);
        assert_eq!(driver.percent(ActuatorId::B), 50);
    }

    #[test]
    fn test_relative_clamps_at_zero() {
        let mut driver = driver_at(5);
        assert_eq!(driver.apply(PositionCommand::relative(ActuatorId::B, -10)), 0);
    }

    #[test]
    fn test_absolute_is_idempotent() {
        let mut driver = driver_at(0);
        let cmd = PositionCommand::absolute(ActuatorId::B, 73);
        driver.apply(cmd);
        let once = driver.servos().compare(ActuatorId::B);
        driver.apply(cmd);
        assert_eq!(driver.servos().compare(ActuatorId::B), once);
        assert_eq!(driver.percent(ActuatorId::B), 73);
    }

    #[test]
    fn test_burst_stays_in_range() {
        let mut driver = driver_at(50);
        let deltas = [100, 100, -100, -100, -100, 37, 100, -3];
        for d in deltas {
            let p = driver.apply(PositionCommand::relative(ActuatorId::A, d));
            assert!(p <= 100);
        }
        assert_eq!(driver.percent(ActuatorId::A), 97);
    }

    #[test]
    fn test_task_applies_in_order_and_signals() {
        let queue: CommandQueue<NoopRawMutex> = CommandQueue::new();
        let flags: EventFlags<NoopRawMutex> = EventFlags::new();
        let servos = MockServos::at(50);
        let mut task = ActuatorTask::new(
            ActuatorDriver::new(servos.clone(), DEFAULT_SERVO_TIMING),
            &queue,
            &flags,
        );

        queue.enqueue(PositionCommand::absolute(ActuatorId::A, 20)).unwrap();
        queue.enqueue(PositionCommand::relative(ActuatorId::A, 5)).unwrap();

        assert_eq!(block_on(task.process_one()), 20);
        assert_eq!(flags.get(), RADIO_REFRESH | MIRROR_REFRESH);
        flags.clear(ACTUATOR_CHANGED);
        assert_eq!(block_on(task.process_one()), 25);
        assert_eq!(servos.percent(ActuatorId::A), 25);
        assert_eq!(flags.get(), ACTUATOR_CHANGED);

        flags.clear(ACTUATOR_CHANGED);
        assert!(poll_once(task.process_one()).is_pending());
        assert_eq!(flags.get(), 0);
    }
}
