//! Capacitive touch input: one slider, two channel-select buttons.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Timer;

use crate::config::{ArbitrationPolicy, TouchConfig};
use crate::events::EventFlags;
use crate::ports::{TouchSensor, SLIDER_NOT_TOUCHED};
use crate::queue::CommandQueue;
use crate::types::{ActuatorId, InputMode, PositionCommand, PERCENT_MAX};

pub struct TouchInput<'a, M: RawMutex, T> {
    sensor: T,
    queue: &'a CommandQueue<M>,
    flags: &'a EventFlags<M>,
    config: TouchConfig,
    policy: ArbitrationPolicy,
    selected: ActuatorId,
}

impl<'a, M: RawMutex, T: TouchSensor> TouchInput<'a, M, T> {
    pub fn new(
        sensor: T,
        queue: &'a CommandQueue<M>,
        flags: &'a EventFlags<M>,
        config: TouchConfig,
        policy: ArbitrationPolicy,
    ) -> Self {
        Self {
            sensor,
            queue,
            flags,
            config,
            policy,
            selected: ActuatorId::A,
        }
    }

    /// Actuator the slider currently drives.
    pub fn selected(&self) -> ActuatorId {
        self.selected
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.scan_cycle().await;
            Timer::after(self.config.cycle_interval).await;
        }
    }

    /// One scan, process, act cycle. Returns the command enqueued, if any.
    pub async fn scan_cycle(&mut self) -> Option<PositionCommand> {
        self.sensor.start_scan();
        while self.sensor.is_busy() {
            Timer::after(self.config.busy_retry).await;
        }
        let cmd = self.process();
        self.sensor.update_baselines();
        cmd
    }

    /// Evaluate a completed scan.
    ///
    /// Buttons are checked A then B, so B wins when both read active.
    pub fn process(&mut self) -> Option<PositionCommand> {
        let cfg = self.config;
        for widget in [cfg.slider_widget, cfg.button_a_widget, cfg.button_b_widget] {
            self.sensor.process_widget(widget);
        }

        if self.sensor.is_button_active(cfg.button_a_widget) {
            self.selected = ActuatorId::A;
        }
        if self.sensor.is_button_active(cfg.button_b_widget) {
            self.selected = ActuatorId::B;
        }

        let centroid = self.sensor.centroid(cfg.slider_widget);
        if centroid == SLIDER_NOT_TOUCHED {
            return None;
        }

        if self.policy == ArbitrationPolicy::MotionPreemptsTouch && self.flags.mode() == InputMode::Motion {
            trace!("touch ignored while in motion mode");
            return None;
        }

        let resolution = cfg.slider_resolution.max(1) as u32;
        let percent = (centroid.min(cfg.slider_resolution) as u32 * PERCENT_MAX as u32 + resolution / 2) / resolution;
        let cmd = PositionCommand::absolute(self.selected, percent as i16);
        self.queue.enqueue(cmd).ok()?;
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::DEFAULT_TOUCH;
    use crate::test_util::{block_on, poll_pinned};
    use core::cell::Cell;
    use core::pin::pin;
    use core::task::Poll;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_time::MockDriver;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockTouch {
        centroid: u16,
        button_a: bool,
        button_b: bool,
        /// Remaining `is_busy` calls that report a scan in progress.
        busy_for: Cell<u32>,
        busy_checks: Rc<Cell<u32>>,
        calls: Vec<&'static str>,
    }

    impl MockTouch {
        fn slider(centroid: u16) -> Self {
            Self {
                centroid,
                ..Default::default()
            }
        }
    }

    impl TouchSensor for MockTouch {
        fn start_scan(&mut self) {
            self.calls.push("start");
        }
        fn is_busy(&self) -> bool {
            self.busy_checks.set(self.busy_checks.get() + 1);
            let left = self.busy_for.get();
            self.busy_for.set(left.saturating_sub(1));
            left > 0
        }
        fn process_widget(&mut self, _widget: u8) {}
        fn centroid(&self, _widget: u8) -> u16 {
            self.centroid
        }
        fn is_button_active(&self, widget: u8) -> bool {
            match widget {
                1 => self.button_a,
                2 => self.button_b,
                _ => false,
            }
        }
        fn update_baselines(&mut self) {
            self.calls.push("baseline");
        }
    }

    fn input<'a>(
        sensor: MockTouch,
        queue: &'a CommandQueue<NoopRawMutex>,
        flags: &'a EventFlags<NoopRawMutex>,
        policy: ArbitrationPolicy,
    ) -> TouchInput<'a, NoopRawMutex, MockTouch> {
        TouchInput::new(sensor, queue, flags, DEFAULT_TOUCH, policy)
    }

    #[test]
    fn test_not_touched_emits_nothing_but_recalibrates() {
        let queue = CommandQueue::new();
        let flags = EventFlags::new();
        let mut touch = input(MockTouch::slider(SLIDER_NOT_TOUCHED), &queue, &flags, ArbitrationPolicy::Concurrent);
        assert_eq!(block_on(touch.scan_cycle()), None);
        assert!(queue.is_empty());
        assert_eq!(touch.sensor.calls, ["start", "baseline"]);
    }

    #[test]
    fn test_busy_scan_sleeps_between_checks() {
        let clock = MockDriver::get();
        let queue = CommandQueue::new();
        let flags = EventFlags::new();
        let checks = Rc::new(Cell::new(0));
        let mut sensor = MockTouch::slider(30);
        sensor.busy_for.set(2);
        sensor.busy_checks = checks.clone();
        let mut touch = input(sensor, &queue, &flags, ArbitrationPolicy::Concurrent);
        let retry = touch.config.busy_retry;

        {
            let mut cycle = pin!(touch.scan_cycle());
            assert!(poll_pinned(cycle.as_mut()).is_pending());
            assert_eq!(checks.get(), 1);
            // not re-checked until the retry delay has passed
            assert!(poll_pinned(cycle.as_mut()).is_pending());
            assert_eq!(checks.get(), 1);

            clock.advance(retry);
            assert!(poll_pinned(cycle.as_mut()).is_pending());
            assert_eq!(checks.get(), 2);

            clock.advance(retry);
            let expected = PositionCommand::absolute(ActuatorId::A, 30);
            assert_eq!(poll_pinned(cycle.as_mut()), Poll::Ready(Some(expected)));
            assert_eq!(checks.get(), 3);
        }
        assert_eq!(touch.sensor.calls, ["start", "baseline"]);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_slider_drives_selected_channel() {
        let queue = CommandQueue::new();
        let flags = EventFlags::new();
        let mut touch = input(MockTouch::slider(42), &queue, &flags, ArbitrationPolicy::Concurrent);
        let expected = PositionCommand::absolute(ActuatorId::A, 42);
        assert_eq!(block_on(touch.scan_cycle()), Some(expected));
        assert_eq!(queue.try_dequeue(), Some(expected));

        touch.sensor.button_b = true;
        touch.process();
        touch.sensor.button_b = false;
        // selection sticks after release
        assert_eq!(touch.process(), Some(PositionCommand::absolute(ActuatorId::B, 42)));
        assert_eq!(touch.selected(), ActuatorId::B);
    }

    #[test]
    fn test_both_buttons_select_b() {
        let queue = CommandQueue::new();
        let flags = EventFlags::new();
        let mut sensor = MockTouch::slider(SLIDER_NOT_TOUCHED);
        sensor.button_a = true;
        sensor.button_b = true;
        let mut touch = input(sensor, &queue, &flags, ArbitrationPolicy::Concurrent);
        touch.process();
        assert_eq!(touch.selected(), ActuatorId::B);
    }

    #[test]
    fn test_arbitration_policy() {
        let queue = CommandQueue::new();
        let flags = EventFlags::new();
        flags.set_mode(InputMode::Motion);

        let mut concurrent = input(MockTouch::slider(80), &queue, &flags, ArbitrationPolicy::Concurrent);
        assert!(concurrent.process().is_some());

        let mut gated = input(MockTouch::slider(80), &queue, &flags, ArbitrationPolicy::MotionPreemptsTouch);
        assert_eq!(gated.process(), None);
        flags.set_mode(InputMode::Touch);
        assert!(gated.process().is_some());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_resolution_scaling() {
        let queue = CommandQueue::new();
        let flags = EventFlags::new();
        let mut touch = input(MockTouch::slider(127), &queue, &flags, ArbitrationPolicy::Concurrent);
        touch.config.slider_resolution = 255;
        assert_eq!(touch.process(), Some(PositionCommand::absolute(ActuatorId::A, 50)));
    }
}
