//! Actuator-side radio link (attribute server).

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use servo_proto::{decode_absolute, decode_cccd, decode_relative, encode_percent};

use super::attributes::{AttributeRole, AttributeStore, Publish, ServoAttributes};
use super::{ConnectionState, PeripheralStack, RadioError, RadioEvent, StackDriver};
use crate::actuator::read_percent;
use crate::config::ServoTiming;
use crate::events::{EventFlags, RADIO_REFRESH};
use crate::ports::{ServoReadback, StatusIndicator};
use crate::queue::CommandQueue;
use crate::types::{ActuatorId, PositionCommand, WriteOrigin};

/// Bridges peer attribute writes into commands and actuator changes into
/// notifications.
pub struct PeripheralLink<'a, M: RawMutex, S, R, I> {
    driver: StackDriver<'a, M, S>,
    store: AttributeStore,
    servos: R,
    timing: ServoTiming,
    indicator: I,
    queue: &'a CommandQueue<M>,
    flags: &'a EventFlags<M>,
}

impl<'a, M, S, R, I> PeripheralLink<'a, M, S, R, I>
where
    M: RawMutex,
    S: PeripheralStack,
    R: ServoReadback,
    I: StatusIndicator,
{
    pub fn new(
        driver: StackDriver<'a, M, S>,
        attributes: ServoAttributes,
        servos: R,
        timing: ServoTiming,
        indicator: I,
        queue: &'a CommandQueue<M>,
        flags: &'a EventFlags<M>,
    ) -> Self {
        Self {
            driver,
            store: AttributeStore::new(attributes),
            servos,
            timing,
            indicator,
            queue,
            flags,
        }
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    pub fn stack(&self) -> &S {
        self.driver.stack()
    }

    pub fn stack_mut(&mut self) -> &mut S {
        self.driver.stack_mut()
    }

    /// Bring the stack up, start advertising and handle anything that
    /// arrived with the ready event.
    pub async fn start(&mut self) -> Result<(), RadioError> {
        self.driver.bring_up().await?;
        self.driver.stack_mut().start_advertising()?;
        info!("advertising");
        self.service_stack();
        Ok(())
    }

    pub async fn run(&mut self, retry: Duration) -> ! {
        while let Err(e) = self.start().await {
            error!("radio start failed: {:?}", e);
            Timer::after(retry).await;
        }
        loop {
            self.step().await;
        }
    }

    /// Wait for a stack interrupt or a position change and handle it.
    pub async fn step(&mut self) {
        let irq = self.driver.irq();
        let flags = self.flags;
        match select(irq.take(), flags.wait_and_clear(RADIO_REFRESH)).await {
            Either::First(()) => self.service_stack(),
            Either::Second(_) => self.publish_positions(),
        }
    }

    /// One processing pass: let the stack run, then handle every event.
    pub fn service_stack(&mut self) {
        self.driver.stack_mut().process_pending_events();
        while let Some(event) = self.driver.stack_mut().poll_event() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: RadioEvent) {
        match event {
            RadioEvent::Connected => {
                info!("peer connected");
                self.store.reset_subscriptions();
                self.indicator.set_connected(true);
            }
            RadioEvent::Disconnected => {
                info!("peer disconnected");
                self.indicator.set_connected(false);
                self.store.reset_subscriptions();
                if let Err(e) = self.driver.stack_mut().start_advertising() {
                    warn!("advertising restart failed: {:?}", e);
                }
            }
            RadioEvent::AttributeWrite { handle, data } => self.on_attribute_write(handle, &data),
            other => trace!("ignored {:?}", other),
        }
    }

    fn on_attribute_write(&mut self, handle: u16, data: &[u8]) {
        match self.store.map().classify(handle) {
            Some(AttributeRole::Absolute(id)) => {
                let Some(percent) = decode_absolute(data) else {
                    return;
                };
                let cmd = PositionCommand::absolute(id, percent as i16);
                let _ = self.queue.enqueue(cmd);
                let stack = self.driver.stack_mut();
                if let Err(e) = self
                    .store
                    .write_position(stack, id, cmd.amount() as u8, WriteOrigin::PeerInitiated)
                {
                    warn!("attribute update failed: {:?}", e);
                }
            }
            Some(AttributeRole::Relative(id)) => {
                if let Some(delta) = decode_relative(data) {
                    let _ = self.queue.enqueue(PositionCommand::relative(id, delta as i16));
                }
            }
            Some(AttributeRole::Subscription(id)) => {
                if let Some(enabled) = decode_cccd(data) {
                    debug!("notifications {:?} -> {}", id, enabled);
                    self.store.set_subscription(id, enabled);
                }
            }
            None => debug!("write to unknown handle {}", handle),
        }
    }

    /// Refresh both attributes from hardware and notify subscribers.
    pub fn publish_positions(&mut self) {
        let connected = self.driver.stack().connection_state() == ConnectionState::Connected;
        for id in ActuatorId::ALL {
            let percent = read_percent(&self.servos, &self.timing, id);
            let stack = self.driver.stack_mut();
            match self.store.write_position(stack, id, percent, WriteOrigin::LocallyInitiated) {
                Ok(Publish::Notify) if connected => {
                    let handle = self.store.map().absolute[id.index()];
                    if let Err(e) = stack.send_notification(handle, &encode_percent(percent)) {
                        warn!("notify {:?} failed: {:?}", id, e);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("attribute update failed: {:?}", e),
            }
        }
    }
}
