//! Remote-control side radio link (attribute client).
//!
//! On the remote-control board the central link is the consumer of the
//! command queue: instead of driving local actuators it writes each command
//! to the matching attribute of the connected servo service.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use servo_proto::{encode_percent, encode_relative, parse_advertisement};

use super::{CentralStack, RadioError, RadioEvent, RemoteHandles, StackDriver};
use crate::ports::StatusIndicator;
use crate::queue::CommandQueue;
use crate::types::{CommandKind, PositionCommand};

pub struct CentralLink<'a, M: RawMutex, S, I> {
    driver: StackDriver<'a, M, S>,
    indicator: I,
    queue: &'a CommandQueue<M>,
    target_service: [u8; 16],
    /// A connect request is outstanding.
    connecting: bool,
    connected: bool,
    remote: Option<RemoteHandles>,
}

impl<'a, M, S, I> CentralLink<'a, M, S, I>
where
    M: RawMutex,
    S: CentralStack,
    I: StatusIndicator,
{
    pub fn new(
        driver: StackDriver<'a, M, S>,
        indicator: I,
        queue: &'a CommandQueue<M>,
        target_service: [u8; 16],
    ) -> Self {
        Self {
            driver,
            indicator,
            queue,
            target_service,
            connecting: false,
            connected: false,
            remote: None,
        }
    }

    pub fn stack_mut(&mut self) -> &mut S {
        self.driver.stack_mut()
    }

    /// Handles of the connected servo service, once discovered.
    pub fn remote(&self) -> Option<RemoteHandles> {
        self.remote
    }

    /// Bring the stack up, start scanning and handle anything that arrived
    /// with the ready event.
    pub async fn start(&mut self) -> Result<(), RadioError> {
        self.driver.bring_up().await?;
        self.driver.stack_mut().start_scan()?;
        info!("scanning");
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

    /// Wait for a stack interrupt or a local command and handle it.
    pub async fn step(&mut self) {
        let irq = self.driver.irq();
        let queue = self.queue;
        match select(irq.take(), queue.dequeue()).await {
            Either::First(()) => self.service_stack(),
            Either::Second(cmd) => self.forward(cmd),
        }
    }

    pub fn service_stack(&mut self) {
        self.driver.stack_mut().process_pending_events();
        while let Some(event) = self.driver.stack_mut().poll_event() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: RadioEvent) {
        let stack = self.driver.stack_mut();
        let result = match event {
            RadioEvent::ScanResult { address, payload } => {
                if self.connecting || self.connected {
                    return;
                }
                let advert = parse_advertisement(&payload);
                if !advert.has_service(&self.target_service) {
                    return;
                }
                info!("found {:?} {:?}", address, advert.name_str());
                match stack.stop_scan() {
                    Ok(()) => match stack.connect(address) {
                        Ok(()) => {
                            self.connecting = true;
                            Ok(())
                        }
                        Err(e) => {
                            warn!("connect failed: {:?}, scanning again", e);
                            stack.start_scan()
                        }
                    },
                    Err(e) => Err(e),
                }
            }
            RadioEvent::Connected => {
                info!("connected, discovering");
                self.connecting = false;
                self.connected = true;
                self.indicator.set_connected(true);
                match stack.discover() {
                    Ok(()) => Ok(()),
                    // without handles nothing can be forwarded
                    Err(e) => {
                        warn!("discovery failed: {:?}, disconnecting", e);
                        stack.disconnect()
                    }
                }
            }
            RadioEvent::DiscoveryComplete(handles) => {
                debug!("remote handles {:?}", handles);
                self.remote = Some(handles);
                Ok(())
            }
            RadioEvent::Disconnected => {
                info!("disconnected, scanning");
                self.connecting = false;
                self.connected = false;
                self.remote = None;
                self.indicator.set_connected(false);
                stack.start_scan()
            }
            RadioEvent::WriteResponseOk => {
                trace!("write acknowledged");
                Ok(())
            }
            RadioEvent::WriteResponseError { code } => {
                warn!("remote write rejected: {}", code);
                Ok(())
            }
            other => {
                trace!("ignored {:?}", other);
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!("stack request failed: {:?}", e);
        }
    }

    /// Write one command to the remote service. Commands arriving before
    /// discovery completes are dropped.
    pub fn forward(&mut self, cmd: PositionCommand) {
        let Some(remote) = self.remote else {
            debug!("not connected, dropping {:?}", cmd);
            return;
        };
        let i = cmd.actuator().index();
        let result = match cmd.kind() {
            CommandKind::Absolute => self
                .driver
                .stack_mut()
                .write_remote(remote.absolute[i], &encode_percent(cmd.amount() as u8)),
            CommandKind::Relative => self
                .driver
                .stack_mut()
                .write_remote(remote.relative[i], &encode_relative(cmd.amount() as i8)),
        };
        if let Err(e) = result {
            warn!("remote write failed: {:?}", e);
        }
    }
}
