//! Radio bridge.
//!
//! The wireless stack runs its own event machinery. Its interrupt handler
//! only calls [`CountingSignal::give`]; the link task wakes once per give,
//! asks the stack to process what is pending, and drains the resulting
//! [`RadioEvent`]s. All stack calls happen in task context.
//!
//! Two roles share the bring-up sequence in [`StackDriver`]:
//! - [`PeripheralLink`]: the actuator side. Exposes the positions as
//!   attributes, turns peer writes into commands and notifies subscribers.
//! - [`CentralLink`]: the remote-control side. Scans for the servo service,
//!   connects, and forwards locally queued commands as remote writes.

mod attributes;
mod central;
mod peripheral;

#[cfg(test)]
pub(crate) mod mock;

pub use attributes::{AttributeRole, AttributeStore, Publish, ServoAttributes, DEFAULT_ATTRIBUTES};
pub use central::CentralLink;
pub use peripheral::PeripheralLink;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};
use heapless::Vec;
use servo_proto::MAX_ADV_PAYLOAD;

use crate::semaphore::CountingSignal;

/// Largest attribute value carried in an event.
pub const MAX_ATTR_LEN: usize = 20;

pub type AttrData = Vec<u8, MAX_ATTR_LEN>;
pub type AdvPayload = Vec<u8, MAX_ADV_PAYLOAD>;

/// Bluetooth device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BdAddr(pub [u8; 6]);

/// Attribute handles found on the remote servo service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RemoteHandles {
    pub absolute: [u16; 2],
    pub relative: [u16; 2],
}

/// Events delivered by the stack after [`RadioStack::process_pending_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioEvent {
    StackReady,
    Connected,
    Disconnected,
    /// A peer wrote one of our attributes.
    AttributeWrite { handle: u16, data: AttrData },
    ScanResult { address: BdAddr, payload: AdvPayload },
    DiscoveryComplete(RemoteHandles),
    WriteResponseOk,
    WriteResponseError { code: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Idle,
    Advertising,
    Scanning,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioError {
    NotConnected,
    /// Handle not present in the attribute table.
    InvalidHandle,
    /// Stack cannot accept the request right now.
    Busy,
    /// Vendor status code.
    Stack(u8),
}

/// Role-independent stack control.
pub trait RadioStack {
    fn start(&mut self) -> Result<(), RadioError>;
    /// Install the function the stack's interrupt calls. It must only wake
    /// the link task.
    fn register_interrupt_notify(&mut self, notify: fn());
    fn process_pending_events(&mut self);
    fn poll_event(&mut self) -> Option<RadioEvent>;
    fn connection_state(&self) -> ConnectionState;
}

/// Attribute server operations.
pub trait PeripheralStack: RadioStack {
    fn start_advertising(&mut self) -> Result<(), RadioError>;
    /// Update a local attribute value on behalf of this device.
    fn write_local_attribute(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError>;
    /// Commit a value the peer wrote, without generating outbound traffic.
    fn write_attribute_from_peer(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError>;
    fn send_notification(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError>;
}

/// Attribute client operations.
pub trait CentralStack: RadioStack {
    fn start_scan(&mut self) -> Result<(), RadioError>;
    fn stop_scan(&mut self) -> Result<(), RadioError>;
    fn connect(&mut self, address: BdAddr) -> Result<(), RadioError>;
    /// Drop the current connection. Completion is reported as
    /// [`RadioEvent::Disconnected`].
    fn disconnect(&mut self) -> Result<(), RadioError>;
    fn discover(&mut self) -> Result<(), RadioError>;
    fn write_remote(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    StackStarting,
    WaitingForReady,
    EventLoop,
}

/// Owns the stack and walks it from power-up to the event loop.
pub struct StackDriver<'a, M: RawMutex, S> {
    stack: S,
    irq: &'a CountingSignal<M>,
    on_interrupt: fn(),
    ready_poll: Duration,
    state: LinkState,
}

impl<'a, M: RawMutex, S: RadioStack> StackDriver<'a, M, S> {
    /// `on_interrupt` is handed to the stack and must give `irq`.
    pub fn new(stack: S, irq: &'a CountingSignal<M>, on_interrupt: fn(), ready_poll: Duration) -> Self {
        Self {
            stack,
            irq,
            on_interrupt,
            ready_poll,
            state: LinkState::StackStarting,
        }
    }

    /// Current bring-up state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Borrow the stack.
    pub fn stack(&self) -> &S {
        &self.stack
    }

    /// Mutably borrow the stack.
    pub fn stack_mut(&mut self) -> &mut S {
        &mut self.stack
    }

    /// Signal given by the stack interrupt.
    pub fn irq(&self) -> &'a CountingSignal<M> {
        self.irq
    }

    /// Start the stack and poll until it reports ready.
    pub async fn bring_up(&mut self) -> Result<(), RadioError> {
        loop {
            match self.state {
                LinkState::StackStarting => {
                    self.stack.register_interrupt_notify(self.on_interrupt);
                    self.stack.start()?;
                    self.state = LinkState::WaitingForReady;
                }
                LinkState::WaitingForReady => {
                    if self.poll_ready() {
                        info!("radio stack ready");
                        self.state = LinkState::EventLoop;
                    } else {
                        Timer::after(self.ready_poll).await;
                    }
                }
                LinkState::EventLoop => return Ok(()),
            }
        }
    }

    /// Events queued behind `StackReady` stay in the stack for the link to
    /// drain once it is running.
    fn poll_ready(&mut self) -> bool {
        // wakeups raised during start-up are consumed here
        while self.irq.try_take() {}
        self.stack.process_pending_events();
        while let Some(event) = self.stack.poll_event() {
            match event {
                RadioEvent::StackReady => return true,
                other => debug!("event before ready: {:?}", other),
            }
        }
        false
    }
}
