//! Scripted radio stack for unit tests.

extern crate std;

use std::collections::VecDeque;
use std::vec::Vec;

use super::{
    AdvPayload, AttrData, BdAddr, CentralStack, ConnectionState, PeripheralStack, RadioError,
    RadioEvent, RadioStack,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Start,
    StartAdvertising,
    LocalWrite(u16, u8),
    PeerWrite(u16, u8),
    Notify(u16, u8),
    StartScan,
    StopScan,
    Connect(BdAddr),
    Disconnect,
    Discover,
    RemoteWrite(u16, u8),
}

pub struct MockStack {
    pub calls: Vec<Call>,
    pub state: ConnectionState,
    pub fail_writes: Option<RadioError>,
    pub fail_connect: Option<RadioError>,
    pub fail_discover: Option<RadioError>,
    /// Raised but not yet processed.
    staged: VecDeque<RadioEvent>,
    ready: VecDeque<RadioEvent>,
    notify: Option<fn()>,
}

impl MockStack {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            state: ConnectionState::Idle,
            fail_writes: None,
            fail_connect: None,
            fail_discover: None,
            staged: VecDeque::new(),
            ready: VecDeque::new(),
            notify: None,
        }
    }

    /// Queue an event and fire the stack interrupt.
    pub fn raise(&mut self, event: RadioEvent) {
        match event {
            RadioEvent::Connected => self.state = ConnectionState::Connected,
            RadioEvent::Disconnected => self.state = ConnectionState::Idle,
            _ => {}
        }
        self.staged.push_back(event);
        if let Some(notify) = self.notify {
            notify();
        }
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        core::mem::take(&mut self.calls)
    }

    fn write(&mut self, call: Call) -> Result<(), RadioError> {
        if let Some(e) = self.fail_writes {
            return Err(e);
        }
        self.calls.push(call);
        Ok(())
    }
}

pub fn attr(bytes: &[u8]) -> AttrData {
    AttrData::from_slice(bytes).unwrap()
}

pub fn adv(bytes: &[u8]) -> AdvPayload {
    AdvPayload::from_slice(bytes).unwrap()
}

impl RadioStack for MockStack {
    fn start(&mut self) -> Result<(), RadioError> {
        self.calls.push(Call::Start);
        Ok(())
    }

    fn register_interrupt_notify(&mut self, notify: fn()) {
        self.notify = Some(notify);
    }

    fn process_pending_events(&mut self) {
        self.ready.extend(self.staged.drain(..));
    }

    fn poll_event(&mut self) -> Option<RadioEvent> {
        self.ready.pop_front()
    }

    fn connection_state(&self) -> ConnectionState {
        self.state
    }
}

impl PeripheralStack for MockStack {
    fn start_advertising(&mut self) -> Result<(), RadioError> {
        self.state = ConnectionState::Advertising;
        self.calls.push(Call::StartAdvertising);
        Ok(())
    }

    fn write_local_attribute(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError> {
        self.write(Call::LocalWrite(handle, data[0]))
    }

    fn write_attribute_from_peer(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError> {
        self.write(Call::PeerWrite(handle, data[0]))
    }

    fn send_notification(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError> {
        self.write(Call::Notify(handle, data[0]))
    }
}

impl CentralStack for MockStack {
    fn start_scan(&mut self) -> Result<(), RadioError> {
        self.state = ConnectionState::Scanning;
        self.calls.push(Call::StartScan);
        Ok(())
    }

    fn stop_scan(&mut self) -> Result<(), RadioError> {
        self.state = ConnectionState::Idle;
        self.calls.push(Call::StopScan);
        Ok(())
    }

    fn connect(&mut self, address: BdAddr) -> Result<(), RadioError> {
        if let Some(e) = self.fail_connect {
            return Err(e);
        }
        self.state = ConnectionState::Connecting;
        self.calls.push(Call::Connect(address));
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), RadioError> {
        self.calls.push(Call::Disconnect);
        Ok(())
    }

    fn discover(&mut self) -> Result<(), RadioError> {
        if let Some(e) = self.fail_discover {
            return Err(e);
        }
        self.calls.push(Call::Discover);
        Ok(())
    }

    fn write_remote(&mut self, handle: u16, data: &[u8]) -> Result<(), RadioError> {
        self.write(Call::RemoteWrite(handle, data[0]))
    }
}
