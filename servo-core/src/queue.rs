//! Bounded command queue between producers and the actuator task.
//!
//! Producers never block: when the queue is full the new command is handed
//! back and dropped. The actuator task is the single consumer.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::types::PositionCommand;

/// Default queue depth.
pub const QUEUE_CAPACITY: usize = 8;

/// A command rejected because the queue was full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandDropped(pub PositionCommand);

/// FIFO of [`PositionCommand`]s shared by all producers.
pub struct CommandQueue<M: RawMutex, const N: usize = QUEUE_CAPACITY> {
    channel: Channel<M, PositionCommand, N>,
}

impl<M: RawMutex, const N: usize> CommandQueue<M, N> {
    /// Empty queue.
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Append without waiting. A full queue drops `cmd`.
    pub fn enqueue(&self, cmd: PositionCommand) -> Result<(), CommandDropped> {
        match self.channel.try_send(cmd) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(cmd)) => {
                debug!("command queue full, dropping {:?}", cmd);
                Err(CommandDropped(cmd))
            }
        }
    }

    /// Wait for the oldest command.
    pub async fn dequeue(&self) -> PositionCommand {
        self.channel.receive().await
    }

    /// Take the oldest command if one is waiting.
    pub fn try_dequeue(&self) -> Option<PositionCommand> {
        self.channel.try_receive().ok()
    }

    /// Commands currently queued.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// `true` if no command is queued.
    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<M: RawMutex, const N: usize> Default for CommandQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
