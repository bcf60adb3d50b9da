//! UART console task.
//!
//! Single keystrokes nudge the actuators; `p` prints a status line read
//! back from the compare registers and `?` prints the key map.

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;
use servo_proto::{parse_key, write_status, ConsoleCommand, HELP_TEXT};

use crate::actuator::read_percent;
use crate::config::ServoTiming;
use crate::events::EventFlags;
use crate::ports::{Console, ConsoleError, ServoReadback};
use crate::queue::CommandQueue;
use crate::types::{ActuatorId, PositionCommand};

const STATUS_LINE_LEN: usize = 48;

pub struct ConsoleTask<'a, M: RawMutex, C, R> {
    console: C,
    servos: R,
    timing: ServoTiming,
    queue: &'a CommandQueue<M>,
    flags: &'a EventFlags<M>,
}

impl<'a, M: RawMutex, C: Console, R: ServoReadback> ConsoleTask<'a, M, C, R> {
    pub fn new(
        console: C,
        servos: R,
        timing: ServoTiming,
        queue: &'a CommandQueue<M>,
        flags: &'a EventFlags<M>,
    ) -> Self {
        Self {
            console,
            servos,
            timing,
            queue,
            flags,
        }
    }

    pub async fn run(&mut self) -> ! {
        let _ = self.console.write(HELP_TEXT.as_bytes()).await;
        loop {
            if let Err(e) = self.process_one().await {
                warn!("console error: {:?}", e);
            }
        }
    }

    /// Read and act on one keystroke.
    pub async fn process_one(&mut self) -> Result<Option<ConsoleCommand>, ConsoleError> {
        let byte = self.console.read_byte().await?;
        let Some(cmd) = parse_key(byte) else {
            return Ok(None);
        };
        debug!("console: {:?}", cmd);

        match cmd {
            ConsoleCommand::Nudge { actuator, delta } => {
                let _ = self.queue.enqueue(PositionCommand::relative(actuator, delta as i16));
            }
            ConsoleCommand::Status => {
                let mut line: String<STATUS_LINE_LEN> = String::new();
                let a = read_percent(&self.servos, &self.timing, ActuatorId::A);
                let b = read_percent(&self.servos, &self.timing, ActuatorId::B);
                if write_status(&mut line, a, b, self.flags.mode().label()).is_ok() {
                    self.console.write(line.as_bytes()).await?;
                }
            }
            ConsoleCommand::Help => self.console.write(HELP_TEXT.as_bytes()).await?,
        }
        Ok(Some(cmd))
    }
}
