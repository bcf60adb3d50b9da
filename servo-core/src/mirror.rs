//! Two-byte register mirror of the actuator positions.
//!
//! An external bus master (I2C) reads `[A%, B%]`. The mirror task refreshes
//! the image whenever the actuator task reports a change.

use embassy_sync::blocking_mutex::raw::RawMutex;
use portable_atomic::{AtomicU8, Ordering};

use crate::actuator::read_percent;
use crate::config::ServoTiming;
use crate::events::{EventFlags, MIRROR_REFRESH};
use crate::ports::{MirrorSink, ServoReadback};
use crate::types::ActuatorId;

/// Register image shared with the bus responder.
pub struct MirrorRegisters {
    regs: [AtomicU8; 2],
}

impl MirrorRegisters {
    pub const fn new() -> Self {
        Self {
            regs: [AtomicU8::new(0), AtomicU8::new(0)],
        }
    }

    pub fn snapshot(&self) -> [u8; 2] {
        [
            self.regs[0].load(Ordering::Relaxed),
            self.regs[1].load(Ordering::Relaxed),
        ]
    }
}

impl Default for MirrorRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorSink for &MirrorRegisters {
    fn publish(&mut self, positions: [u8; 2]) {
        for (reg, value) in self.regs.iter().zip(positions) {
            reg.store(value, Ordering::Relaxed);
        }
    }
}

pub struct MirrorTask<'a, M: RawMutex, R, S> {
    servos: R,
    timing: ServoTiming,
    sink: S,
    flags: &'a EventFlags<M>,
}

impl<'a, M: RawMutex, R: ServoReadback, S: MirrorSink> MirrorTask<'a, M, R, S> {
    pub fn new(servos: R, timing: ServoTiming, sink: S, flags: &'a EventFlags<M>) -> Self {
        Self {
            servos,
            timing,
            sink,
            flags,
        }
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.process_one().await;
        }
    }

    /// Wait for a refresh request and republish both positions.
    pub async fn process_one(&mut self) -> [u8; 2] {
        self.flags.wait_and_clear(MIRROR_REFRESH).await;
        let positions = ActuatorId::ALL.map(|id| read_percent(&self.servos, &self.timing, id));
        self.sink.publish(positions);
        positions
    }
}
