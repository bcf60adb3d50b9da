//! I2C target serving the position mirror.
//!
//! Any read, with or without a preceding register write, returns
//! `[A%, B%]`. Writes are accepted and ignored.

use defmt::warn;
use embassy_rp::i2c::Instance;
use embassy_rp::i2c_slave::{Command, I2cSlave};
use servo_core::MirrorRegisters;

/// 7-bit bus address of the mirror.
pub const MIRROR_ADDRESS: u16 = 0x40;

/// Answer bus transactions forever.
pub async fn serve_mirror<T: Instance>(target: &mut I2cSlave<'_, T>, regs: &MirrorRegisters) -> ! {
    let mut buf = [0u8; 4];
    loop {
        match target.listen(&mut buf).await {
            Ok(Command::Read) | Ok(Command::WriteRead(_)) => {
                if let Err(e) = target.respond_and_fill(&regs.snapshot(), 0x00).await {
                    warn!("mirror read aborted: {:?}", e);
                }
            }
            Ok(Command::Write(_)) | Ok(Command::GeneralCall(_)) => {}
            Err(e) => warn!("mirror bus error: {:?}", e),
        }
    }
}
