//! LIS3DH accelerometer over async I2C.

use embedded_hal_async::i2c::I2c;
use servo_core::{AccelSample, Accelerometer, SensorError};

const ADDRESS: u8 = 0x18;

const WHO_AM_I: u8 = 0x0F;
const WHO_AM_I_VALUE: u8 = 0x33;
const CTRL_REG1: u8 = 0x20;
const CTRL_REG4: u8 = 0x23;
const OUT_X_L: u8 = 0x28;
/// Register auto-increment on multi-byte reads.
const AUTO_INCREMENT: u8 = 0x80;

/// 100 Hz, normal mode, X/Y/Z enabled.
const CTRL_REG1_100HZ_XYZ: u8 = 0x57;
/// Block data update, +-2 g, high resolution.
const CTRL_REG4_BDU_2G_HR: u8 = 0x88;

/// Counts per g at +-2 g, left-justified 16-bit output.
pub const FULL_SCALE_COUNTS: i16 = 16_384;

pub struct Lis3dh<I> {
    i2c: I,
}

impl<I: I2c> Lis3dh<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Check the device id and start continuous conversion.
    pub async fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[WHO_AM_I], &mut id)
            .await
            .map_err(|_| SensorError::Bus)?;
        if id[0] != WHO_AM_I_VALUE {
            return Err(SensorError::NotPresent);
        }
        for (reg, value) in [(CTRL_REG1, CTRL_REG1_100HZ_XYZ), (CTRL_REG4, CTRL_REG4_BDU_2G_HR)] {
            self.i2c
                .write(ADDRESS, &[reg, value])
                .await
                .map_err(|_| SensorError::Bus)?;
        }
        Ok(())
    }
}

impl<I: I2c> Accelerometer for Lis3dh<I> {
    async fn read_acceleration(&mut self) -> Result<AccelSample, SensorError> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(ADDRESS, &[OUT_X_L | AUTO_INCREMENT], &mut raw)
            .await
            .map_err(|_| SensorError::Bus)?;
        Ok(AccelSample {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        })
    }
}
