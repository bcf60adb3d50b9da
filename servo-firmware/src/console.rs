//! UART console.
//!
//! # Pins
//!
//! Uses UART1 at 115200 8N1:
//! - GPIO 8: TX
//! - GPIO 9: RX

use embassy_rp::uart::{Async, Error as UartError, Uart};
use servo_core::{Console, ConsoleError};

/// Convert UART errors to [`ConsoleError`].
///
/// A helper function instead of a `From` impl, both types are foreign here.
#[inline]
fn uart_error_to_console_error(e: UartError) -> ConsoleError {
    match e {
        UartError::Framing => ConsoleError::Framing,
        UartError::Overrun => ConsoleError::Overrun,
        _ => ConsoleError::Io,
    }
}

pub struct UartConsole<'d> {
    uart: Uart<'d, Async>,
}

impl<'d> UartConsole<'d> {
    #[must_use]
    pub fn new(uart: Uart<'d, Async>) -> Self {
        Self { uart }
    }
}

impl Console for UartConsole<'_> {
    async fn read_byte(&mut self) -> Result<u8, ConsoleError> {
        let mut byte = [0u8; 1];
        self.uart
            .read(&mut byte)
            .await
            .map_err(uart_error_to_console_error)?;
        Ok(byte[0])
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), ConsoleError> {
        self.uart
            .write(bytes)
            .await
            .map_err(uart_error_to_console_error)
    }
}
