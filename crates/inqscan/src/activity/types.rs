//! Inquiry scan interval/window value and its parameter encoding

use crate::error::HciError;
use crate::hci::HciCommand;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fmt;
use std::io::Cursor;
use std::time::Duration;
use thiserror::Error;

/// Length of one baseband slot
pub const SLOT: Duration = Duration::from_micros(625);

pub const INTERVAL_MIN: u16 = 0x0012;
pub const INTERVAL_MAX: u16 = 0x1000;
pub const WINDOW_MIN: u16 = 0x0011;
pub const WINDOW_MAX: u16 = 0x1000;

/// Inquiry scan interval and window, both in slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InquiryScanActivity {
    pub interval: u16,
    pub window: u16,
}

/// Reasons a controller is expected to reject an activity
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("interval 0x{0:04x} outside 0x0012..=0x1000")]
    Interval(u16),

    #[error("interval 0x{0:04x} is odd")]
    OddInterval(u16),

    #[error("window 0x{0:04x} outside 0x0011..=0x1000")]
    Window(u16),

    #[error("window 0x{window:04x} longer than interval 0x{interval:04x}")]
    WindowExceedsInterval { interval: u16, window: u16 },
}

impl InquiryScanActivity {
    pub fn new(interval: u16, window: u16) -> Self {
        Self { interval, window }
    }

    /// Command parameters: interval then window, little-endian
    pub fn encode(&self) -> [u8; 4] {
        let interval = self.interval.to_le_bytes();
        let window = self.window.to_le_bytes();
        [interval[0], interval[1], window[0], window[1]]
    }

    /// Decodes the return parameters following the status byte
    pub fn decode(data: &[u8]) -> Result<Self, HciError> {
        let mut cursor = Cursor::new(data);
        let short = |_| {
            HciError::protocol(format!(
                "inquiry scan activity needs 4 bytes, got {}",
                data.len()
            ))
        };

        let interval = cursor.read_u16::<LittleEndian>().map_err(short)?;
        let window = cursor.read_u16::<LittleEndian>().map_err(short)?;

        Ok(Self { interval, window })
    }

    pub fn to_command(&self) -> HciCommand {
        HciCommand::WriteInquiryScanActivity {
            interval: self.interval,
            window: self.window,
        }
    }

    pub fn interval_duration(&self) -> Duration {
        SLOT * u32::from(self.interval)
    }

    pub fn window_duration(&self) -> Duration {
        SLOT * u32::from(self.window)
    }

    /// Checks the values against the ranges the Core Specification allows.
    ///
    /// Reads and writes never call this; the controller has the final say.
    pub fn check_range(&self) -> Result<(), RangeError> {
        if !(INTERVAL_MIN..=INTERVAL_MAX).contains(&self.interval) {
            return Err(RangeError::Interval(self.interval));
        }
        if self.interval % 2 != 0 {
            return Err(RangeError::OddInterval(self.interval));
        }
        if !(WINDOW_MIN..=WINDOW_MAX).contains(&self.window) {
            return Err(RangeError::Window(self.window));
        }
        if self.window > self.interval {
            return Err(RangeError::WindowExceedsInterval {
                interval: self.interval,
                window: self.window,
            });
        }
        Ok(())
    }
}

impl fmt::Display for InquiryScanActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interval: {} (0x{:04x}, {} ms) window: {} (0x{:04x}, {} ms)",
            self.interval,
            self.interval,
            self.interval_duration().as_micros() as f64 / 1000.0,
            self.window,
            self.window,
            self.window_duration().as_micros() as f64 / 1000.0,
        )
    }
}
