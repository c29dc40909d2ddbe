//! Bit-banged acquisition protocol for the eight-channel converter.
//!
//! The conversion is clocked out by hand over the four bus lines: a five-bit
//! command word selects the channel, then the converter answers with a null
//! bit followed by the ten result bits, MSB first in both directions.

use crate::error::{BridgeError, Result};
use crate::hardware::lines::AdcLines;

/// Number of analog input channels on the converter.
pub const CHANNEL_COUNT: u8 = 8;

/// Largest value a 10-bit conversion can produce.
pub const MAX_SAMPLE: u16 = 1023;

/// Identifier of one analog input line, always in `0..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel(u8);

impl Channel {
    /// Validate a raw channel number.
    pub fn new(index: u8) -> Result<Self> {
        if index < CHANNEL_COUNT {
            Ok(Self(index))
        } else {
            Err(BridgeError::InvalidChannel(index))
        }
    }

    /// The raw channel number.
    pub fn index(self) -> u8 {
        self.0
    }

    /// All channels in scan order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..CHANNEL_COUNT).map(Channel)
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Perform one conversion on `channel` and return the 10-bit result.
///
/// The caller must hold exclusive access to the bus for the whole call;
/// interleaved access from a second caller garbles the transaction. Line
/// failures propagate as errors without retrying.
pub fn read_channel(lines: &mut (impl AdcLines + ?Sized), channel: Channel) -> Result<u16> {
    // Start condition. Deasserting and reasserting chip-select resets the
    // converter's internal state machine, so the order matters.
    lines.set_chip_select(true)?;
    lines.set_clock(false)?;
    lines.set_chip_select(false)?;

    // Command word, MSB first: start bit, single-ended mode bit, then the
    // three channel address bits.
    let command: u8 = 0b1_1000 | channel.index();
    for bit in (0..5).rev() {
        lines.set_data_in(command & (1 << bit) != 0)?;
        lines.set_clock(true)?;
        lines.set_clock(false)?;
    }

    // One null bit (discarded), then ten result bits, MSB first.
    let mut result: u16 = 0;
    for position in 0..11 {
        lines.set_clock(true)?;
        lines.set_clock(false)?;
        let level = lines.read_data_out()?;
        if position > 0 {
            result = (result << 1) | u16::from(level);
        }
    }

    lines.set_chip_select(true)?;
    Ok(result)
}
