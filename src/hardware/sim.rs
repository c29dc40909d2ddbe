//! Simulated converter for tests and non-Pi builds.
//!
//! Implements [`AdcLines`] as a small state machine clocked on rising edges,
//! so the sampler exercises the exact same bit-level protocol against it as
//! against real hardware, without any timing dependency.

use crate::error::Result;
use crate::hardware::adc::{Channel, CHANNEL_COUNT, MAX_SAMPLE};
use crate::hardware::lines::AdcLines;

#[derive(Debug)]
enum Phase {
    /// Chip-select is deasserted; clock edges are ignored.
    Idle,
    /// Shifting in the five command bits.
    Command { bits: u8, count: u8 },
    /// Presenting the null bit and ten result bits, one per rising edge.
    Output { pending: [bool; 11], next: usize },
}

/// In-memory converter holding one 10-bit value per channel.
#[derive(Debug)]
pub struct SimulatedConverter {
    values: [u16; CHANNEL_COUNT as usize],
    clock_high: bool,
    data_in_high: bool,
    data_out_high: bool,
    phase: Phase,
}

impl SimulatedConverter {
    /// Create a converter with all channels reading zero.
    pub fn new() -> Self {
        Self {
            values: [0; CHANNEL_COUNT as usize],
            clock_high: false,
            data_in_high: false,
            data_out_high: false,
            phase: Phase::Idle,
        }
    }

    /// Create a converter preloaded with the given channel values.
    pub fn with_values(values: [u16; CHANNEL_COUNT as usize]) -> Self {
        let mut sim = Self::new();
        sim.values = values.map(|v| v & MAX_SAMPLE);
        sim
    }

    /// Set the value one channel will convert to.
    pub fn set_value(&mut self, channel: Channel, value: u16) {
        self.values[channel.index() as usize] = value & MAX_SAMPLE;
    }

    fn on_rising_edge(&mut self) {
        match &mut self.phase {
            Phase::Idle => {}
            Phase::Command { bits, count } => {
                *bits = (*bits << 1) | u8::from(self.data_in_high);
                *count += 1;
                if *count == 5 {
                    let word = *bits;
                    // Start bit and single-ended mode bit must both be set;
                    // anything else leaves the output register at zero.
                    let mut pending = [false; 11];
                    if word & 0b1_1000 == 0b1_1000 {
                        let value = self.values[(word & 0b111) as usize];
                        for (i, slot) in pending.iter_mut().skip(1).enumerate() {
                            *slot = value & (1 << (9 - i)) != 0;
                        }
                    }
                    self.phase = Phase::Output { pending, next: 0 };
                }
            }
            Phase::Output { pending, next } => {
                self.data_out_high = pending.get(*next).copied().unwrap_or(false);
                *next += 1;
            }
        }
    }
}

impl Default for SimulatedConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl AdcLines for SimulatedConverter {
    fn set_clock(&mut self, high: bool) -> Result<()> {
        let rising = high && !self.clock_high;
        self.clock_high = high;
        if rising {
            self.on_rising_edge();
        }
        Ok(())
    }

    fn set_data_in(&mut self, high: bool) -> Result<()> {
        self.data_in_high = high;
        Ok(())
    }

    fn read_data_out(&mut self) -> Result<bool> {
        Ok(self.data_out_high)
    }

    fn set_chip_select(&mut self, high: bool) -> Result<()> {
        if high {
            self.phase = Phase::Idle;
            self.data_out_high = false;
        } else {
            // Falling chip-select frames a new conversion.
            self.phase = Phase::Command { bits: 0, count: 0 };
        }
        Ok(())
    }
}
