//! The four-line ADC bus capability.
//!
//! The converter is driven over four general-purpose digital lines: clock,
//! data-in (to the converter), data-out (from the converter), and chip-select.
//! Expressing them as a trait lets a software converter stand in for real
//! hardware in tests and on non-Pi systems.

use crate::error::Result;

/// BCM pin driving the converter clock.
pub const CLOCK_PIN: u8 = 18;
/// BCM pin carrying data out of the converter.
pub const DATA_OUT_PIN: u8 = 23;
/// BCM pin carrying command bits into the converter.
pub const DATA_IN_PIN: u8 = 24;
/// BCM pin for the converter chip-select.
pub const CHIP_SELECT_PIN: u8 = 25;

/// Abstract access to the four converter lines.
///
/// Implementations report line failures as errors; the sampler propagates
/// them upward without retrying.
pub trait AdcLines {
    /// Drive the clock line high or low.
    fn set_clock(&mut self, high: bool) -> Result<()>;

    /// Drive the data-in line (server to converter) high or low.
    fn set_data_in(&mut self, high: bool) -> Result<()>;

    /// Read the data-out line (converter to server).
    fn read_data_out(&mut self) -> Result<bool>;

    /// Drive the chip-select line high (idle) or low (selected).
    fn set_chip_select(&mut self, high: bool) -> Result<()>;
}

#[cfg(feature = "gpio")]
mod raspberry_pi {
    use super::*;
    use crate::error::BridgeError;
    use rppal::gpio::{Gpio, InputPin, OutputPin};

    /// Real converter bus wired to the Pi's GPIO header.
    pub struct GpioAdcLines {
        clock: OutputPin,
        data_in: OutputPin,
        data_out: InputPin,
        chip_select: OutputPin,
    }

    impl GpioAdcLines {
        /// Claim the four bus pins with the default wiring.
        pub fn new() -> Result<Self> {
            let gpio = Gpio::new()
                .map_err(|e| BridgeError::gpio_error(format!("Failed to initialize GPIO: {}", e)))?;

            let claim_output = |pin: u8| -> Result<OutputPin> {
                Ok(gpio
                    .get(pin)
                    .map_err(|e| {
                        BridgeError::gpio_error(format!("Failed to claim pin {}: {}", pin, e))
                    })?
                    .into_output())
            };

            let data_out = gpio
                .get(DATA_OUT_PIN)
                .map_err(|e| {
                    BridgeError::gpio_error(format!(
                        "Failed to claim pin {}: {}",
                        DATA_OUT_PIN, e
                    ))
                })?
                .into_input();

            Ok(Self {
                clock: claim_output(CLOCK_PIN)?,
                data_in: claim_output(DATA_IN_PIN)?,
                data_out,
                chip_select: claim_output(CHIP_SELECT_PIN)?,
            })
        }
    }

    impl AdcLines for GpioAdcLines {
        fn set_clock(&mut self, high: bool) -> Result<()> {
            if high {
                self.clock.set_high();
            } else {
                self.clock.set_low();
            }
            Ok(())
        }

        fn set_data_in(&mut self, high: bool) -> Result<()> {
            if high {
                self.data_in.set_high();
            } else {
                self.data_in.set_low();
            }
            Ok(())
        }

        fn read_data_out(&mut self) -> Result<bool> {
            Ok(self.data_out.is_high())
        }

        fn set_chip_select(&mut self, high: bool) -> Result<()> {
            if high {
                self.chip_select.set_high();
            } else {
                self.chip_select.set_low();
            }
            Ok(())
        }
    }
}

#[cfg(feature = "gpio")]
pub use raspberry_pi::GpioAdcLines;
