//! Status LED pins.
//!
//! Three LEDs are wired to dedicated output pins. The [`LedPin`] trait
//! abstracts one pin so the panel logic can run against in-memory pins on
//! non-Pi systems and in tests.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// BCM pin for the red status LED.
pub const RED_LED_PIN: u8 = 17;
/// BCM pin for the green status LED.
pub const GREEN_LED_PIN: u8 = 27;
/// BCM pin for the blue status LED.
pub const BLUE_LED_PIN: u8 = 22;

/// One of the three status LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Red,
    Green,
    Blue,
}

impl LedColor {
    /// All LEDs, in the fixed order used for connect-time snapshots.
    pub const ALL: [LedColor; 3] = [LedColor::Red, LedColor::Green, LedColor::Blue];

    /// The wire-protocol keyword for this LED.
    pub fn keyword(self) -> &'static str {
        match self {
            LedColor::Red => "redled",
            LedColor::Green => "greenled",
            LedColor::Blue => "blueled",
        }
    }

    /// Index into per-LED state arrays.
    pub fn index(self) -> usize {
        match self {
            LedColor::Red => 0,
            LedColor::Green => 1,
            LedColor::Blue => 2,
        }
    }

    /// BCM pin wired to this LED.
    pub fn bcm_pin(self) -> u8 {
        match self {
            LedColor::Red => RED_LED_PIN,
            LedColor::Green => GREEN_LED_PIN,
            LedColor::Blue => BLUE_LED_PIN,
        }
    }
}

/// One output pin driving an LED.
pub trait LedPin: Send {
    /// Read the actual pin level.
    fn is_on(&self) -> Result<bool>;

    /// Drive the pin high or low.
    fn set(&mut self, on: bool) -> Result<()>;
}

/// In-memory pin for non-Pi systems and tests.
#[derive(Debug, Default)]
pub struct MemoryLed {
    on: bool,
}

impl MemoryLed {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedPin for MemoryLed {
    fn is_on(&self) -> Result<bool> {
        Ok(self.on)
    }

    fn set(&mut self, on: bool) -> Result<()> {
        self.on = on;
        Ok(())
    }
}

#[cfg(feature = "gpio")]
mod raspberry_pi {
    use super::*;
    use crate::error::BridgeError;
    use rppal::gpio::{Gpio, OutputPin};

    /// Real LED pin on the Pi's GPIO header.
    pub struct GpioLed {
        pin: OutputPin,
    }

    impl GpioLed {
        /// Claim the output pin wired to `color`.
        pub fn new(gpio: &Gpio, color: LedColor) -> Result<Self> {
            let pin = gpio
                .get(color.bcm_pin())
                .map_err(|e| {
                    BridgeError::gpio_error(format!(
                        "Failed to claim LED pin {}: {}",
                        color.bcm_pin(),
                        e
                    ))
                })?
                .into_output();
            Ok(Self { pin })
        }
    }

    impl LedPin for GpioLed {
        fn is_on(&self) -> Result<bool> {
            Ok(self.pin.is_set_high())
        }

        fn set(&mut self, on: bool) -> Result<()> {
            if on {
                self.pin.set_high();
            } else {
                self.pin.set_low();
            }
            Ok(())
        }
    }
}

#[cfg(feature = "gpio")]
pub use raspberry_pi::GpioLed;

/// The three LED pins, indexed by [`LedColor`].
pub struct LedBank {
    pins: [Box<dyn LedPin>; 3],
}

impl LedBank {
    /// Build a bank from three already-claimed pins, in red/green/blue order.
    pub fn new(pins: [Box<dyn LedPin>; 3]) -> Self {
        Self { pins }
    }

    /// In-memory bank with all LEDs off.
    pub fn memory() -> Self {
        Self::new([
            Box::new(MemoryLed::new()),
            Box::new(MemoryLed::new()),
            Box::new(MemoryLed::new()),
        ])
    }

    /// Bank wired to the Pi's LED pins.
    #[cfg(feature = "gpio")]
    pub fn gpio() -> Result<Self> {
        use crate::error::BridgeError;
        let gpio = rppal::gpio::Gpio::new()
            .map_err(|e| BridgeError::gpio_error(format!("Failed to initialize GPIO: {}", e)))?;
        Ok(Self::new([
            Box::new(GpioLed::new(&gpio, LedColor::Red)?),
            Box::new(GpioLed::new(&gpio, LedColor::Green)?),
            Box::new(GpioLed::new(&gpio, LedColor::Blue)?),
        ]))
    }

    /// Read the actual pin level for one LED.
    pub fn is_on(&self, color: LedColor) -> Result<bool> {
        self.pins[color.index()].is_on()
    }

    /// Drive one LED pin.
    pub fn set(&mut self, color: LedColor, on: bool) -> Result<()> {
        self.pins[color.index()].set(on)
    }
}

impl std::fmt::Debug for LedBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedBank").finish_non_exhaustive()
    }
}
