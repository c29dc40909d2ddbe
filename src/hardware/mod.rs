//! Hardware access: ADC bus lines, the bit-banged sampler, and LED pins.
//!
//! Real GPIO access via rppal is feature-gated so the crate builds and runs
//! on non-Pi systems with simulated hardware standing in.

pub mod adc;
pub mod leds;
pub mod lines;
pub mod sim;

pub use adc::{read_channel, Channel, CHANNEL_COUNT, MAX_SAMPLE};
pub use leds::{LedBank, LedColor, LedPin};
pub use lines::AdcLines;
pub use sim::SimulatedConverter;

use std::sync::Arc;
use tokio::sync::Mutex;

/// The four ADC lines form one shared bus; a caller must hold this lock for
/// the full duration of one conversion.
pub type SharedBus = Arc<Mutex<Box<dyn AdcLines + Send>>>;
