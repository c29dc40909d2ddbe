//! # Pi GPIO Web
//!
//! A Raspberry Pi GPIO control panel served over WebSockets: browser clients
//! observe and toggle status LEDs and watch periodically sampled analog
//! values from an eight-channel converter driven by a bit-banged protocol.
//!
//! ## Features
//!
//! - **Bit-banged ADC sampling**: eight 10-bit channels over four shared
//!   digital lines, behind an abstract bus so tests run without hardware
//! - **Live fan-out**: every connected client stays consistent with the
//!   shared LED and rate state
//! - **Plain-text protocol**: `redled clicked`, `adc3 512`, and friends
//! - **Feature-gated GPIO**: real pins via rppal with `--features gpio`,
//!   simulated hardware otherwise
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pi_gpio_web::{start_web_server, Panel, SimulatedConverter, WebConfig};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! #[tokio::main]
//! async fn main() -> pi_gpio_web::Result<()> {
//!     let panel = Panel::shared_memory();
//!     let bus: pi_gpio_web::SharedBus =
//!         Arc::new(Mutex::new(Box::new(SimulatedConverter::new())));
//!     start_web_server(WebConfig::default(), panel, bus).await
//! }
//! ```

pub mod error;
pub mod hardware;
pub mod panel;
pub mod web;

// Re-export public API
pub use error::{BridgeError, Result};
pub use hardware::{
    adc::{read_channel, Channel, CHANNEL_COUNT, MAX_SAMPLE},
    leds::{LedBank, LedColor, LedPin},
    lines::AdcLines,
    sim::SimulatedConverter,
    SharedBus,
};
pub use panel::{
    command::Command,
    dispatcher::CommandDispatcher,
    state::{Panel, RateConfig, SharedPanel},
};
pub use web::{start_web_server, BroadcastHub, WebConfig};

/// The default web server port
pub const DEFAULT_WEB_PORT: u16 = 2001;
