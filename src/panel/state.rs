//! Shared, mutable hardware state.
//!
//! One [`Panel`] owns the LED pins, the mirrored LED flags, and the two
//! adjustable intervals. All mutation goes through the panel behind a single
//! lock, so every read-modify-write is atomic and the mirrored flags never
//! drift from the actual pin levels beyond one synchronized update.

use crate::error::Result;
use crate::hardware::leds::{LedBank, LedColor};
use crate::panel::command::{RateDirection, RateKind};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shortest allowed interval for either periodic task, in seconds.
pub const MIN_INTERVAL_SECS: f64 = 0.25;

/// Longest allowed interval for either periodic task, in seconds. The
/// original server had no upper bound; without one, repeated slow-down
/// commands could make the panel look dead.
pub const MAX_INTERVAL_SECS: f64 = 60.0;

/// Seconds added by one rate-down command.
pub const RATE_STEP_SECS: f64 = 0.5;

/// Default interval for the diagnostic flash task.
pub const DEFAULT_FLASH_INTERVAL_SECS: f64 = 1.0;

/// Default interval for the analog scan task.
pub const DEFAULT_SCAN_INTERVAL_SECS: f64 = 1.0;

/// The two adjustable task intervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateConfig {
    /// Seconds between diagnostic LED flips.
    pub flash_interval_secs: f64,
    /// Seconds between analog channel sweeps.
    pub scan_interval_secs: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            flash_interval_secs: DEFAULT_FLASH_INTERVAL_SECS,
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
        }
    }
}

impl RateConfig {
    /// Apply one rate command: up halves the interval, down adds a fixed
    /// step, both clamped to the allowed range.
    pub fn adjust(&mut self, kind: RateKind, direction: RateDirection) {
        let interval = match kind {
            RateKind::Flash => &mut self.flash_interval_secs,
            RateKind::Refresh => &mut self.scan_interval_secs,
        };
        *interval = match direction {
            RateDirection::Up => *interval / 2.0,
            RateDirection::Down => *interval + RATE_STEP_SECS,
        }
        .clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS);
    }
}

/// The shared panel record: LED pins plus mirrored flags plus rates.
pub struct Panel {
    leds: LedBank,
    led_on: [bool; 3],
    rates: RateConfig,
}

/// Handle shared between connection handlers and the periodic tasks.
pub type SharedPanel = Arc<Mutex<Panel>>;

impl Panel {
    /// Wrap a bank of LED pins. The mirrored flags are seeded from the
    /// actual pin levels.
    pub fn new(leds: LedBank) -> Result<Self> {
        let mut led_on = [false; 3];
        for color in LedColor::ALL {
            led_on[color.index()] = leds.is_on(color)?;
        }
        Ok(Self {
            leds,
            led_on,
            rates: RateConfig::default(),
        })
    }

    /// Shared in-memory panel, for non-Pi builds and tests.
    pub fn shared_memory() -> SharedPanel {
        // Memory pins cannot fail.
        let panel = Panel::new(LedBank::memory()).unwrap();
        Arc::new(Mutex::new(panel))
    }

    /// Invert one LED from its actual pin level; returns the new level.
    pub fn toggle_led(&mut self, color: LedColor) -> Result<bool> {
        let on = !self.leds.is_on(color)?;
        self.write_led(color, on)?;
        Ok(on)
    }

    /// Drive one LED to an explicit level; returns the level written.
    pub fn set_led(&mut self, color: LedColor, on: bool) -> Result<bool> {
        self.write_led(color, on)?;
        Ok(on)
    }

    fn write_led(&mut self, color: LedColor, on: bool) -> Result<()> {
        self.leds.set(color, on)?;
        self.led_on[color.index()] = on;
        Ok(())
    }

    /// The mirrored on/off flag for one LED.
    pub fn led_is_on(&self, color: LedColor) -> bool {
        self.led_on[color.index()]
    }

    /// Current levels of all three LEDs, in snapshot order.
    pub fn led_levels(&self) -> [(LedColor, bool); 3] {
        LedColor::ALL.map(|color| (color, self.led_on[color.index()]))
    }

    /// Current interval configuration.
    pub fn rates(&self) -> RateConfig {
        self.rates
    }

    /// Apply one rate command and return the resulting configuration.
    pub fn adjust_rate(&mut self, kind: RateKind, direction: RateDirection) -> RateConfig {
        self.rates.adjust(kind, direction);
        self.rates
    }
}

impl std::fmt::Debug for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Panel")
            .field("led_on", &self.led_on)
            .field("rates", &self.rates)
            .finish_non_exhaustive()
    }
}
