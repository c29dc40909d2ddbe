//! Periodic background tasks: the analog scan and the diagnostic flash.
//!
//! Both loops re-read their interval from the panel each cycle, so a rate
//! change takes effect at the next cycle, never mid-cycle. A hardware fault
//! logs a warning and skips the rest of the cycle; the loops only end at
//! process shutdown.

use crate::hardware::adc::{read_channel, Channel};
use crate::hardware::leds::LedColor;
use crate::hardware::SharedBus;
use crate::panel::messages::{adc_message, led_message};
use crate::panel::state::SharedPanel;
use crate::web::hub::BroadcastHub;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// The LED the flash task blinks as a liveness indicator.
pub const DIAGNOSTIC_LED: LedColor = LedColor::Red;

/// Sweep all channels once and broadcast one sample message per channel.
///
/// The bus lock is held for the whole sweep and released before any
/// broadcast is queued. On a fault the remaining channels are skipped and
/// nothing from this cycle is broadcast.
pub async fn scan_once(bus: &SharedBus, hub: &BroadcastHub) {
    let readings = {
        let mut lines = bus.lock().await;
        let mut readings = Vec::with_capacity(usize::from(crate::hardware::CHANNEL_COUNT));
        let mut fault = false;
        for channel in Channel::all() {
            match read_channel(lines.as_mut(), channel) {
                Ok(value) => readings.push((channel, value)),
                Err(e) => {
                    warn!(%channel, error = %e, "ADC read failed, skipping cycle");
                    fault = true;
                    break;
                }
            }
        }
        if fault {
            return;
        }
        readings
    };

    for (channel, value) in readings {
        hub.broadcast(&adc_message(channel, value)).await;
    }
}

/// Invert the diagnostic LED from its actual pin level and broadcast the
/// new state.
pub async fn flash_once(panel: &SharedPanel, hub: &BroadcastHub) {
    let toggled = {
        let mut panel = panel.lock().await;
        panel.toggle_led(DIAGNOSTIC_LED)
    };
    match toggled {
        Ok(on) => hub.broadcast(&led_message(DIAGNOSTIC_LED, on)).await,
        Err(e) => warn!(error = %e, "Diagnostic LED flip failed, keeping previous state"),
    }
}

/// Run the analog scan loop until shutdown.
pub async fn run_scan_task(bus: SharedBus, panel: SharedPanel, hub: Arc<BroadcastHub>) {
    loop {
        let interval = panel.lock().await.rates().scan_interval_secs;
        sleep(Duration::from_secs_f64(interval)).await;
        scan_once(&bus, &hub).await;
    }
}

/// Run the diagnostic flash loop until shutdown.
pub async fn run_flash_task(panel: SharedPanel, hub: Arc<BroadcastHub>) {
    loop {
        let interval = panel.lock().await.rates().flash_interval_secs;
        sleep(Duration::from_secs_f64(interval)).await;
        flash_once(&panel, &hub).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::sim::SimulatedConverter;
    use crate::panel::state::Panel;
    use tokio::sync::Mutex;

    fn sim_bus(values: [u16; 8]) -> SharedBus {
        Arc::new(Mutex::new(Box::new(SimulatedConverter::with_values(
            values,
        ))))
    }

    #[tokio::test]
    async fn scan_broadcasts_all_channels_in_order() {
        let bus = sim_bus([10, 20, 30, 40, 50, 60, 70, 80]);
        let hub = BroadcastHub::new();
        let mut rx = hub.register("hello test".to_string(), Vec::new()).await.1;
        rx.recv().await.unwrap(); // greeting

        scan_once(&bus, &hub).await;

        for n in 0..8u16 {
            assert_eq!(rx.recv().await.unwrap(), format!("adc{} {}", n, (n + 1) * 10));
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn flash_inverts_diagnostic_led_and_broadcasts() {
        let panel = Panel::shared_memory();
        let hub = BroadcastHub::new();
        let mut rx = hub.register("hello test".to_string(), Vec::new()).await.1;
        rx.recv().await.unwrap(); // greeting

        flash_once(&panel, &hub).await;
        assert!(panel.lock().await.led_is_on(DIAGNOSTIC_LED));
        assert_eq!(rx.recv().await.unwrap(), "redled on");

        flash_once(&panel, &hub).await;
        assert!(!panel.lock().await.led_is_on(DIAGNOSTIC_LED));
        assert_eq!(rx.recv().await.unwrap(), "redled off");
    }
}
