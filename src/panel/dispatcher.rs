//! Applies parsed client commands to the hardware and the broadcast hub.

use crate::error::Result;
use crate::panel::command::{Command, LedAction};
use crate::panel::messages::led_message;
use crate::panel::state::SharedPanel;
use crate::web::hub::BroadcastHub;
use std::sync::Arc;
use tracing::debug;

/// Handles inbound text from any client: mutates the panel, then enqueues
/// the resulting broadcast.
#[derive(Clone)]
pub struct CommandDispatcher {
    panel: SharedPanel,
    hub: Arc<BroadcastHub>,
}

impl CommandDispatcher {
    pub fn new(panel: SharedPanel, hub: Arc<BroadcastHub>) -> Self {
        Self { panel, hub }
    }

    /// Handle one inbound message.
    ///
    /// LED commands produce exactly one state-change broadcast; rate
    /// commands adjust the interval silently; everything else is echoed
    /// verbatim to all clients, the sender included. An error means the pin
    /// write failed and no broadcast was sent.
    pub async fn handle(&self, text: &str) -> Result<()> {
        match Command::parse(text) {
            Command::Led { color, action } => {
                // Pin write and mirror update happen atomically under the
                // panel lock; the broadcast is queued after release.
                let on = {
                    let mut panel = self.panel.lock().await;
                    match action {
                        LedAction::Toggle => panel.toggle_led(color)?,
                        LedAction::On => panel.set_led(color, true)?,
                        LedAction::Off => panel.set_led(color, false)?,
                    }
                };
                self.hub.broadcast(&led_message(color, on)).await;
            }
            Command::Rate { kind, direction } => {
                let rates = {
                    let mut panel = self.panel.lock().await;
                    panel.adjust_rate(kind, direction)
                };
                debug!(
                    flash_secs = rates.flash_interval_secs,
                    scan_secs = rates.scan_interval_secs,
                    "Rate adjusted"
                );
            }
            Command::Passthrough(original) => {
                self.hub.broadcast(&original).await;
            }
        }
        Ok(())
    }
}
