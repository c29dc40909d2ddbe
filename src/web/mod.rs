//! Web server: WebSocket fan-out plus the thin HTTP surface around it.

pub mod config;
pub mod handlers;
pub mod hub;
pub mod router;
pub mod websocket;

pub use config::WebConfig;
pub use hub::BroadcastHub;
pub use router::create_app;

use crate::error::{BridgeError, Result};
use crate::hardware::SharedBus;
use crate::panel::scheduler::{run_flash_task, run_scan_task};
use crate::panel::state::SharedPanel;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub panel: SharedPanel,
    pub hub: Arc<BroadcastHub>,
    /// Address advertised in the connect-time greeting.
    pub server_addr: String,
    /// Optional directory the control page is served from.
    pub static_path: Option<String>,
}

/// Start the web server and the two periodic panel tasks.
///
/// Runs until the process is terminated.
pub async fn start_web_server(config: WebConfig, panel: SharedPanel, bus: SharedBus) -> Result<()> {
    let addr = config
        .bind_address()
        .parse::<SocketAddr>()
        .map_err(|e| BridgeError::config_error(format!("Invalid bind address: {}", e)))?;

    let hub = Arc::new(BroadcastHub::new());
    let state = AppState {
        panel: panel.clone(),
        hub: hub.clone(),
        server_addr: addr.to_string(),
        static_path: config.static_path.clone(),
    };

    let app = create_app(state, config.enable_cors);

    info!("Starting GPIO control server on http://{}", addr);
    info!("Control page and WebSocket endpoint: http://{}/", addr);
    info!("Parameters page: http://{}/params", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BridgeError::web_server_error(format!("Failed to bind to address: {}", e)))?;

    // Periodic tasks run for the life of the process.
    tokio::spawn(run_scan_task(bus, panel.clone(), hub.clone()));
    tokio::spawn(run_flash_task(panel, hub));

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| BridgeError::web_server_error(format!("Server error: {}", e)))?;

    Ok(())
}
