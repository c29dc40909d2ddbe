//! HTTP handlers: the control page at `/` and the parameters page.
//!
//! A WebSocket upgrade request on `/` is handed off to the socket handler;
//! a plain GET serves the control page, from the configured static
//! directory if there is one, otherwise from the built-in page.

use crate::web::{websocket, AppState};
use axum::extract::connect_info::ConnectInfo;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde_json::json;
use std::net::SocketAddr;
use tracing::error;

/// `/` — upgrade to WebSocket, or serve the control page.
pub async fn root(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    ws: Option<WebSocketUpgrade>,
) -> Response {
    match ws {
        Some(ws) => websocket::upgrade(ws, state, peer),
        None => control_page(&state).await.into_response(),
    }
}

async fn control_page(state: &AppState) -> Result<Html<String>, StatusCode> {
    if let Some(dir) = &state.static_path {
        let index = std::path::Path::new(dir).join("index.html");
        match tokio::fs::read_to_string(&index).await {
            Ok(content) => return Ok(Html(content)),
            Err(e) => {
                error!(path = %index.display(), error = %e, "Failed to read control page");
                return Err(StatusCode::NOT_FOUND);
            }
        }
    }
    Ok(Html(CONTROL_PAGE_HTML.to_string()))
}

/// `/params` — read-only view of the current panel parameters.
pub async fn params(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (rates, leds) = {
        let panel = state.panel.lock().await;
        (panel.rates(), panel.led_levels())
    };
    let leds: serde_json::Map<String, serde_json::Value> = leds
        .into_iter()
        .map(|(color, on)| (color.keyword().to_string(), json!(on)))
        .collect();

    Json(json!({
        "service": "pi_gpio_web",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "flash_interval_secs": rates.flash_interval_secs,
        "scan_interval_secs": rates.scan_interval_secs,
        "leds": leds,
        "connected_clients": state.hub.client_count().await,
    }))
}

/// Built-in control page: three clickable LEDs, a message log, and meters
/// for the eight analog channels, driven by the plain-text socket protocol.
const CONTROL_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>GPIO Control Panel</title>
  <style>
    body { font-family: sans-serif; display: flex; gap: 16px; padding: 16px; }
    .box { border: 2px solid black; padding: 8px; height: 320px; }
    #leds { background: #eee; width: 200px; }
    #msgs { background: #9f9; width: 240px; overflow-y: scroll; font-size: 12px; }
    #analog { background: gold; width: 160px; font-family: monospace; }
    circle { cursor: pointer; }
  </style>
</head>
<body>
  <div id="leds" class="box">
    <b>control panel</b>
    <form id="form"><input type="text" id="input" value="send a message"></form>
    <svg width="180" height="60">
      <circle id="redled" cx="30" cy="25" r="10" fill="gray" stroke="black" stroke-width="4"/>
      <circle id="greenled" cx="60" cy="25" r="10" fill="gray" stroke="black" stroke-width="4"/>
      <circle id="blueled" cx="90" cy="25" r="10" fill="gray" stroke="black" stroke-width="4"/>
    </svg>
    <div>
      flash rate: <button data-cmd="flash rate up">+</button><button data-cmd="flash rate down">-</button><br>
      refresh rate: <button data-cmd="refresh rate up">+</button><button data-cmd="refresh rate down">-</button>
    </div>
  </div>
  <div id="msgs" class="box"></div>
  <div id="analog" class="box"><b>analog inputs</b><br></div>
  <script>
    const onFill = { redled: 'red', greenled: 'lightgreen', blueled: 'dodgerblue' };
    const offFill = { redled: 'brown', greenled: 'darkgreen', blueled: 'darkblue' };
    const msgs = document.getElementById('msgs');
    const analog = document.getElementById('analog');
    const meters = {};
    for (let n = 0; n < 8; n++) {
      const label = document.createElement('div');
      label.innerHTML = 'adc' + n + ': <span>?</span> <meter min="0" max="1023" value="0"></meter>';
      analog.appendChild(label);
      meters[n] = label;
    }
    const show = (text) => { msgs.innerHTML = text + '<br>' + msgs.innerHTML; };

    const ws = new WebSocket('ws://' + window.location.host + window.location.pathname);
    ws.onopen = () => show('websocket opened');
    ws.onclose = () => show('websocket closed');
    ws.onmessage = (m) => {
      const parts = m.data.split(' ');
      if (parts[0] in onFill) {
        document.getElementById(parts[0]).style.fill =
          parts[1] === 'on' ? onFill[parts[0]] : offFill[parts[0]];
        show(parts[0] + '/' + parts[1]);
      } else if (parts[0].startsWith('adc')) {
        const n = parseInt(parts[0].slice(3));
        if (meters[n]) {
          meters[n].querySelector('span').textContent = parts[1];
          meters[n].querySelector('meter').value = parseInt(parts[1]);
        }
      } else {
        show('websocket message: ' + m.data);
      }
    };

    for (const id of Object.keys(onFill)) {
      document.getElementById(id).onclick = () => ws.send(id + ' clicked');
    }
    for (const button of document.querySelectorAll('button[data-cmd]')) {
      button.onclick = (e) => { e.preventDefault(); ws.send(button.dataset.cmd); };
    }
    document.getElementById('form').onsubmit = () => {
      const input = document.getElementById('input');
      ws.send(input.value);
      input.value = '';
      return false;
    };
  </script>
</body>
</html>
"#;
