//! Route registration and middleware.

use crate::web::{handlers, AppState};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the axum application.
///
/// `/` carries both the control page and the WebSocket upgrade; `/params`
/// is the read-only parameters page.
pub fn create_app(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::root))
        .route("/params", get(handlers::params))
        .with_state(state);

    if enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::state::Panel;
    use crate::web::hub::BroadcastHub;
    use std::sync::Arc;

    #[tokio::test]
    async fn app_builds_with_and_without_cors() {
        let state = AppState {
            panel: Panel::shared_memory(),
            hub: Arc::new(BroadcastHub::new()),
            server_addr: "127.0.0.1:2001".to_string(),
            static_path: None,
        };
        let _with = create_app(state.clone(), true);
        let _without = create_app(state, false);
    }
}
