use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handles::control_handle::*;
use crate::handles::event_handle::notice_stream;
use crate::monitor::MonitorHandle;

pub fn create_app(monitor: MonitorHandle) -> Router {
    let state = ControlState { monitor };

    let devices = Router::new()
        .route("/:channel", get(get_device))
        .route("/:channel/on", post(power_on))
        .route("/:channel/off", post(power_off))
        .route("/:channel/monthly", post(get_monthly_usage));

    Router::new()
        .nest("/devices", devices)
        .route("/limit", post(set_limit))
        .route("/events", get(notice_stream))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
