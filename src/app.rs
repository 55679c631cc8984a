use axum::routing::get;
use axum::Router;

use crate::api;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// HTTP shell: page, controls and chart panels
// ---------------------------------------------------------------------------

/// Build the application router.
///
/// * `/`                – dashboard page
/// * `/static/app.js`   – control wiring
/// * `/api/options`     – cuisine choices and calorie bounds
/// * `/api/dashboard`   – all four charts for one selection
/// * `/health`          – liveness
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/options", get(api::get_options))
        .route("/api/dashboard", get(api::get_dashboard))
        .merge(api::health_routes())
        .with_state(state)
}
