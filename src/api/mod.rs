//! HTTP handlers for the dashboard

pub mod dashboard;
pub mod health;
pub mod ui;

pub use dashboard::{get_dashboard, get_options, ApiError};
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index};
