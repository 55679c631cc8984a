//! recipe-dash: joins two recipe datasets on a normalized title and serves
//! four linked charts filtered by cuisine and calorie range.

pub mod api;
pub mod app;
pub mod charts;
pub mod color;
pub mod config;
pub mod data;
pub mod state;

pub use app::build_router;
pub use state::AppState;
