//! Control options and chart recomputation endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::charts::Dashboard;
use crate::data::filter::{FilterCriteria, FilterError};
use crate::state::DashboardOptions;
use crate::AppState;

/// Query parameters of `/api/dashboard`. Anything omitted falls back to the
/// control's initial value. Bounds arrive as text so a malformed number is
/// reported as a filter error.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub cuisine: Option<String>,
    pub calorie_min: Option<String>,
    pub calorie_max: Option<String>,
}

impl DashboardQuery {
    fn into_criteria(self, options: &DashboardOptions) -> Result<FilterCriteria, FilterError> {
        Ok(FilterCriteria {
            cuisine: self
                .cuisine
                .or_else(|| options.default_cuisine.clone())
                .unwrap_or_default(),
            calorie_min: parse_bound("calorie_min", self.calorie_min, options.calories.min)?,
            calorie_max: parse_bound("calorie_max", self.calorie_max, options.calories.max)?,
        })
    }
}

fn parse_bound(field: &'static str, raw: Option<String>, default: f64) -> Result<f64, FilterError> {
    let Some(text) = raw else {
        return Ok(default);
    };
    text.trim()
        .parse::<f64>()
        .map_err(|_| FilterError::InvalidNumber { field, value: text })
}

/// GET /api/options
///
/// Cuisine choices, calorie bounds, slider step and tick marks.
pub async fn get_options(State(state): State<AppState>) -> Json<DashboardOptions> {
    Json(state.options.as_ref().clone())
}

/// GET /api/dashboard?cuisine=..&calorie_min=..&calorie_max=..
///
/// Filters the combined table and returns all four charts together.
pub async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<Dashboard>, ApiError> {
    let Query(query) = query?;
    let criteria = query.into_criteria(&state.options)?;
    let dashboard = tokio::task::spawn_blocking(move || state.dashboard(&criteria)).await??;
    Ok(Json(dashboard))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid filter: {0}")]
    InvalidCriteria(#[from] FilterError),
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryRejection),
    #[error("dashboard recomputation failed: {0}")]
    Recompute(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidCriteria(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Recompute(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        log::debug!("request rejected: {self}");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
