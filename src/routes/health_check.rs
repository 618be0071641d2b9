use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::configuration::EnvironmentReport;
use crate::startup::ApplicationState;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub env: String,
    pub environment: EnvironmentReport,
}

#[tracing::instrument(name = "Health check", skip(app_state))]
pub async fn health_check(
    State(app_state): State<ApplicationState>,
) -> (StatusCode, Json<HealthResponse>) {
    let report = app_state.settings.validate_environment();
    let status = if report.valid {
        StatusCode::OK
    } else {
        tracing::error!("Environment validation failed: {:?}", report);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let body = HealthResponse {
        status: if report.valid { "ok" } else { "error" },
        timestamp: Utc::now().to_rfc3339(),
        env: app_state.environment_name.clone(),
        environment: report,
    };
    (status, Json(body))
}
