//! Health endpoint for uptime monitors.
//!
//! Reports component status as JSON. Missing mail settings only degrade the
//! application: pages still serve, the digest just cannot send.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppContext;

/// Health check status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Health check result for a single component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Overall health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: Vec<ComponentHealth>,
}

impl HealthResponse {
    fn from_checks(checks: Vec<ComponentHealth>) -> Self {
        let mut status = HealthStatus::Healthy;
        for check in &checks {
            match check.status {
                HealthStatus::Unhealthy => status = HealthStatus::Unhealthy,
                HealthStatus::Degraded if status == HealthStatus::Healthy => {
                    status = HealthStatus::Degraded
                }
                _ => {}
            }
        }
        Self { status, checks }
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status_code = match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status_code, Json(self)).into_response()
    }
}

fn templates_check(ctx: &AppContext) -> ComponentHealth {
    let complete = ctx.renderer.has_template("today") && ctx.renderer.has_template("daily");
    ComponentHealth {
        name: "templates".to_string(),
        status: if complete {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        message: (!complete).then(|| "Bundled templates are incomplete".to_string()),
    }
}

async fn mail_settings_check(ctx: &AppContext) -> ComponentHealth {
    let (status, message) = match ctx.settings.any_settings().await {
        Ok(true) => (HealthStatus::Healthy, None),
        Ok(false) => (
            HealthStatus::Degraded,
            Some("No mail configuration; digest sends are disabled".to_string()),
        ),
        Err(error) => (HealthStatus::Unhealthy, Some(error.to_string())),
    };
    ComponentHealth {
        name: "mail_settings".to_string(),
        status,
        message,
    }
}

/// Handler for the health endpoint
pub async fn health_handler(State(ctx): State<AppContext>) -> HealthResponse {
    let checks = vec![templates_check(&ctx), mail_settings_check(&ctx).await];
    HealthResponse::from_checks(checks)
}

// ============================================================================
// Health endpoint tests
// ============================================================================
