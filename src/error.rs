use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The main error type for the dugout application
#[derive(Debug, thiserror::Error)]
pub enum DugoutError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Mail error: {0}")]
    Mail(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Standard error response body for API errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    error_id: String,
}

impl DugoutError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    pub fn mail(msg: impl Into<String>) -> Self {
        Self::Mail(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) | Self::Template(_) | Self::Mail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Returns a safe error message suitable for client responses.
    ///
    /// Client errors (4xx) expose their message; server errors (5xx) return a
    /// generic message to avoid information disclosure (CWE-209). Full details
    /// are logged server-side.
    pub fn safe_message(&self) -> String {
        match self {
            Self::NotFound(msg) => format!("Not found: {}", msg),
            Self::BadRequest(msg) => format!("Bad request: {}", msg),
            Self::Unauthorized(msg) => format!("Unauthorized: {}", msg),
            Self::Forbidden(msg) => format!("Forbidden: {}", msg),
            Self::RequestTimeout => "Request timeout".to_string(),

            Self::Internal(_) | Self::Anyhow(_) => "Internal server error".to_string(),
            Self::Config(_) => "Internal server error".to_string(),
            Self::Template(_) => "Internal server error".to_string(),
            Self::Mail(_) => "Internal server error".to_string(),
            Self::ServiceUnavailable(_) => "Service unavailable".to_string(),
        }
    }
}

impl IntoResponse for DugoutError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_id = uuid::Uuid::new_v4().to_string();

        // Full details go to the server log only.
        tracing::error!(
            status = status.as_u16(),
            error_id = %error_id,
            error = %self,
            "Request failed"
        );

        let body = Json(ErrorResponse {
            error: self.safe_message(),
            error_id,
        });

        (status, body).into_response()
    }
}

/// Result type alias for dugout handlers
pub type Result<T> = std::result::Result<T, DugoutError>;

// Common error type conversions

impl From<serde_json::Error> for DugoutError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            DugoutError::BadRequest(format!("JSON error: {}", err))
        } else {
            DugoutError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

impl From<reqwest::Error> for DugoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DugoutError::RequestTimeout
        } else if err.is_connect() {
            DugoutError::ServiceUnavailable(format!("Connection error: {}", err))
        } else if err.is_status() {
            // Map HTTP status codes from the upstream stats service
            if let Some(status) = err.status() {
                match status.as_u16() {
                    401 => DugoutError::Unauthorized("Upstream authentication failed".to_string()),
                    403 => DugoutError::Forbidden("Upstream access denied".to_string()),
                    404 => DugoutError::NotFound("Upstream resource not found".to_string()),
                    503 => DugoutError::ServiceUnavailable(
                        "Upstream service unavailable".to_string(),
                    ),
                    _ => DugoutError::Internal(format!("Upstream error: {}", err)),
                }
            } else {
                DugoutError::Internal(format!("HTTP error: {}", err))
            }
        } else {
            DugoutError::Internal(format!("Request error: {}", err))
        }
    }
}

impl From<handlebars::TemplateError> for DugoutError {
    fn from(err: handlebars::TemplateError) -> Self {
        DugoutError::Template(format!("Template parse error: {}", err))
    }
}

impl From<handlebars::RenderError> for DugoutError {
    fn from(err: handlebars::RenderError) -> Self {
        DugoutError::Template(format!("Render error: {}", err))
    }
}

impl From<lettre::error::Error> for DugoutError {
    fn from(err: lettre::error::Error) -> Self {
        DugoutError::Mail(format!("Message build error: {}", err))
    }
}

impl From<lettre::address::AddressError> for DugoutError {
    fn from(err: lettre::address::AddressError) -> Self {
        DugoutError::Mail(format!("Invalid address: {}", err))
    }
}

impl From<validator::ValidationErrors> for DugoutError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field_errors: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let messages: Vec<&str> = errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.as_ref()))
                    .collect();
                if messages.is_empty() {
                    format!("{}: invalid", field)
                } else {
                    format!("{}: {}", field, messages.join(", "))
                }
            })
            .collect();

        DugoutError::BadRequest(format!("Validation failed: {}", field_errors.join("; ")))
    }
}
