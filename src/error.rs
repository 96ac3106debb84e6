use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The main error type for webhook processing
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The module is misconfigured and must not accept traffic.
    ///
    /// Raised at startup (missing webhook secret, missing API key). Never
    /// produced on the request path.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Signature verification failed: {0}")]
    SignatureVerification(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// One or more registered handlers failed during dispatch. Every handler
    /// still ran to completion; this aggregates the failures.
    #[error("{failed} of {total} webhook handlers failed")]
    HandlerExecution { failed: usize, total: usize },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Error response body returned to the provider.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    error_id: String,
}

impl WebhookError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn signature_verification(msg: impl Into<String>) -> Self {
        Self::SignatureVerification(msg.into())
    }

    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    /// Every request-path failure maps to a generic 500.
    ///
    /// Paystack treats any non-2xx response as undelivered and re-sends the
    /// event, so signature mismatches deliberately return a server error
    /// instead of a 401/400 that could be read as a permanent rejection.
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_)
            | Self::SignatureVerification(_)
            | Self::InvalidPayload(_)
            | Self::HandlerExecution { .. }
            | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a message safe to expose to the caller.
    ///
    /// The caller is the payment provider, not an end user; verification and
    /// handler details stay in the server logs (CWE-209).
    fn safe_message(&self) -> String {
        match self {
            Self::SignatureVerification(_) => "Error validating webhook event".to_string(),
            Self::Configuration(_)
            | Self::InvalidPayload(_)
            | Self::HandlerExecution { .. }
            | Self::Anyhow(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_id = uuid::Uuid::new_v4().to_string();

        // Full error details are logged server-side only
        tracing::error!(
            status = status.as_u16(),
            error_id = %error_id,
            error = %self,
            "Webhook request failed"
        );

        let body = Json(ErrorResponse {
            error: self.safe_message(),
            error_id,
        });

        (status, body).into_response()
    }
}

/// Result type alias for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;
