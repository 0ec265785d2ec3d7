use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors raised by the SSO gate itself.
///
/// Verification failures are not errors at this level: they become a
/// redirect to the login page (see [`AuthFailure`](crate::AuthFailure)).
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No verified identity on this request.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Reading or writing the session failed.
    #[error("Session store error: {0}")]
    Session(String),

    /// The `tower-sessions` layer is not installed in front of the gate.
    #[error("Session layer is missing")]
    MissingSessionLayer,

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()).into_response(),
            Self::Session(_) | Self::MissingSessionLayer | Self::Config(_) => {
                tracing::error!(error = %self, "SSO gate internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
