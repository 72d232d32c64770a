use crate::level::Severity;
use serde_json::{json, Value};

/// Errors raised while handling a request.
///
/// `Validation` and `ResourceNotFound` are client-caused and map to 4xx
/// responses; the rest map to 5xx and never leak their details into the
/// response body.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    ResourceNotFound(String),

    #[error("{service} error: {message}")]
    ExternalService {
        service: String,
        message: String,
        status_code: Option<u16>,
    },

    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn validation(message: impl Into<String>) -> Self {
        HandlerError::Validation(message.into())
    }

    pub fn external(service: impl Into<String>, message: impl Into<String>, status_code: Option<u16>) -> Self {
        HandlerError::ExternalService {
            service: service.into(),
            message: message.into(),
            status_code,
        }
    }

    /// HTTP status returned to the client.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Validation(_) => 400,
            HandlerError::ResourceNotFound(_) => 404,
            HandlerError::ExternalService { .. } => 502,
            HandlerError::Internal(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Severity used when logging this error at the handler boundary.
    pub fn severity(&self) -> Severity {
        if self.is_client_error() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// Stable name logged as `error_type`.
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Validation(_) => "ValidationError",
            HandlerError::ResourceNotFound(_) => "ResourceNotFound",
            HandlerError::ExternalService { .. } => "ExternalServiceError",
            HandlerError::Internal(_) => "InternalError",
        }
    }

    /// Body sent to the client.
    pub fn client_body(&self) -> Value {
        if self.is_client_error() {
            json!({ "error": self.to_string() })
        } else {
            json!({ "error": "Internal server error" })
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError::Internal(e.to_string())
    }
}
