use serde::{Deserialize, Serialize};

/// Fixed value carried in the `errorCode` field of every error body.
pub const ERROR_CODE_SENTINEL: u32 = 1224;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RelayError {
    #[error("no messages provided")]
    NoMessages,

    #[error("no message provided in the request body")]
    NoMessage,

    #[error("invalid or missing role/content")]
    InvalidMessage,

    #[error("provider not recognised: '{0}'")]
    UnknownProvider(String),

    #[error("provider not recognised: none provided")]
    MissingProvider,

    #[error("no model provided")]
    NoModel,

    #[error("temperature must be a number")]
    InvalidTemperature,

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("unable to process your request, upstream responded {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("unable to process your request, upstream call failed: {0}")]
    UpstreamTransport(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl RelayError {
    /// True for failures caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NoMessages
                | Self::NoMessage
                | Self::InvalidMessage
                | Self::UnknownProvider(_)
                | Self::MissingProvider
                | Self::NoModel
                | Self::InvalidTemperature
                | Self::MalformedBody(_)
                | Self::MethodNotAllowed(_)
        )
    }

    /// HTTP status reported to the caller. Upstream statuses are never passed through.
    pub fn status_code(&self) -> u16 {
        if matches!(self, Self::MethodNotAllowed(_)) {
            405
        } else if self.is_client_error() {
            400
        } else {
            500
        }
    }

    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            error_code: ERROR_CODE_SENTINEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "errorCode")]
    pub error_code: u32,
}

#[cfg(feature = "server")]
mod server_impl {
    use super::RelayError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    impl IntoResponse for RelayError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(self.to_body())).into_response()
        }
    }
}
