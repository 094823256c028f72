use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<edurag_core::error::EduragError> for ApiError {
    fn from(err: edurag_core::error::EduragError) -> Self {
        use edurag_core::error::EduragError;
        match &err {
            EduragError::BundleNotBuilt => {
                Self::not_found("Course bundle not built").with_details(err.to_string())
            }
            EduragError::InvalidCourseId
            | EduragError::MissingDocuments { .. }
            | EduragError::EmptyQuery
            | EduragError::SolutionsBankEmpty
            | EduragError::ConfigInvalid { .. } => {
                Self::bad_request("Invalid request").with_details(err.to_string())
            }
            EduragError::ModelUnavailable { .. } | EduragError::MalformedReply { .. } => {
                Self::bad_gateway("Chat model error").with_details(err.to_string())
            }
            _ => Self::internal("Internal error").with_details(err.to_string()),
        }
    }
}
