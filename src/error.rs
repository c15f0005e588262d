use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// ErrorBody
///
/// The structured error payload returned by every failing API endpoint.
/// The `error` field is a stable machine-readable code the frontend switches on
/// (e.g., to hide an action after a `not_authorized`); `message` is human text.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    /// Stable machine-readable error code.
    pub error: String,
    /// Human-readable description, safe to show to the end user.
    pub message: String,
}

/// ApiError
///
/// The application-level error type for API handlers. Pairs an HTTP status with
/// a structured `ErrorBody` and implements `IntoResponse`, so handlers return
/// `Result<_, ApiError>` and use `?`/early-return without building responses
/// by hand.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// 401: no valid session could be resolved for the request.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: ErrorBody {
                error: "unauthenticated".to_string(),
                message: "A valid session is required to access this resource.".to_string(),
            },
        }
    }

    /// 403: the session is valid but its role does not grant the capability.
    /// `action` names the declined capability in user-facing terms
    /// (e.g., "invite users", "delete patients").
    pub fn forbidden(action: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            body: ErrorBody {
                error: "not_authorized".to_string(),
                message: format!("Your role does not allow you to {}.", action),
            },
        }
    }

    /// 400: the request payload is structurally valid JSON but semantically wrong.
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: "invalid_request".to_string(),
                message: message.to_string(),
            },
        }
    }

    /// 404: the addressed resource does not exist.
    pub fn not_found(resource: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                error: "not_found".to_string(),
                message: format!("{} not found.", resource),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
