use crate::calendar::CalendarError;
use crate::scheduling::SchedulingError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        error!("Store error: {}", err);
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::Database(_) => Self::bad_request("Database error"),

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::service_unavailable("Database unavailable")
            }

            _ => Self::internal_server_error("Internal server error"),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::bad_request("Validation error").with_details(err.to_string())
    }
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        match err {
            CalendarError::Unauthorized { .. } => {
                Self::unauthorized("Calendar access was rejected, please sign in again")
                    .with_details(err.to_string())
            }
            CalendarError::Transport(_) => {
                Self::bad_gateway("Calendar service unreachable").with_details(err.to_string())
            }
            _ => Self::bad_gateway("Calendar service error").with_details(err.to_string()),
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::RequestNotFound(_) => {
                Self::not_found("Request not found").with_details(err.to_string())
            }
            SchedulingError::NotRecipient { .. } => {
                Self::forbidden("You are not the recipient of this request")
            }
            SchedulingError::NotPending { .. } => {
                Self::conflict("Request is already processed").with_details(err.to_string())
            }
            SchedulingError::AcceptedOverlap { .. } => {
                Self::conflict("Request overlaps an accepted appointment")
                    .with_details(err.to_string())
            }
            SchedulingError::StaleTransition(_) => {
                Self::conflict("Request was modified concurrently").with_details(err.to_string())
            }
            SchedulingError::MissingAccessToken => {
                Self::unauthorized("Calendar access token missing, please sign in again")
            }
            SchedulingError::Calendar(err) => err.into(),
            SchedulingError::Store(err) => err.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_errors_map_to_http_statuses() {
        assert_eq!(
            AppError::from(SchedulingError::MissingAccessToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(SchedulingError::RequestNotFound(4)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(SchedulingError::StaleTransition(4)).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(SchedulingError::Calendar(CalendarError::Upstream {
                status: 500,
                body: "backend error".to_string(),
            }))
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(SchedulingError::Calendar(CalendarError::Unauthorized {
                status: 401,
                body: String::new(),
            }))
            .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
