//! Errori del ciclo di vita delle richieste

use crate::calendar::CalendarError;
use crate::entities::RequestStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("request {0} not found")]
    RequestNotFound(i32),

    #[error("request {request_id} is not addressed to profile {profile_id}")]
    NotRecipient { request_id: i32, profile_id: i32 },

    #[error("request {request_id} is already {status:?}")]
    NotPending {
        request_id: i32,
        status: RequestStatus,
    },

    #[error("request {request_id} overlaps the accepted request {accepted_request_id}")]
    AcceptedOverlap {
        request_id: i32,
        accepted_request_id: i32,
    },

    #[error("calendar access token is missing")]
    MissingAccessToken,

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("request {0} changed status concurrently")]
    StaleTransition(i32),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}
