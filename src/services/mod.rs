//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod appointment;
pub mod profile;
pub mod request;

// Re-exports per facilitare l'import
pub use appointment::{book_appointment, list_my_appointments};
pub use profile::{get_my_profile, get_profile_by_id, list_interpreters};
pub use request::{CALENDAR_TOKEN_HEADER, list_my_requests, respond_to_request};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
