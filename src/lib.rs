//! Server library - espone i moduli principali per i test

pub mod calendar;
pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod scheduling;
pub mod services;

// Re-export dei tipi principali per facilitare l'import
pub use crate::core::{AppError, AppState, auth, config};
pub use crate::services::root;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/profiles", configure_profile_routes(state.clone()))
        .nest("/appointments", configure_appointment_routes(state.clone()))
        .nest("/requests", configure_request_routes(state.clone()))
        .with_state(state)
}

/// Configura le routes per la consultazione dei profili
fn configure_profile_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/me", get(get_my_profile))
        .route("/interpreters", get(list_interpreters))
        .route("/{profile_id}", get(get_profile_by_id))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per prenotazioni e appuntamenti
fn configure_appointment_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", get(list_my_appointments).post(book_appointment))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Configura le routes per le richieste ricevute dagli interpreti
fn configure_request_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::*;

    Router::new()
        .route("/", get(list_my_requests))
        .route("/{request_id}/{action}", post(respond_to_request))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
