//! Appointment services - Prenotazioni e appuntamenti

use crate::core::{AppError, AppState, require_kind};
use crate::dtos::{AppointmentDTO, BookAppointmentDTO, BookingDTO, CreateBookingDTO};
use crate::entities::{Profile, ProfileKind};
use axum::{
    Extension,
    extract::{Json, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, current_profile), fields(profile_id = %current_profile.id, kind = ?current_profile.kind))]
pub async fn list_my_appointments(
    State(state): State<Arc<AppState>>,
    Extension(current_profile): Extension<Profile>,
) -> Result<Json<Vec<AppointmentDTO>>, AppError> {
    debug!("Listing appointments for profile");
    // persona sorda: appuntamenti che ha prenotato
    // interprete: appuntamenti per cui ha accettato la richiesta
    let appointments = match current_profile.kind {
        ProfileKind::DeafUser => {
            state
                .store
                .find_appointments_by_profile(&current_profile.id)
                .await?
        }
        ProfileKind::Interpreter => {
            state
                .store
                .find_appointments_by_interpreter(&current_profile.id)
                .await?
        }
    };

    info!("Found {} appointments", appointments.len());
    Ok(Json(
        appointments.into_iter().map(AppointmentDTO::from).collect(),
    ))
}

#[debug_handler]
#[instrument(skip(state, current_profile, body), fields(profile_id = %current_profile.id, interpreter_id = %body.interpreter_id))]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(current_profile): Extension<Profile>,
    Json(body): Json<BookAppointmentDTO>,
) -> Result<(StatusCode, Json<BookingDTO>), AppError> {
    debug!("Booking appointment");
    // 1. Verificare che il profilo corrente sia una persona sorda
    // 2. Validare il body (fine successiva all'inizio)
    // 3. Verificare che l'interprete esista e sia davvero un interprete
    // 4. Creare appuntamento e richiesta in attesa nella stessa transazione
    // 5. Ritornare la prenotazione con stato CREATED
    //
    // Le sovrapposizioni sono ammesse qui: vengono risolte quando l'interprete accetta.

    require_kind(&current_profile, ProfileKind::DeafUser)?;
    body.validate()?;

    let interpreter = state
        .store
        .read_profile(&body.interpreter_id)
        .await?
        .ok_or_else(|| {
            warn!("Interpreter not found: {}", body.interpreter_id);
            AppError::not_found("Interpreter not found")
        })?;
    if !interpreter.is_interpreter() {
        warn!("Profile {} is not an interpreter", interpreter.id);
        return Err(AppError::bad_request("Selected profile is not an interpreter"));
    }

    let booking = state
        .store
        .create_booking(&CreateBookingDTO {
            profile: current_profile.id,
            interpreter_id: interpreter.id,
            start_time: body.start_time,
            end_time: body.end_time,
        })
        .await?;

    info!(
        "Appointment {} booked with request {}",
        booking.0.id, booking.1.id
    );
    Ok((StatusCode::CREATED, Json(BookingDTO::from(booking))))
}
