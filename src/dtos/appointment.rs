//! Appointment DTOs - Data Transfer Objects per appuntamenti e prenotazioni

use crate::calendar::join_url;
use crate::entities::{Appointment, Request, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppointmentDTO {
    pub id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub profile: i32,
    pub meet_code: Option<String>,
    pub meet_url: Option<String>,
}

impl From<Appointment> for AppointmentDTO {
    fn from(value: Appointment) -> Self {
        Self {
            id: value.id,
            start_time: value.start_time,
            end_time: value.end_time,
            profile: value.profile,
            meet_url: value.meet_link.as_deref().map(join_url),
            meet_code: value.meet_link,
        }
    }
}

/// Body della prenotazione inviato dal client (il profilo che prenota è quello autenticato)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = "validate_booking_window"))]
pub struct BookAppointmentDTO {
    #[validate(range(min = 1, message = "interpreter_id must be a valid profile id"))]
    pub interpreter_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

fn validate_booking_window(dto: &BookAppointmentDTO) -> Result<(), ValidationError> {
    if dto.end_time <= dto.start_time {
        let mut err = ValidationError::new("booking_window");
        err.message = Some("end_time must be after start_time".into());
        return Err(err);
    }
    Ok(())
}

/// DTO per creare appuntamento + richiesta (senza id, gestiti dal DB)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateBookingDTO {
    pub profile: i32,
    pub interpreter_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// DTO per aggiornare un appuntamento (solo il meet link è modificabile)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateAppointmentDTO {
    pub meet_link: Option<String>,
}

/// Risposta alla prenotazione
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BookingDTO {
    pub appointment: AppointmentDTO,
    pub request_id: i32,
    pub interpreter_id: i32,
    pub status: RequestStatus,
}

impl From<(Appointment, Request)> for BookingDTO {
    fn from((appointment, request): (Appointment, Request)) -> Self {
        Self {
            appointment: appointment.into(),
            request_id: request.id,
            interpreter_id: request.interpreter,
            status: request.status,
        }
    }
}
