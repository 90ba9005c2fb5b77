//! Request entity - Richiesta a un interprete di prendere un appuntamento

use super::enums::RequestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub id: i32,
    pub appointment: i32,
    pub interpreter: i32,
    pub status: RequestStatus,
}

/// Vista di lettura: richiesta + finestra temporale dell'appuntamento + controparte.
/// È quello che serve al rilevamento delle sovrapposizioni e alla lista richieste.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScheduledRequest {
    pub request_id: i32,
    pub appointment_id: i32,
    pub interpreter: i32,
    pub status: RequestStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub meet_link: Option<String>,
    pub counterpart_id: i32,
    pub counterpart_name: String,
    pub counterpart_email: String,
}
