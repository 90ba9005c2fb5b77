//! Appointment entity - Sessione fissata tra una persona sorda e un interprete

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Appointment {
    pub id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub profile: i32, // la controparte, cioè chi ha prenotato
    // solo il codice della riunione (ultimo segmento del link), non l'URL completo
    pub meet_link: Option<String>,
}
