//! AppointmentStore - Interfaccia dello store usata dal ciclo di vita delle richieste
//!
//! È il confine verso il database: i service e `RequestLifecycle` dipendono solo da questo
//! trait, così nei test si può sostituire MySQL con uno store in memoria.

use crate::dtos::CreateBookingDTO;
use crate::entities::{Appointment, Profile, Request, RequestStatus, ScheduledRequest};
use async_trait::async_trait;

/// Esito dell'accettazione esclusiva di una richiesta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusiveAccept {
    Accepted,
    /// La richiesta non esiste o non è più in attesa
    NotPending,
    /// Un'altra richiesta accettata dello stesso interprete si sovrappone (id)
    BlockedBy(i32),
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn read_profile(&self, id: &i32) -> Result<Option<Profile>, sqlx::Error>;

    async fn list_interpreters(&self) -> Result<Vec<Profile>, sqlx::Error>;

    async fn read_request(&self, id: &i32) -> Result<Option<Request>, sqlx::Error>;

    /// Tutte le richieste indirizzate all'interprete, con finestra e controparte,
    /// ordinate per orario di inizio
    async fn find_requests_for_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<ScheduledRequest>, sqlx::Error>;

    /// Appuntamenti prenotati dal profilo (lato persona sorda)
    async fn find_appointments_by_profile(
        &self,
        profile_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error>;

    /// Appuntamenti per cui l'interprete ha una richiesta accettata
    async fn find_appointments_by_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error>;

    /// Crea appuntamento e richiesta (in attesa) nella stessa transazione
    async fn create_booking(
        &self,
        data: &CreateBookingDTO,
    ) -> Result<(Appointment, Request), sqlx::Error>;

    async fn update_meet_link(&self, appointment_id: &i32, meet_link: &str)
    -> Result<(), sqlx::Error>;

    /// Transizione condizionale dello stato: applicata solo se lo stato attuale è `expected`.
    ///
    /// # Returns
    /// * `Ok(true)` - transizione applicata
    /// * `Ok(false)` - la richiesta non esiste o non era più nello stato atteso
    async fn transition_request(
        &self,
        request_id: &i32,
        expected: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<bool, sqlx::Error>;

    /// `Pending -> Accepted` solo se, nello stesso istante, nessuna richiesta accettata
    /// dello stesso interprete si sovrappone. Verifica e scrittura sono atomiche rispetto
    /// ad altre accettazioni per lo stesso interprete.
    async fn accept_exclusive(&self, request_id: &i32) -> Result<ExclusiveAccept, sqlx::Error>;
}
