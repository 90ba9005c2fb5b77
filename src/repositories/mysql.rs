//! MySqlStore - Implementazione di `AppointmentStore` sopra i repository MySQL

use super::{
    AppointmentRepository, AppointmentStore, ExclusiveAccept, ProfileRepository, Read,
    RequestRepository, Update,
};
use crate::dtos::{CreateBookingDTO, UpdateAppointmentDTO};
use crate::entities::{Appointment, Profile, Request, RequestStatus, ScheduledRequest};
use async_trait::async_trait;
use sqlx::MySqlPool;

pub struct MySqlStore {
    /// Repository per la lettura dei profili
    pub profile: ProfileRepository,

    /// Repository per la gestione degli appuntamenti
    pub appointment: AppointmentRepository,

    /// Repository per la gestione delle richieste
    pub request: RequestRepository,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            profile: ProfileRepository::new(pool.clone()),
            appointment: AppointmentRepository::new(pool.clone()),
            request: RequestRepository::new(pool),
        }
    }
}

#[async_trait]
impl AppointmentStore for MySqlStore {
    async fn read_profile(&self, id: &i32) -> Result<Option<Profile>, sqlx::Error> {
        self.profile.read(id).await
    }

    async fn list_interpreters(&self) -> Result<Vec<Profile>, sqlx::Error> {
        self.profile.find_interpreters().await
    }

    async fn read_request(&self, id: &i32) -> Result<Option<Request>, sqlx::Error> {
        self.request.read(id).await
    }

    async fn find_requests_for_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<ScheduledRequest>, sqlx::Error> {
        self.request.find_scheduled_by_interpreter(interpreter_id).await
    }

    async fn find_appointments_by_profile(
        &self,
        profile_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        self.appointment.find_many_by_profile(profile_id).await
    }

    async fn find_appointments_by_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<Appointment>, sqlx::Error> {
        self.appointment.find_many_by_interpreter(interpreter_id).await
    }

    async fn create_booking(
        &self,
        data: &CreateBookingDTO,
    ) -> Result<(Appointment, Request), sqlx::Error> {
        self.appointment.create_with_request(data).await
    }

    async fn update_meet_link(
        &self,
        appointment_id: &i32,
        meet_link: &str,
    ) -> Result<(), sqlx::Error> {
        self.appointment
            .update(
                appointment_id,
                &UpdateAppointmentDTO {
                    meet_link: Some(meet_link.to_string()),
                },
            )
            .await?;
        Ok(())
    }

    async fn transition_request(
        &self,
        request_id: &i32,
        expected: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<bool, sqlx::Error> {
        self.request
            .transition_status(request_id, expected, new_status)
            .await
    }

    async fn accept_exclusive(&self, request_id: &i32) -> Result<ExclusiveAccept, sqlx::Error> {
        self.request.accept_exclusive(request_id).await
    }
}
