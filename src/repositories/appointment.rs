//! AppointmentRepository - Repository per la gestione degli appuntamenti

use super::{Read, Update};
use crate::dtos::{CreateBookingDTO, UpdateAppointmentDTO};
use crate::entities::{Appointment, Request, RequestStatus};
use sqlx::{Error, MySqlPool};

pub struct AppointmentRepository {
    connection_pool: MySqlPool,
}

impl AppointmentRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    /// Appuntamenti prenotati da un profilo
    pub async fn find_many_by_profile(&self, profile_id: &i32) -> Result<Vec<Appointment>, Error> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, start_time, end_time, profile, meet_link
            FROM appointment
            WHERE profile = ?
            ORDER BY start_time
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(appointments)
    }

    /// Appuntamenti con una richiesta accettata dall'interprete
    pub async fn find_many_by_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<Appointment>, Error> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT a.id, a.start_time, a.end_time, a.profile, a.meet_link
            FROM appointment a
            JOIN request r ON r.appointment = a.id
            WHERE r.interpreter = ? AND r.accepted = TRUE
            ORDER BY a.start_time
            "#,
        )
        .bind(interpreter_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(appointments)
    }

    /// Inserisce l'appuntamento e la richiesta all'interprete in un'unica transazione
    pub async fn create_with_request(
        &self,
        data: &CreateBookingDTO,
    ) -> Result<(Appointment, Request), Error> {
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO appointment (start_time, end_time, profile) VALUES (?, ?, ?)",
        )
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.profile)
        .execute(&mut *tx)
        .await?;
        let appointment_id = result.last_insert_id() as i32;

        // accepted = NULL -> richiesta in attesa
        let result = sqlx::query(
            "INSERT INTO request (appointment, interpreter, accepted) VALUES (?, ?, NULL)",
        )
        .bind(appointment_id)
        .bind(data.interpreter_id)
        .execute(&mut *tx)
        .await?;
        let request_id = result.last_insert_id() as i32;

        tx.commit().await?;

        Ok((
            Appointment {
                id: appointment_id,
                start_time: data.start_time,
                end_time: data.end_time,
                profile: data.profile,
                meet_link: None,
            },
            Request {
                id: request_id,
                appointment: appointment_id,
                interpreter: data.interpreter_id,
                status: RequestStatus::Pending,
            },
        ))
    }
}

impl Read<Appointment, i32> for AppointmentRepository {
    async fn read(&self, id: &i32) -> Result<Option<Appointment>, Error> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "SELECT id, start_time, end_time, profile, meet_link FROM appointment WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(appointment)
    }
}

impl Update<Appointment, UpdateAppointmentDTO, i32> for AppointmentRepository {
    async fn update(&self, id: &i32, data: &UpdateAppointmentDTO) -> Result<Appointment, Error> {
        // First, get the current appointment to ensure it exists
        let current = self.read(id).await?.ok_or(sqlx::Error::RowNotFound)?;

        // start/end non si modificano: l'unico campo aggiornabile è il meet link
        if data.meet_link.is_none() {
            return Ok(current);
        }

        let mut query_builder = sqlx::QueryBuilder::new("UPDATE appointment SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(ref meet_link) = data.meet_link {
            separated.push("meet_link = ");
            separated.push_bind_unseparated(meet_link);
        }
        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);

        query_builder.build().execute(&self.connection_pool).await?;

        self.read(id).await?.ok_or(sqlx::Error::RowNotFound)
    }
}
