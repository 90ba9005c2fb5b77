//! RequestRepository - Repository per le richieste agli interpreti

use super::{ExclusiveAccept, Read};
use crate::entities::{Request, RequestStatus, ScheduledRequest};
use crate::scheduling::detect_overlaps;
use chrono::{DateTime, Utc};
use sqlx::{Error, MySqlPool};

/// Riga della tabella `request` così come sta nel database
#[derive(sqlx::FromRow)]
struct RequestRow {
    id: i32,
    appointment: i32,
    interpreter: i32,
    accepted: Option<bool>,
}

impl From<RequestRow> for Request {
    fn from(row: RequestRow) -> Self {
        Self {
            id: row.id,
            appointment: row.appointment,
            interpreter: row.interpreter,
            status: RequestStatus::from(row.accepted),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ScheduledRequestRow {
    request_id: i32,
    appointment_id: i32,
    interpreter: i32,
    accepted: Option<bool>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    meet_link: Option<String>,
    counterpart_id: i32,
    counterpart_name: String,
    counterpart_email: String,
}

impl From<ScheduledRequestRow> for ScheduledRequest {
    fn from(row: ScheduledRequestRow) -> Self {
        Self {
            request_id: row.request_id,
            appointment_id: row.appointment_id,
            interpreter: row.interpreter,
            status: RequestStatus::from(row.accepted),
            start_time: row.start_time,
            end_time: row.end_time,
            meet_link: row.meet_link,
            counterpart_id: row.counterpart_id,
            counterpart_name: row.counterpart_name,
            counterpart_email: row.counterpart_email,
        }
    }
}

/// Richieste di un interprete con finestra dell'appuntamento e controparte
const SCHEDULED_BY_INTERPRETER: &str = r#"
    SELECT
        r.id AS request_id,
        r.appointment AS appointment_id,
        r.interpreter,
        r.accepted,
        a.start_time,
        a.end_time,
        a.meet_link,
        p.id AS counterpart_id,
        p.name AS counterpart_name,
        p.email AS counterpart_email
    FROM request r
    JOIN appointment a ON a.id = r.appointment
    JOIN profile p ON p.id = a.profile
    WHERE r.interpreter = ?
"#;

pub struct RequestRepository {
    connection_pool: MySqlPool,
}

impl RequestRepository {
    pub fn new(connection_pool: MySqlPool) -> Self {
        Self { connection_pool }
    }

    /// Richieste dell'interprete con finestra dell'appuntamento e dati della controparte
    pub async fn find_scheduled_by_interpreter(
        &self,
        interpreter_id: &i32,
    ) -> Result<Vec<ScheduledRequest>, Error> {
        let rows = sqlx::query_as::<_, ScheduledRequestRow>(&format!(
            "{} ORDER BY a.start_time, r.id",
            SCHEDULED_BY_INTERPRETER
        ))
        .bind(interpreter_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(rows.into_iter().map(ScheduledRequest::from).collect())
    }

    /// Aggiorna lo stato solo se quello attuale è `expected` (`<=>` confronta anche i NULL).
    /// Protegge solo la riga aggiornata: per accettare si usa `accept_exclusive`.
    pub async fn transition_status(
        &self,
        request_id: &i32,
        expected: RequestStatus,
        new_status: RequestStatus,
    ) -> Result<bool, Error> {
        let result =
            sqlx::query("UPDATE request SET accepted = ? WHERE id = ? AND accepted <=> ?")
                .bind(new_status.as_column())
                .bind(request_id)
                .bind(expected.as_column())
                .execute(&self.connection_pool)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Accetta la richiesta solo se nessuna richiesta accettata dello stesso interprete
    /// si sovrappone.
    ///
    /// Nella transazione le righe dell'interprete vengono lette con `FOR UPDATE`: due
    /// accettazioni concorrenti per lo stesso interprete si serializzano qui e la seconda
    /// vede la prima già accettata. L'interprete si legge senza lock (la colonna non cambia
    /// mai) così entrambe le transazioni bloccano le stesse righe nello stesso ordine.
    pub async fn accept_exclusive(&self, request_id: &i32) -> Result<ExclusiveAccept, Error> {
        let mut tx = self.connection_pool.begin().await?;

        let interpreter: Option<i32> =
            sqlx::query_scalar("SELECT interpreter FROM request WHERE id = ?")
                .bind(request_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(interpreter) = interpreter else {
            tx.rollback().await?;
            return Ok(ExclusiveAccept::NotPending);
        };

        let requests: Vec<ScheduledRequest> = sqlx::query_as::<_, ScheduledRequestRow>(
            &format!("{} ORDER BY a.start_time, r.id FOR UPDATE", SCHEDULED_BY_INTERPRETER),
        )
        .bind(interpreter)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(ScheduledRequest::from)
        .collect();

        let Some(candidate) = requests.iter().find(|r| r.request_id == *request_id) else {
            tx.rollback().await?;
            return Ok(ExclusiveAccept::NotPending);
        };
        if candidate.status != RequestStatus::Pending {
            tx.rollback().await?;
            return Ok(ExclusiveAccept::NotPending);
        }
        if let Some(blocking) = detect_overlaps(candidate, &requests)
            .into_iter()
            .find(|o| o.status == RequestStatus::Accepted)
        {
            tx.rollback().await?;
            return Ok(ExclusiveAccept::BlockedBy(blocking.request_id));
        }

        let result =
            sqlx::query("UPDATE request SET accepted = TRUE WHERE id = ? AND accepted IS NULL")
                .bind(request_id)
                .execute(&mut *tx)
                .await?;
        tx.commit().await?;

        if result.rows_affected() == 1 {
            Ok(ExclusiveAccept::Accepted)
        } else {
            Ok(ExclusiveAccept::NotPending)
        }
    }
}

impl Read<Request, i32> for RequestRepository {
    async fn read(&self, id: &i32) -> Result<Option<Request>, Error> {
        let row = sqlx::query_as::<_, RequestRow>(
            "SELECT id, appointment, interpreter, accepted FROM request WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(row.map(Request::from))
    }
}
