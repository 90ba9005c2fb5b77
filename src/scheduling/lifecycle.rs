//! RequestLifecycle - Accettazione e rifiuto delle richieste agli interpreti
//!
//! Transizioni ammesse: `Pending -> Accepted` e `Pending -> Rejected`, entrambe terminali.
//! Il profilo del chiamante e il token del calendario sono parametri espliciti delle
//! operazioni: nessuno stato di sessione globale.

use super::error::SchedulingError;
use super::overlap::{OverlapDescriptor, RequestWithOverlaps, annotate_overlaps, detect_overlaps};
use crate::calendar::{CalendarProvisioner, MeetingRequest};
use crate::entities::{Profile, RequestStatus, ScheduledRequest};
use crate::repositories::{AppointmentStore, ExclusiveAccept};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Esito del rifiuto a cascata per una singola richiesta sovrapposta
#[derive(Debug, Clone, PartialEq)]
pub enum CascadeOutcome {
    Rejected,
    /// La richiesta non era più in attesa quando è stata raggiunta
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CascadeItem {
    pub request_id: i32,
    pub outcome: CascadeOutcome,
}

/// Risultato del batch di rifiuti: un esito per ogni richiesta, mai tutto-o-niente
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub items: Vec<CascadeItem>,
}

impl BatchOutcome {
    pub fn rejected_ids(&self) -> Vec<i32> {
        self.items
            .iter()
            .filter(|item| item.outcome == CascadeOutcome::Rejected)
            .map(|item| item.request_id)
            .collect()
    }

    pub fn failures(&self) -> Vec<&CascadeItem> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, CascadeOutcome::Failed(_)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AcceptOutcome {
    pub request_id: i32,
    pub appointment_id: i32,
    pub join_code: String,
    pub cascade: BatchOutcome,
    /// Lista richieste dell'interprete ricaricata dopo le modifiche
    pub requests: Vec<RequestWithOverlaps>,
}

#[derive(Debug, Clone)]
pub struct RejectOutcome {
    pub request_id: i32,
    pub requests: Vec<RequestWithOverlaps>,
}

pub struct RequestLifecycle {
    store: Arc<dyn AppointmentStore>,
    calendar: Arc<dyn CalendarProvisioner>,
}

impl RequestLifecycle {
    pub fn new(store: Arc<dyn AppointmentStore>, calendar: Arc<dyn CalendarProvisioner>) -> Self {
        Self { store, calendar }
    }

    /// Lista delle richieste dell'interprete, ognuna con le proprie sovrapposizioni
    pub async fn requests_for(
        &self,
        interpreter: &Profile,
    ) -> Result<Vec<RequestWithOverlaps>, SchedulingError> {
        let requests = self
            .store
            .find_requests_for_interpreter(&interpreter.id)
            .await?;
        Ok(annotate_overlaps(requests))
    }

    /// Accetta una richiesta in attesa.
    ///
    /// Ordine dei passi:
    /// 1. creazione della riunione sul calendario (un errore qui interrompe tutto prima di scrivere)
    /// 2. salvataggio del codice della riunione sull'appuntamento
    /// 3. richiesta -> `Accepted`, rifiutata dallo store se nel frattempo è stata accettata
    ///    una richiesta sovrapposta
    /// 4. tutte le richieste sovrapposte in attesa -> `Rejected`, in parallelo
    /// 5. ricarica della lista richieste
    ///
    /// Gli errori nei passi 2-3 vengono propagati senza annullare quanto già scritto.
    #[instrument(skip(self, interpreter, access_token), fields(interpreter_id = %interpreter.id))]
    pub async fn accept_request(
        &self,
        interpreter: &Profile,
        request_id: i32,
        access_token: Option<&str>,
    ) -> Result<AcceptOutcome, SchedulingError> {
        debug!("Accepting request");
        let (candidate, requests) = self.load_pending(interpreter, request_id).await?;
        let overlaps = detect_overlaps(&candidate, &requests);

        // due richieste accettate e sovrapposte per lo stesso interprete non devono esistere
        if let Some(accepted) = overlaps
            .iter()
            .find(|o| o.status == RequestStatus::Accepted)
        {
            warn!(
                "Request {} overlaps accepted request {}",
                request_id, accepted.request_id
            );
            return Err(SchedulingError::AcceptedOverlap {
                request_id,
                accepted_request_id: accepted.request_id,
            });
        }

        let access_token = access_token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                warn!("Calendar access token missing, aborting before any change");
                SchedulingError::MissingAccessToken
            })?;

        // (a) riunione sul calendario
        let meeting = self
            .calendar
            .create_meeting(&MeetingRequest {
                access_token: access_token.to_string(),
                request_key: format!("request-{}", candidate.request_id),
                summary: format!("Interpreting session with {}", candidate.counterpart_name),
                window: candidate.window(),
                attendee_email: candidate.counterpart_email.clone(),
            })
            .await?;
        let join_code = meeting.join_code()?;
        debug!("Meeting provisioned with code {}", join_code);

        // (b) codice sull'appuntamento
        self.store
            .update_meet_link(&candidate.appointment_id, &join_code)
            .await
            .inspect_err(|e| {
                error!(
                    "Failed to store meet link on appointment {}: {}",
                    candidate.appointment_id, e
                )
            })?;

        // (c) richiesta accettata, solo se ancora in attesa e senza sovrapposizioni accettate
        // nel frattempo (un'altra accettazione concorrente può aver vinto)
        let accepted = self
            .store
            .accept_exclusive(&request_id)
            .await
            .inspect_err(|e| error!("Failed to mark request {} as accepted: {}", request_id, e))?;
        match accepted {
            ExclusiveAccept::Accepted => {}
            ExclusiveAccept::NotPending => {
                warn!("Request {} is no longer pending, meet link already stored", request_id);
                return Err(SchedulingError::StaleTransition(request_id));
            }
            ExclusiveAccept::BlockedBy(accepted_request_id) => {
                warn!(
                    "Request {} overlaps request {} accepted concurrently",
                    request_id, accepted_request_id
                );
                return Err(SchedulingError::AcceptedOverlap {
                    request_id,
                    accepted_request_id,
                });
            }
        }

        // (d) rifiuto a cascata
        let cascade = self.reject_overlaps(&overlaps).await;
        if !cascade.is_complete() {
            error!(
                "{} overlapping requests could not be rejected",
                cascade.failures().len()
            );
        }

        // (e) stato aggiornato
        let requests = self.requests_for(interpreter).await?;

        info!(
            "Request accepted, {} overlapping requests rejected",
            cascade.rejected_ids().len()
        );
        Ok(AcceptOutcome {
            request_id,
            appointment_id: candidate.appointment_id,
            join_code,
            cascade,
            requests,
        })
    }

    /// Rifiuta una richiesta in attesa. Nessuna interazione con il calendario.
    #[instrument(skip(self, interpreter), fields(interpreter_id = %interpreter.id))]
    pub async fn reject_request(
        &self,
        interpreter: &Profile,
        request_id: i32,
    ) -> Result<RejectOutcome, SchedulingError> {
        debug!("Rejecting request");
        self.check_pending(interpreter, request_id).await?;

        let rejected = self
            .store
            .transition_request(&request_id, RequestStatus::Pending, RequestStatus::Rejected)
            .await?;
        if !rejected {
            warn!("Request {} changed status before it could be rejected", request_id);
            return Err(SchedulingError::StaleTransition(request_id));
        }

        let requests = self.requests_for(interpreter).await?;

        info!("Request rejected");
        Ok(RejectOutcome {
            request_id,
            requests,
        })
    }

    /// Verifica esistenza, destinatario e stato `Pending` della richiesta
    async fn check_pending(
        &self,
        interpreter: &Profile,
        request_id: i32,
    ) -> Result<(), SchedulingError> {
        let request = self
            .store
            .read_request(&request_id)
            .await?
            .ok_or_else(|| {
                warn!("Request not found: {}", request_id);
                SchedulingError::RequestNotFound(request_id)
            })?;

        if request.interpreter != interpreter.id {
            warn!(
                "Profile {} attempted to handle request for interpreter {}",
                interpreter.id, request.interpreter
            );
            return Err(SchedulingError::NotRecipient {
                request_id,
                profile_id: interpreter.id,
            });
        }

        if request.status.is_terminal() {
            warn!("Request {} is already processed: {:?}", request_id, request.status);
            return Err(SchedulingError::NotPending {
                request_id,
                status: request.status,
            });
        }

        Ok(())
    }

    /// Come `check_pending`, in più restituisce la richiesta e l'elenco completo
    /// delle richieste dell'interprete su cui calcolare le sovrapposizioni
    async fn load_pending(
        &self,
        interpreter: &Profile,
        request_id: i32,
    ) -> Result<(ScheduledRequest, Vec<ScheduledRequest>), SchedulingError> {
        self.check_pending(interpreter, request_id).await?;

        let requests = self
            .store
            .find_requests_for_interpreter(&interpreter.id)
            .await?;
        let candidate = requests
            .iter()
            .find(|r| r.request_id == request_id)
            .cloned()
            .ok_or(SchedulingError::RequestNotFound(request_id))?;

        Ok((candidate, requests))
    }

    /// Porta a `Rejected` le sovrapposizioni ancora in attesa. Le chiamate partono tutte
    /// insieme e si attende la fine di ognuna; l'ordine tra loro non conta perché ognuna
    /// tocca una riga diversa.
    async fn reject_overlaps(&self, overlaps: &[OverlapDescriptor]) -> BatchOutcome {
        let updates = overlaps
            .iter()
            .filter(|o| o.status == RequestStatus::Pending)
            .map(|o| async move {
                let outcome = match self
                    .store
                    .transition_request(&o.request_id, RequestStatus::Pending, RequestStatus::Rejected)
                    .await
                {
                    Ok(true) => CascadeOutcome::Rejected,
                    Ok(false) => {
                        warn!("Overlapping request {} was no longer pending", o.request_id);
                        CascadeOutcome::Skipped
                    }
                    Err(e) => {
                        error!("Failed to reject overlapping request {}: {}", o.request_id, e);
                        CascadeOutcome::Failed(e.to_string())
                    }
                };
                CascadeItem {
                    request_id: o.request_id,
                    outcome,
                }
            });

        BatchOutcome {
            items: join_all(updates).await,
        }
    }
}
