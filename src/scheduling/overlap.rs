//! Conflict detector - Rilevamento delle sovrapposizioni tra richieste dello stesso interprete
//!
//! Funzioni pure sulla lista di richieste passata in input: nessun accesso al database.

use crate::entities::{RequestStatus, ScheduledRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Finestra temporale di un appuntamento, intesa come intervallo aperto.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Due finestre che si toccano soltanto (`self.end == other.start`) non si sovrappongono.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl ScheduledRequest {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// Descrive un'altra richiesta dello stesso interprete che si sovrappone al candidato
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OverlapDescriptor {
    pub request_id: i32,
    pub counterpart_name: String,
    pub window: TimeWindow,
    pub status: RequestStatus,
}

impl From<&ScheduledRequest> for OverlapDescriptor {
    fn from(value: &ScheduledRequest) -> Self {
        Self {
            request_id: value.request_id,
            counterpart_name: value.counterpart_name.clone(),
            window: value.window(),
            status: value.status,
        }
    }
}

/// Richiesta arricchita con le sue sovrapposizioni
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestWithOverlaps {
    pub request: ScheduledRequest,
    pub overlaps: Vec<OverlapDescriptor>,
}

/// Restituisce le richieste di `requests` che occupano l'interprete del candidato
/// in un intervallo che interseca quello del candidato.
///
/// Il candidato stesso e le richieste già rifiutate vengono ignorati. Il risultato è
/// ordinato per orario di inizio crescente; a parità resta l'ordine di input.
pub fn detect_overlaps(
    candidate: &ScheduledRequest,
    requests: &[ScheduledRequest],
) -> Vec<OverlapDescriptor> {
    let window = candidate.window();
    let mut overlaps: Vec<OverlapDescriptor> = requests
        .iter()
        .filter(|other| other.request_id != candidate.request_id)
        .filter(|other| other.interpreter == candidate.interpreter)
        .filter(|other| other.status != RequestStatus::Rejected)
        .filter(|other| window.overlaps(&other.window()))
        .map(OverlapDescriptor::from)
        .collect();

    // sort_by_key è stabile
    overlaps.sort_by_key(|o| o.window.start);
    overlaps
}

/// Calcola le sovrapposizioni per ogni richiesta della lista
pub fn annotate_overlaps(requests: Vec<ScheduledRequest>) -> Vec<RequestWithOverlaps> {
    requests
        .iter()
        .map(|request| RequestWithOverlaps {
            request: request.clone(),
            overlaps: detect_overlaps(request, &requests),
        })
        .collect()
}
