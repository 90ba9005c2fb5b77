//! Request DTOs - Data Transfer Objects per richieste, sovrapposizioni ed esiti

use crate::calendar::join_url;
use crate::entities::RequestStatus;
use crate::scheduling::{
    AcceptOutcome, CascadeItem, CascadeOutcome, OverlapDescriptor, RejectOutcome,
    RequestWithOverlaps,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CounterpartDTO {
    pub id: i32,
    pub name: String,
}

/// Altra richiesta dello stesso interprete che si sovrappone
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OverlapDTO {
    pub request_id: i32,
    pub counterpart_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: RequestStatus,
}

impl From<OverlapDescriptor> for OverlapDTO {
    fn from(value: OverlapDescriptor) -> Self {
        Self {
            request_id: value.request_id,
            counterpart_name: value.counterpart_name,
            start_time: value.window.start,
            end_time: value.window.end,
            status: value.status,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RequestDTO {
    pub request_id: i32,
    pub appointment_id: i32,
    pub status: RequestStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub counterpart: CounterpartDTO,
    pub meet_url: Option<String>,
    pub overlaps: Vec<OverlapDTO>,
}

impl From<RequestWithOverlaps> for RequestDTO {
    fn from(value: RequestWithOverlaps) -> Self {
        let request = value.request;
        Self {
            request_id: request.request_id,
            appointment_id: request.appointment_id,
            status: request.status,
            start_time: request.start_time,
            end_time: request.end_time,
            counterpart: CounterpartDTO {
                id: request.counterpart_id,
                name: request.counterpart_name,
            },
            meet_url: request.meet_link.as_deref().map(join_url),
            overlaps: value.overlaps.into_iter().map(OverlapDTO::from).collect(),
        }
    }
}

/// Esito del rifiuto a cascata, serializzato in minuscolo ("rejected", "skipped", "failed")
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CascadeStatus {
    Rejected,
    Skipped,
    Failed,
}

/// Esito del rifiuto a cascata di una richiesta sovrapposta
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CascadeItemDTO {
    pub request_id: i32,
    pub outcome: CascadeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<CascadeItem> for CascadeItemDTO {
    fn from(value: CascadeItem) -> Self {
        let (outcome, reason) = match value.outcome {
            CascadeOutcome::Rejected => (CascadeStatus::Rejected, None),
            CascadeOutcome::Skipped => (CascadeStatus::Skipped, None),
            CascadeOutcome::Failed(reason) => (CascadeStatus::Failed, Some(reason)),
        };
        Self {
            request_id: value.request_id,
            outcome,
            reason,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AcceptedRequestDTO {
    pub request_id: i32,
    pub appointment_id: i32,
    pub meet_url: String,
    pub cascade: Vec<CascadeItemDTO>,
    pub requests: Vec<RequestDTO>,
}

impl From<AcceptOutcome> for AcceptedRequestDTO {
    fn from(value: AcceptOutcome) -> Self {
        Self {
            request_id: value.request_id,
            appointment_id: value.appointment_id,
            meet_url: join_url(&value.join_code),
            cascade: value
                .cascade
                .items
                .into_iter()
                .map(CascadeItemDTO::from)
                .collect(),
            requests: value.requests.into_iter().map(RequestDTO::from).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RejectedRequestDTO {
    pub request_id: i32,
    pub requests: Vec<RequestDTO>,
}

impl From<RejectOutcome> for RejectedRequestDTO {
    fn from(value: RejectOutcome) -> Self {
        Self {
            request_id: value.request_id,
            requests: value.requests.into_iter().map(RequestDTO::from).collect(),
        }
    }
}
