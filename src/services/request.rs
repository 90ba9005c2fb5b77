//! Request services - Richieste ricevute dall'interprete, accettazione e rifiuto

use crate::core::{AppError, AppState, require_kind};
use crate::dtos::{AcceptedRequestDTO, RejectedRequestDTO, RequestDTO};
use crate::entities::{Profile, ProfileKind};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Header con il token OAuth del calendario dell'interprete
pub const CALENDAR_TOKEN_HEADER: &str = "x-calendar-token";

#[instrument(skip(state, current_profile), fields(profile_id = %current_profile.id))]
pub async fn list_my_requests(
    State(state): State<Arc<AppState>>,
    Extension(current_profile): Extension<Profile>,
) -> Result<Json<Vec<RequestDTO>>, AppError> {
    debug!("Listing requests for interpreter");
    // 1. Verificare che il profilo corrente sia un interprete
    // 2. Recuperare tutte le richieste indirizzate all'interprete
    // 3. Calcolare per ognuna le sovrapposizioni con le altre
    // 4. Ritornare la lista di RequestDTO come risposta JSON
    require_kind(&current_profile, ProfileKind::Interpreter)?;

    let requests = state.lifecycle.requests_for(&current_profile).await?;

    info!("Found {} requests", requests.len());
    Ok(Json(requests.into_iter().map(RequestDTO::from).collect()))
}

#[debug_handler]
#[instrument(skip(state, current_profile, headers), fields(profile_id = %current_profile.id))]
pub async fn respond_to_request(
    State(state): State<Arc<AppState>>,
    Path((request_id, action)): Path<(i32, String)>,
    Extension(current_profile): Extension<Profile>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    debug!("Responding to request");
    // 1. Estrarre request_id e action (accept/reject) dal path
    // 2. Ottenere il profilo corrente dall'Extension (autenticato tramite JWT)
    // 3. Validare che action sia "accept" o "reject"
    // 4. Verificare che il profilo sia un interprete
    // 5. Se accept: leggere il token del calendario dall'header, poi
    //    riunione -> codice sull'appuntamento -> richiesta accettata -> rifiuto a cascata
    // 6. Se reject: richiesta rifiutata, nessun contatto col calendario
    // 7. Ritornare l'esito insieme alla lista richieste aggiornata

    // Validare action prima di toccare qualsiasi dato
    let accept = match action.as_str() {
        "accept" => true,
        "reject" => false,
        _ => {
            warn!("Invalid request action: {}", action);
            return Err(AppError::bad_request("Action must be 'accept' or 'reject'"));
        }
    };

    require_kind(&current_profile, ProfileKind::Interpreter)?;

    if accept {
        let access_token = headers
            .get(CALENDAR_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());

        let outcome = state
            .lifecycle
            .accept_request(&current_profile, request_id, access_token)
            .await?;

        info!("Request {} accepted", request_id);
        Ok(Json(AcceptedRequestDTO::from(outcome)).into_response())
    } else {
        let outcome = state
            .lifecycle
            .reject_request(&current_profile, request_id)
            .await?;

        info!("Request {} rejected", request_id);
        Ok(Json(RejectedRequestDTO::from(outcome)).into_response())
    }
}
