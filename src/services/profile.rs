//! Profile services - Consultazione dei profili

use crate::core::{AppError, AppState};
use crate::dtos::ProfileDTO;
use crate::entities::Profile;
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(current_profile), fields(profile_id = %current_profile.id))]
pub async fn get_my_profile(
    Extension(current_profile): Extension<Profile>, // ottenuto dall'autenticazione tramite token jwt
) -> Result<Json<ProfileDTO>, AppError> {
    debug!("Returning authenticated profile");
    Ok(Json(ProfileDTO::from(current_profile)))
}

#[instrument(skip(state), fields(profile_id = %profile_id))]
pub async fn get_profile_by_id(
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<i32>, // parametro dalla URL /profiles/:profile_id
) -> Result<Json<ProfileDTO>, AppError> {
    debug!("Fetching profile by ID");
    // 1. Estrarre profile_id dal path della URL
    // 2. Cercare il profilo nel database
    // 3. Se non esiste ritornare NOT_FOUND
    // 4. Convertire in ProfileDTO e ritornarlo come JSON
    let profile = state.store.read_profile(&profile_id).await?.ok_or_else(|| {
        warn!("Profile not found: {}", profile_id);
        AppError::not_found("Profile not found")
    })?;

    info!("Profile found");
    Ok(Json(ProfileDTO::from(profile)))
}

#[instrument(skip(state))]
pub async fn list_interpreters(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProfileDTO>>, AppError> {
    debug!("Listing interpreters");
    let interpreters = state.store.list_interpreters().await?;
    info!("Found {} interpreters", interpreters.len());
    Ok(Json(
        interpreters.into_iter().map(ProfileDTO::from).collect(),
    ))
}
