use crate::core::{AppError, AppState};
use crate::entities::{Profile, ProfileKind};
use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// struct che codifica il contenuto del token jwt emesso dal backend di autenticazione
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub sub: String, // id del profilo
    #[serde(default)]
    pub email: Option<String>,
}

#[instrument(skip(secret), fields(profile_id = %profile_id))]
pub fn encode_jwt(profile_id: i32, email: &str, secret: &str) -> Result<String, AppError> {
    debug!("Encoding JWT token for profile");
    let now = Utc::now();
    let expire = Duration::hours(24);
    let claim = Claims {
        iat: now.timestamp() as usize,
        exp: (now + expire).timestamp() as usize,
        sub: profile_id.to_string(),
        email: Some(email.to_string()),
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        AppError::internal_server_error("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    debug!("Decoding JWT token");
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        AppError::unauthorized("Unable to decode token")
    })
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Empty header is not allowed")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::forbidden("Please add the JWT token to the header"));
        }
    };

    let mut header = auth_header.split_whitespace();
    let token = match (header.next(), header.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => {
            warn!("Authorization header is not a bearer token");
            return Err(AppError::unauthorized("Expected a Bearer token"));
        }
    };

    let token_data = decode_jwt(token, &state.jwt_secret)?;
    let profile_id: i32 = token_data.claims.sub.parse().map_err(|_| {
        warn!("Token subject is not a profile id: {}", token_data.claims.sub);
        AppError::unauthorized("You are not an authorized user")
    })?;

    // Fetch the profile details from the store
    let current_profile = match state.store.read_profile(&profile_id).await? {
        Some(profile) => {
            info!("Profile authenticated: {}", profile.id);
            profile
        }
        None => {
            warn!("Profile not found in store: {}", profile_id);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };
    req.extensions_mut().insert(current_profile);
    // gli handler recuperano il profilo con Extension<Profile>
    Ok(next.run(req).await)
}

/// Helper function per verificare che il profilo sia del tipo richiesto
///
/// # Arguments
/// * `profile` - Il profilo autenticato
/// * `kind` - Tipo di profilo ammesso per l'operazione
///
/// # Returns
/// * `Ok(())` se il tipo coincide
/// * `Err(AppError)` FORBIDDEN altrimenti
pub fn require_kind(profile: &Profile, kind: ProfileKind) -> Result<(), AppError> {
    if profile.kind != kind {
        warn!(
            "Profile {} has kind {:?}, required {:?}",
            profile.id, profile.kind, kind
        );
        return Err(AppError::forbidden("Operation not allowed for this profile")
            .with_details(format!("This action requires a {:?} profile", kind)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = encode_jwt(7, "interprete@example.com", "segreto-a").unwrap();

        let decoded = decode_jwt(&token, "segreto-a").unwrap();
        assert_eq!(decoded.claims.sub, "7");

        let err = decode_jwt(&token, "segreto-b").unwrap_err();
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
    }
}
