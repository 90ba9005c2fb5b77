//! Calendar module - Creazione delle riunioni sul calendario esterno
//!
//! Il provisioner crea un evento con videoconferenza e restituisce il link di accesso.
//! Nel database si salva solo il codice della riunione, cioè l'ultimo segmento del link.

pub mod google;

use crate::scheduling::TimeWindow;
use async_trait::async_trait;
use thiserror::Error;

pub use google::GoogleCalendarClient;

/// Base degli URL di accesso alle riunioni Google Meet
pub const MEET_BASE_URL: &str = "https://meet.google.com";

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar access token rejected ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    #[error("calendar API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("calendar response carries no conferencing data")]
    MissingConference,

    #[error("calendar response could not be parsed: {0}")]
    InvalidResponse(String),

    #[error("meeting link has no join code: {0}")]
    InvalidLink(String),

    #[error("calendar request failed: {0}")]
    Transport(String),
}

/// Dati necessari a creare la riunione per un appuntamento
#[derive(Debug, Clone)]
pub struct MeetingRequest {
    pub access_token: String,
    /// Chiave univoca della richiesta di conferenza (una per richiesta di appuntamento)
    pub request_key: String,
    pub summary: String,
    pub window: TimeWindow,
    pub attendee_email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedMeeting {
    pub event_id: Option<String>,
    pub link: String,
}

impl ProvisionedMeeting {
    pub fn join_code(&self) -> Result<String, CalendarError> {
        join_code(&self.link)
    }
}

#[async_trait]
pub trait CalendarProvisioner: Send + Sync {
    /// Crea l'evento con videoconferenza. Nessun retry: gli errori vengono propagati.
    async fn create_meeting(
        &self,
        request: &MeetingRequest,
    ) -> Result<ProvisionedMeeting, CalendarError>;
}

/// Estrae il codice della riunione (ultimo segmento non vuoto del path) da un link
pub fn join_code(link: &str) -> Result<String, CalendarError> {
    let url = reqwest::Url::parse(link).map_err(|_| CalendarError::InvalidLink(link.to_string()))?;
    url.path_segments()
        .and_then(|segments| segments.rev().find(|s| !s.is_empty()))
        .map(str::to_string)
        .ok_or_else(|| CalendarError::InvalidLink(link.to_string()))
}

/// Ricostruisce l'URL di accesso a partire dal codice salvato
pub fn join_url(code: &str) -> String {
    format!("{}/{}", MEET_BASE_URL, code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_code_is_last_path_segment() {
        assert_eq!(
            join_code("https://meet.google.com/abc-defg-hij").unwrap(),
            "abc-defg-hij"
        );
        assert_eq!(
            join_code("https://meet.google.com/lookup/xyz-abcd-efg/?authuser=0").unwrap(),
            "xyz-abcd-efg"
        );
    }

    #[test]
    fn join_code_rejects_links_without_path() {
        assert!(matches!(
            join_code("https://meet.google.com/"),
            Err(CalendarError::InvalidLink(_))
        ));
        assert!(matches!(join_code("not a url"), Err(CalendarError::InvalidLink(_))));
    }

    #[test]
    fn join_url_rebuilds_meet_link() {
        assert_eq!(join_url("abc-defg-hij"), "https://meet.google.com/abc-defg-hij");
    }
}
