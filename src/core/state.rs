//! Application State - Stato globale dell'applicazione
//!
//! Contiene lo store, il provisioner del calendario, il ciclo di vita delle richieste
//! e la configurazione condivisa tra tutte le route e middleware.

use crate::calendar::{CalendarError, CalendarProvisioner, GoogleCalendarClient};
use crate::core::Config;
use crate::repositories::{AppointmentStore, MySqlStore};
use crate::scheduling::RequestLifecycle;
use sqlx::MySqlPool;
use std::sync::Arc;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    /// Store di profili, appuntamenti e richieste
    pub store: Arc<dyn AppointmentStore>,

    /// Accettazione/rifiuto delle richieste (usa lo stesso store)
    pub lifecycle: RequestLifecycle,

    /// Secret key per validare i JWT token
    pub jwt_secret: String,
}

impl AppState {
    /// Crea lo stato di produzione: store MySQL e Google Calendar.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni MySQL condiviso
    /// * `config` - Configurazione caricata da ambiente
    pub fn new(pool: MySqlPool, config: &Config) -> Result<Self, CalendarError> {
        let calendar = GoogleCalendarClient::from_config(config)?;
        Ok(Self::with_backends(
            Arc::new(MySqlStore::new(pool)),
            Arc::new(calendar),
            config.jwt_secret.clone(),
        ))
    }

    /// Crea lo stato con store e provisioner arbitrari (usato dai test)
    pub fn with_backends(
        store: Arc<dyn AppointmentStore>,
        calendar: Arc<dyn CalendarProvisioner>,
        jwt_secret: String,
    ) -> Self {
        Self {
            lifecycle: RequestLifecycle::new(store.clone(), calendar),
            store,
            jwt_secret,
        }
    }
}
