//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica tabella
//! (`profile`, `appointment`, `request`); `MySqlStore` li compone dietro il trait
//! `AppointmentStore`, che è l'unica cosa che vedono service e ciclo di vita delle richieste.

// ************************* NOTA SU SQLX ************************* //

/*
   Le query sono verificate a runtime (sqlx::query / sqlx::query_as con FromRow) e non con
   le macro query! / query_as!: così il crate compila anche senza un database raggiungibile.
   Il prezzo è che un errore di schema emerge solo eseguendo la query, per questo le
   colonne selezionate devono combaciare esattamente con i campi delle struct FromRow.
   Numero di righe -> metodo:
   nessuna (INSERT/UPDATE/DELETE)  .execute(...).await
   zero o una                      .fetch_optional(...).await
   esattamente una                 .fetch_one(...).await
   molte                           .fetch_all(...).await
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod appointment;
pub mod mysql;
pub mod profile;
pub mod request;
pub mod store;
pub mod traits;

// Re-esportazione dei trait per facilitare l'import
pub use store::{AppointmentStore, ExclusiveAccept};
pub use traits::{Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use appointment::AppointmentRepository;
pub use mysql::MySqlStore;
pub use profile::ProfileRepository;
pub use request::RequestRepository;
