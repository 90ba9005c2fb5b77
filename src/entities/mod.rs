//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database, tranne `ScheduledRequest` che è una vista
//! di lettura (join request + appointment + profile).

pub mod appointment;
pub mod enums;
pub mod profile;
pub mod request;

// Re-exports per facilitare l'import
pub use appointment::Appointment;
pub use enums::{ProfileKind, RequestStatus};
pub use profile::Profile;
pub use request::{Request, ScheduledRequest};
