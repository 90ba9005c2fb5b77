//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod appointment;
pub mod profile;
pub mod request;

pub use appointment::{
    AppointmentDTO, BookAppointmentDTO, BookingDTO, CreateBookingDTO, UpdateAppointmentDTO,
};
pub use profile::ProfileDTO;
pub use request::{
    AcceptedRequestDTO, CascadeItemDTO, CascadeStatus, CounterpartDTO, OverlapDTO,
    RejectedRequestDTO, RequestDTO,
};
