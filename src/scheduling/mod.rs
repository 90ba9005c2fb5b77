//! Scheduling module - Rilevamento conflitti e ciclo di vita delle richieste
//!
//! - `overlap`: funzioni pure per trovare le richieste dello stesso interprete che si sovrappongono
//! - `lifecycle`: accettazione/rifiuto con rifiuto a cascata e creazione della riunione

pub mod error;
pub mod lifecycle;
pub mod overlap;

pub use error::SchedulingError;
pub use lifecycle::{
    AcceptOutcome, BatchOutcome, CascadeItem, CascadeOutcome, RejectOutcome, RequestLifecycle,
};
pub use overlap::{
    OverlapDescriptor, RequestWithOverlaps, TimeWindow, annotate_overlaps, detect_overlaps,
};
