//! Registro append-only de lo que hizo el motor.
//!
//! Los eventos son telemetría estructural, no estado: el checkpoint manda
//! para retomar, los eventos cuentan la historia del run. Por eso nunca
//! llevan payload de usuario (números de documento, nombres), solo ids de
//! step, etiquetas y contadores.

pub mod store;
pub mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{event_variants, WorkflowEvent, WorkflowEventKind};
