//! Motor genérico de workflows.
//!
//! Un único intérprete recorre cualquier `WorkflowDefinition`: ejecuta el
//! step actual, resuelve la transición por la etiqueta emitida y corta el
//! turno al cruzar un step de pausa o un terminal. Toda la semántica
//! específica de un documento vive en la definición, nunca aquí.

pub mod core;

pub use core::{TurnOutcome, WorkflowEngine};
