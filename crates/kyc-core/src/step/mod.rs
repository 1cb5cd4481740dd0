//! Steps: la unidad ejecutable de un workflow.
//!
//! Un step es una transformación pura de (estado de instancia, input del
//! turno) en (parche de payload, decisión opcional, fragmento de mensaje).
//! Los efectos colaterales permitidos (validadores, lookups, OCR) viven
//! dentro de `StepHandler::execute`; el traversal del motor nunca los invoca
//! directamente.

pub mod handler;
pub mod retry;

pub use handler::{StepContext, StepHandler, StepOutcome};
pub use retry::{RetryCounters, RetryLimits};

use serde::{Deserialize, Serialize};

/// Clase de un step terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalKind {
    Success,
    Failure,
}
