//! Tipos de evento.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Decision, StepId, WorkflowStatus};

/// Qué pasó dentro de un run. Libre de PII por construcción.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEventKind {
    RunStarted {
        workflow: String,
        definition_hash: String,
    },
    Resumed {
        step: StepId,
    },
    StepExecuted {
        step: StepId,
        decision: Option<Decision>,
    },
    RetryRecorded {
        phase: String,
        attempt: u32,
    },
    PausedForInput {
        next: StepId,
    },
    RunFinished {
        status: WorkflowStatus,
    },
}

impl WorkflowEventKind {
    /// Letra compacta para trazas y asserts de tests.
    pub fn letter(&self) -> char {
        match self {
            WorkflowEventKind::RunStarted { .. } => 'S',
            WorkflowEventKind::Resumed { .. } => 'R',
            WorkflowEventKind::StepExecuted { .. } => 'X',
            WorkflowEventKind::RetryRecorded { .. } => 'T',
            WorkflowEventKind::PausedForInput { .. } => 'P',
            WorkflowEventKind::RunFinished { .. } => 'F',
        }
    }
}

/// Evento sellado por el store: posición en el run y timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub seq: u64,
    pub run_id: Uuid,
    pub kind: WorkflowEventKind,
    pub ts: DateTime<Utc>,
}

/// Secuencia compacta de letras de una lista de eventos, p. ej. "SXPXF".
pub fn event_variants(events: &[WorkflowEvent]) -> String {
    events.iter().map(|e| e.kind.letter()).collect()
}
