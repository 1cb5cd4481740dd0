//! Estado mutable de una corrida de workflow.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Decision, StepId, WorkflowKey};
use crate::step::RetryCounters;

/// Ciclo de vida de una instancia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowStatus {
    InProgress,
    Success,
    Failure,
}

impl WorkflowStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Success | WorkflowStatus::Failure)
    }
}

/// Instancia por sesión de un workflow: lo que el motor muta durante un turno
/// y lo que el checkpoint persiste entre turnos.
///
/// Los contadores de reintento son monotónicos dentro de la vida de la
/// instancia y vuelven a cero únicamente al crear una instancia nueva.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowInstance {
    /// Correlación de la corrida en el event log.
    pub run_id: Uuid,
    pub workflow: WorkflowKey,
    pub last_step: Option<StepId>,
    pub last_decision: Option<Decision>,
    pub counters: RetryCounters,
    /// Datos acumulados (número de documento, nombre, fechas...). JSON plano;
    /// el motor no interpreta su semántica.
    pub payload: Map<String, Value>,
    pub status: WorkflowStatus,
    /// Mensaje saliente del turno. El último step que escribe, gana.
    pub message: String,
}

impl WorkflowInstance {
    pub fn new(workflow: WorkflowKey) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            workflow,
            last_step: None,
            last_decision: None,
            counters: RetryCounters::default(),
            payload: Map::new(),
            status: WorkflowStatus::InProgress,
            message: String::new(),
        }
    }
}
