//! Tipos serializables del checkpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{StepId, WorkflowInstance, WorkflowStatus};

/// Posición de una pausa: el step que se acaba de ejecutar y el sucesor con
/// el que se retoma. Guardar el sucesor hace el resume idempotente: retomar
/// dos veces ejecuta el mismo step con el input del turno, nunca repite el
/// prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseState {
    pub after: StepId,
    pub next: StepId,
}

/// Estado completo guardado entre turnos.
///
/// `definition_hash` ancla la instancia a la forma del grafo con la que
/// arrancó; si el binario cambia la definición bajo una pausa, el motor
/// rechaza el resume en lugar de retomar sobre un grafo distinto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub instance: WorkflowInstance,
    pub pause: Option<PauseState>,
    pub definition_hash: String,
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn paused(instance: WorkflowInstance, pause: PauseState, definition_hash: &str) -> Self {
        Self {
            instance,
            pause: Some(pause),
            definition_hash: definition_hash.to_string(),
            updated_at: Utc::now(),
        }
    }

    pub fn terminal(instance: WorkflowInstance, definition_hash: &str) -> Self {
        Self {
            instance,
            pause: None,
            definition_hash: definition_hash.to_string(),
            updated_at: Utc::now(),
        }
    }

    /// Hay un run en vuelo esperando input.
    pub fn is_paused(&self) -> bool {
        self.pause.is_some() && self.instance.status == WorkflowStatus::InProgress
    }

    pub fn is_terminal(&self) -> bool {
        self.instance.status.is_terminal()
    }
}
