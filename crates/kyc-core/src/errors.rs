//! Errores del core.
//!
//! `EngineError` distingue errores de configuración (fatales: transición
//! ausente, step desconocido, definición cambiada bajo un checkpoint
//! pausado) de errores de almacenamiento (`StoreError`), que provienen del
//! backend de checkpoints/eventos. Ninguno es un estado visible al usuario:
//! la capa orquestadora decide el mensaje.

use thiserror::Error;

use crate::model::{StepId, WorkflowKey};

/// Error de los backends de persistencia (checkpoints y eventos).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend: {0}")]
    Backend(String),
    #[error("store serialization: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// El traversal pidió un step que la definición no registra.
    #[error("unknown step '{step}' in workflow '{workflow}'")]
    UnknownStep { workflow: WorkflowKey, step: StepId },

    /// Un step emitió una decisión sin transición correspondiente. Error de
    /// programación en la definición, nunca condición de usuario.
    #[error("no transition from step '{step}' for decision '{decision}' in workflow '{workflow}'")]
    MissingTransition {
        workflow: WorkflowKey,
        step: StepId,
        decision: String,
    },

    /// Un checkpoint pausado referencia una definición con otro hash. Se
    /// falla explícitamente en lugar de adivinar un mapeo de steps.
    #[error("definition hash mismatch for workflow '{workflow}': checkpoint was paused against a different graph")]
    DefinitionMismatch { workflow: WorkflowKey },

    /// Se superó la cota de steps por turno (ciclo sin pausa).
    #[error("traversal exceeded {0} steps in a single turn; the definition contains a cycle without a pause step")]
    TraversalBudget(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}
