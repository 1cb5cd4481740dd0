//! Errores de la capa orquestadora.

use kyc_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Error fatal del motor (configuración o persistencia). No se traduce a
    /// un mensaje de usuario: la capa de transporte decide qué mostrar.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Se pidió un workflow que el registro no conoce.
    #[error("unknown workflow key '{0}'")]
    UnknownWorkflow(String),
}
