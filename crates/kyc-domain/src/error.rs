//! Errores del dominio documental.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// El servicio de verificación (UIDAI, NSDL) no respondió. Transitorio:
    /// los workflows lo cuentan contra la fase de lookup.
    #[error("verification service unavailable: {0}")]
    ServiceUnavailable(String),

    /// La extracción de datos de la imagen del documento falló.
    #[error("document extraction failed: {0}")]
    ExtractionFailed(String),
}
