//! Errores de persistencia.
//! Mapea errores de Diesel / conexión a variantes semánticas, y de ahí al
//! `StoreError` que consume el motor.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use kyc_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("unique violation: {0}")]
    UniqueViolation(String),
    #[error("check violation: {0}")]
    CheckViolation(String),
    #[error("not found")]
    NotFound,
    #[error("serialization conflict (retryable)")]
    SerializationConflict,
    #[error("transient IO / connection pool error: {0}")]
    TransientIo(String),
    #[error("payload (de)serialization: {0}")]
    Payload(String),
    #[error("unknown database error: {0}")]
    Unknown(String),
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound,
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => {
                    Self::UniqueViolation(info.message().to_string())
                }
                DatabaseErrorKind::CheckViolation => {
                    Self::CheckViolation(info.message().to_string())
                }
                DatabaseErrorKind::SerializationFailure => Self::SerializationConflict,
                other => Self::Unknown(format!("db error kind {:?}: {}", other, info.message())),
            },
            DieselError::DeserializationError(e) => Self::Payload(format!("deser: {e}")),
            DieselError::SerializationError(e) => Self::Payload(format!("ser: {e}")),
            DieselError::BrokenTransactionManager => {
                Self::TransientIo("broken transaction manager".into())
            }
            other => Self::Unknown(format!("unhandled diesel error: {other:?}")),
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Payload(msg) => StoreError::Serialization(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}
