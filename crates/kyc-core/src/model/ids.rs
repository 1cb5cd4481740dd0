//! Newtypes de identidad.
//!
//! Strings con semántica propia: clave de workflow (un tipo de documento),
//! identificador de step dentro de un grafo, etiqueta de decisión emitida por
//! un step, e identificador opaco de sesión. Mantenerlos como tipos distintos
//! evita cruzar, por ejemplo, una decisión donde se esperaba un step.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }
    };
}

string_id! {
    /// Clave de un workflow documental ("aadhaar", "pan", "form60", ...).
    WorkflowKey
}

string_id! {
    /// Identificador de step dentro de una definición.
    StepId
}

string_id! {
    /// Etiqueta de decisión que selecciona la transición saliente.
    Decision
}

/// Identificador opaco de sesión.
///
/// El patrón `<origen>-session-<uuid>` se valida una sola vez en la frontera
/// de transporte (`parse`); el core lo trata como string opaco.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionIdError {
    #[error("session id must follow '<origin>-session-<uuid>', got '{0}'")]
    Malformed(String),
}

impl SessionId {
    /// Valida el patrón `<origen>-session-<uuid>`.
    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        let Some((origin, uuid_part)) = raw.split_once("-session-") else {
            return Err(SessionIdError::Malformed(raw.to_string()));
        };
        if origin.is_empty() || Uuid::parse_str(uuid_part).is_err() {
            return Err(SessionIdError::Malformed(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Genera un id nuevo para el origen dado (p. ej. "cli", "api").
    pub fn generate(origin: &str) -> Self {
        Self(format!("{origin}-session-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_pattern() {
        let ok = SessionId::generate("cli");
        assert!(SessionId::parse(ok.as_str()).is_ok());

        assert!(SessionId::parse("api-session-not-a-uuid").is_err());
        assert!(SessionId::parse("-session-2d9c7f0a-9a07-4c2e-8f53-0f4d5d3c8b11").is_err());
        assert!(SessionId::parse("plain-string").is_err());
    }
}
