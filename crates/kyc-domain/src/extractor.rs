//! Extracción de datos de la imagen de un documento con foto.

use serde::{Deserialize, Serialize};

use crate::details::CardDetails;
use crate::error::DomainError;

/// Documentos con foto que se verifican por imagen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Passport,
    DrivingLicence,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Passport => "passport",
            CardKind::DrivingLicence => "driving licence",
        }
    }
}

pub trait CardExtractor: Send + Sync {
    /// Extrae los datos del titular de la imagen referenciada. La referencia
    /// es opaca (ruta, id de adjunto); el extractor decide cómo resolverla.
    fn extract(&self, kind: CardKind, image_ref: &str) -> Result<CardDetails, DomainError>;
}

/// Extractor de pruebas: toda imagen no vacía produce el mismo titular.
#[derive(Debug, Default)]
pub struct FixtureCardExtractor;

impl FixtureCardExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl CardExtractor for FixtureCardExtractor {
    fn extract(&self, kind: CardKind, image_ref: &str) -> Result<CardDetails, DomainError> {
        if image_ref.trim().is_empty() {
            return Err(DomainError::ExtractionFailed(format!(
                "empty image reference for {}",
                kind.as_str()
            )));
        }
        Ok(CardDetails {
            holder_name: "Ananya Sharma".to_string(),
            dob: "01/01/1990".to_string(),
            address: "221 Green Park, New Delhi".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_extractor_needs_an_image_reference() {
        let extractor = FixtureCardExtractor::new();
        assert!(extractor.extract(CardKind::Passport, "").is_err());
        let details = extractor
            .extract(CardKind::DrivingLicence, "upload://dl.png")
            .unwrap();
        assert_eq!(details.holder_name, "Ananya Sharma");
    }
}
