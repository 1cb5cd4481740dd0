//! Directorios de verificación (UIDAI para Aadhaar, NSDL para PAN).
//!
//! Los traits son el seam de inyección de los workflows: en producción
//! llamarían al servicio real, aquí se incluyen implementaciones en memoria
//! con registros de prueba. Un `Err` es indisponibilidad transitoria; un
//! `NoMatch` es una respuesta definitiva del directorio.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::validators::normalize_aadhaar_number;

/// Datos del titular según el directorio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderRecord {
    pub holder_name: String,
    pub dob: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Verified(HolderRecord),
    NoMatch,
}

pub trait AadhaarDirectory: Send + Sync {
    fn verify(&self, aadhaar_number: &str) -> Result<LookupOutcome, DomainError>;
}

pub trait PanDirectory: Send + Sync {
    /// Coteja número, nombre y fecha de nacimiento contra el registro.
    fn verify(&self, pan_number: &str, holder_name: &str, dob: &str)
        -> Result<LookupOutcome, DomainError>;
}

static AADHAAR_RECORDS: Lazy<HashMap<&'static str, HolderRecord>> = Lazy::new(|| {
    HashMap::from([
        (
            "123456789012",
            HolderRecord {
                holder_name: "Ananya Sharma".to_string(),
                dob: "01/01/1990".to_string(),
                address: "221 Green Park, New Delhi".to_string(),
            },
        ),
        (
            "999988887777",
            HolderRecord {
                holder_name: "Rohan Gupta".to_string(),
                dob: "23/06/1985".to_string(),
                address: "5 MG Road, Bengaluru".to_string(),
            },
        ),
    ])
});

static PAN_RECORDS: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    HashMap::from([
        ("ABCDE1234F", ("Ananya Sharma", "01/01/1990")),
        ("FGHIJ5678K", ("Rohan Gupta", "23/06/1985")),
    ])
});

/// Directorio Aadhaar con registros fijos.
#[derive(Debug, Default)]
pub struct InMemoryAadhaarDirectory;

impl InMemoryAadhaarDirectory {
    pub fn new() -> Self {
        Self
    }
}

impl AadhaarDirectory for InMemoryAadhaarDirectory {
    fn verify(&self, aadhaar_number: &str) -> Result<LookupOutcome, DomainError> {
        let digits = normalize_aadhaar_number(aadhaar_number);
        Ok(AADHAAR_RECORDS
            .get(digits.as_str())
            .cloned()
            .map_or(LookupOutcome::NoMatch, LookupOutcome::Verified))
    }
}

/// Directorio PAN con registros fijos. El match de nombre ignora mayúsculas
/// y espacios sobrantes.
#[derive(Debug, Default)]
pub struct InMemoryPanDirectory;

impl InMemoryPanDirectory {
    pub fn new() -> Self {
        Self
    }
}

impl PanDirectory for InMemoryPanDirectory {
    fn verify(
        &self,
        pan_number: &str,
        holder_name: &str,
        dob: &str,
    ) -> Result<LookupOutcome, DomainError> {
        let pan = pan_number.trim().to_uppercase();
        let Some((name, recorded_dob)) = PAN_RECORDS.get(pan.as_str()) else {
            return Ok(LookupOutcome::NoMatch);
        };
        let name_matches = name.eq_ignore_ascii_case(holder_name.trim());
        if name_matches && *recorded_dob == dob.trim() {
            Ok(LookupOutcome::Verified(HolderRecord {
                holder_name: name.to_string(),
                dob: recorded_dob.to_string(),
                address: String::new(),
            }))
        } else {
            Ok(LookupOutcome::NoMatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aadhaar_lookup_finds_known_numbers() {
        let dir = InMemoryAadhaarDirectory::new();
        match dir.verify("1234 5678 9012").unwrap() {
            LookupOutcome::Verified(record) => assert_eq!(record.holder_name, "Ananya Sharma"),
            LookupOutcome::NoMatch => panic!("expected a match"),
        }
        assert_eq!(dir.verify("000000000000").unwrap(), LookupOutcome::NoMatch);
    }

    #[test]
    fn pan_lookup_requires_matching_details() {
        let dir = InMemoryPanDirectory::new();
        assert!(matches!(
            dir.verify("abcde1234f", "ananya sharma", "01/01/1990").unwrap(),
            LookupOutcome::Verified(_)
        ));
        assert_eq!(
            dir.verify("ABCDE1234F", "Ananya Sharma", "02/01/1990").unwrap(),
            LookupOutcome::NoMatch
        );
    }
}
