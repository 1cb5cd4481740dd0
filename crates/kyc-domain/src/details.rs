//! Datos capturados por cada workflow documental.
//!
//! Son las vistas tipadas del payload que el motor arrastra como JSON plano:
//! los workflows las serializan al payload y el orquestador las recupera
//! para sembrar flujos dependientes o componer resúmenes.

use serde::{Deserialize, Serialize};

use crate::validators::mask_aadhaar;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AadhaarDetails {
    pub aadhaar_number: String,
    pub holder_name: String,
    pub dob: String,
    pub address: String,
}

impl AadhaarDetails {
    /// Resumen apto para mostrar: el número siempre va enmascarado.
    pub fn summary(&self) -> String {
        format!(
            "Aadhaar {}\nName: {}\nDate of birth: {}\nAddress: {}",
            mask_aadhaar(&self.aadhaar_number),
            self.holder_name,
            self.dob,
            self.address
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanDetails {
    pub pan_number: String,
    pub holder_name: String,
    pub dob: String,
}

impl PanDetails {
    pub fn summary(&self) -> String {
        format!(
            "PAN {}\nName: {}\nDate of birth: {}",
            self.pan_number, self.holder_name, self.dob
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form60Details {
    pub agricultural_income: i64,
    pub other_income: i64,
}

impl Form60Details {
    pub fn summary(&self) -> String {
        format!(
            "Form 60\nAgricultural income: {}\nOther income: {}",
            self.agricultural_income, self.other_income
        )
    }
}

/// Datos extraídos de la imagen de un documento con foto (pasaporte o
/// licencia de conducir).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub holder_name: String,
    pub dob: String,
    pub address: String,
}

impl CardDetails {
    pub fn summary(&self) -> String {
        format!(
            "Name: {}\nDate of birth: {}\nAddress: {}",
            self.holder_name, self.dob, self.address
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aadhaar_summary_masks_the_number() {
        let details = AadhaarDetails {
            aadhaar_number: "123456789012".to_string(),
            holder_name: "Asha Verma".to_string(),
            dob: "12/08/1991".to_string(),
            address: "14 Lake Road, Pune".to_string(),
        };
        let summary = details.summary();
        assert!(summary.contains("XXXX XXXX 9012"));
        assert!(!summary.contains("123456789012"));
    }
}
