//! Envío y verificación de códigos OTP.

use crate::error::DomainError;
use crate::validators::normalize_aadhaar_number;

pub trait OtpVerifier: Send + Sync {
    /// Dispara el envío del código al móvil registrado del titular.
    fn send_code(&self, aadhaar_number: &str) -> Result<(), DomainError>;

    /// `true` si el código corresponde al último enviado.
    fn verify_code(&self, aadhaar_number: &str, code: &str) -> Result<bool, DomainError>;
}

/// Verificador de pruebas: acepta un único código fijo.
#[derive(Debug)]
pub struct StaticOtpVerifier {
    code: String,
}

impl StaticOtpVerifier {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl Default for StaticOtpVerifier {
    fn default() -> Self {
        Self::new("123456")
    }
}

impl OtpVerifier for StaticOtpVerifier {
    fn send_code(&self, aadhaar_number: &str) -> Result<(), DomainError> {
        // solo dígitos ASCII: el log nunca corta en medio de un carácter
        let digits = normalize_aadhaar_number(aadhaar_number);
        let tail = &digits[digits.len().saturating_sub(4)..];
        log::debug!("otp requested for aadhaar ending in {tail}");
        Ok(())
    }

    fn verify_code(&self, _aadhaar_number: &str, code: &str) -> Result<bool, DomainError> {
        Ok(code.trim() == self.code)
    }
}
