//! Respuestas a preguntas fuera del flujo.
//!
//! El contrato admite un generador externo; el incluido responde un conjunto
//! fijo de dudas frecuentes del proceso y rechaza lo que no reconoce, para
//! que el router pueda devolver la guía del prompt pendiente.

use kyc_domain::DomainError;

pub trait QuestionAnswerer: Send + Sync {
    fn answer(&self, question: &str) -> Result<String, DomainError>;
}

/// Respuestas fijas para dudas frecuentes del proceso KYC.
#[derive(Debug, Default)]
pub struct ScriptedAnswerer;

impl ScriptedAnswerer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuestionAnswerer for ScriptedAnswerer {
    fn answer(&self, question: &str) -> Result<String, DomainError> {
        let lowered = question.to_lowercase();
        let text = if lowered.contains("kyc") {
            "KYC (Know Your Customer) is the identity verification process banks \
             must complete before opening an account."
        } else if lowered.contains("otp") {
            "An OTP is a one time password sent to your registered mobile number. \
             It confirms that the Aadhaar number belongs to you."
        } else if lowered.contains("aadhaar") || lowered.contains("aadhar") {
            "Aadhaar is a 12 digit identity number issued by UIDAI. We use it to \
             verify your identity details."
        } else if lowered.contains("pan") {
            "PAN is a 10 character tax identifier. If you do not have one, you can \
             submit a Form 60 declaration instead."
        } else if lowered.contains("form 60") || lowered.contains("form60") {
            "Form 60 is a declaration you can file when you do not hold a PAN. It \
             records your annual income."
        } else if lowered.contains("passport") || lowered.contains("licence")
            || lowered.contains("license")
        {
            "A passport or driving licence photo can be used as an alternative \
             identity document when other verification is not possible."
        } else {
            "I can only help with questions about the KYC verification process."
        };
        Ok(text.to_string())
    }
}
