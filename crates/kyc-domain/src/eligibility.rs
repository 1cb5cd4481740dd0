//! Análisis de elegibilidad PAN.
//!
//! Cuando la persona declara no tener PAN, el sondeo recoge tres respuestas
//! (cuenta bancaria, ITR reciente, ocupación) y este colaborador decide si
//! la normativa fiscal india indica que debería tenerlo de todas formas. El
//! trait admite un analista externo; el incluido aplica reglas fijas.

use crate::error::DomainError;

/// Respuestas recogidas por el sondeo de elegibilidad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAnswers {
    pub has_bank_account: bool,
    pub filed_itr: bool,
    pub occupation: String,
}

pub trait PanEligibilityAnalyzer: Send + Sync {
    /// `true` si las respuestas indican que la persona probablemente debe
    /// tener un PAN y conviene intentar esa verificación antes que Form 60.
    fn likely_has_pan(&self, answers: &ProbeAnswers) -> Result<bool, DomainError>;
}

/// Ocupaciones que normalmente exigen PAN.
const TAXED_OCCUPATIONS: [&str; 5] = [
    "salaried",
    "self-employed",
    "business owner",
    "govt employee",
    "freelancer",
];

/// Analista por reglas: una cuenta bancaria activa, un ITR en los últimos
/// tres años o una ocupación gravada implican PAN.
#[derive(Debug, Default)]
pub struct RuleBasedEligibilityAnalyzer;

impl RuleBasedEligibilityAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl PanEligibilityAnalyzer for RuleBasedEligibilityAnalyzer {
    fn likely_has_pan(&self, answers: &ProbeAnswers) -> Result<bool, DomainError> {
        let occupation = answers.occupation.trim().to_lowercase();
        Ok(answers.has_bank_account
            || answers.filed_itr
            || TAXED_OCCUPATIONS.iter().any(|o| occupation.contains(o)))
    }
}
