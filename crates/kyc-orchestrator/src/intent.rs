//! Clasificación de la intención del turno.
//!
//! El contrato admite clasificadores externos (un modelo, un servicio); el
//! incluido es determinista por palabras clave, suficiente para CLI y tests.
//! Un fallo del clasificador degrada a `Unknown`, nunca sube al router.

use kyc_core::WorkflowKey;
use kyc_domain::validators::{is_affirmative, is_negative};
use kyc_domain::DomainError;

/// Intención clasificada de un turno.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    /// Arrancar (o intentar arrancar) el workflow del documento dado.
    Start(WorkflowKey),
    /// Input de datos para el workflow activo.
    Continue,
    ConfirmYes,
    ConfirmNo,
    /// Pregunta fuera del flujo ("what is an OTP?").
    Question,
    /// Agradecimiento o cierre sin contenido.
    Acknowledge,
    Unknown,
}

/// Veredicto completo del clasificador sobre un mensaje.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentDecision {
    pub intent: UserIntent,
    /// El mensaje trae datos concretos (un número, una referencia de
    /// imagen), no solo una confirmación o una pregunta.
    pub provides_data: bool,
}

/// Lo que el clasificador sabe de la sesión al momento de clasificar.
#[derive(Debug, Clone, Default)]
pub struct IntentContext {
    pub active_workflow: Option<WorkflowKey>,
    /// Hay un prompt pendiente de respuesta.
    pub awaiting_input: bool,
}

pub trait IntentClassifier: Send + Sync {
    fn classify(
        &self,
        context: &IntentContext,
        message: &str,
    ) -> Result<IntentDecision, DomainError>;
}

/// Clasificador determinista por palabras clave.
#[derive(Debug, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn declares_no_pan(lowered: &str) -> bool {
        lowered.contains("pan")
            && (lowered.contains("don't have")
                || lowered.contains("dont have")
                || lowered.contains("do not have")
                || lowered.contains("no pan"))
    }

    fn document_mention(lowered: &str) -> Option<WorkflowKey> {
        // el orden importa: "pan" es substring frecuente, va al final
        if lowered.contains("aadhaar") || lowered.contains("aadhar") {
            Some(WorkflowKey::new("aadhaar"))
        } else if lowered.contains("form 60") || lowered.contains("form60") {
            Some(WorkflowKey::new("form60"))
        } else if lowered.contains("passport") {
            Some(WorkflowKey::new("passport"))
        } else if lowered.contains("driving licence")
            || lowered.contains("driving license")
            || lowered.contains(" dl")
            || lowered == "dl"
        {
            Some(WorkflowKey::new("dl"))
        } else if Self::declares_no_pan(lowered) || lowered.contains("pan check") {
            // "I don't have a PAN" arranca el sondeo de elegibilidad
            Some(WorkflowKey::new("pan_check"))
        } else if lowered.contains("pan") {
            Some(WorkflowKey::new("pan"))
        } else {
            None
        }
    }

    fn looks_like_question(lowered: &str) -> bool {
        lowered.ends_with('?')
            || lowered.starts_with("what ")
            || lowered.starts_with("why ")
            || lowered.starts_with("how ")
            || lowered.starts_with("where ")
            || lowered.starts_with("when ")
            || lowered.starts_with("who ")
    }

    fn intent_for(context: &IntentContext, lowered: &str) -> UserIntent {
        if lowered.is_empty() {
            return UserIntent::Unknown;
        }

        if Self::looks_like_question(lowered) {
            return UserIntent::Question;
        }

        // "start"/"verify" + mención de documento manda sobre todo lo demás
        let mentions = Self::document_mention(lowered);
        let wants_start = lowered.contains("start")
            || lowered.contains("verify")
            || lowered.contains("begin")
            || lowered.contains("switch")
            || Self::declares_no_pan(lowered);
        if let Some(key) = mentions {
            if wants_start || !context.awaiting_input {
                return UserIntent::Start(key);
            }
        }

        if context.awaiting_input {
            if is_affirmative(lowered) {
                return UserIntent::ConfirmYes;
            }
            if is_negative(lowered) {
                return UserIntent::ConfirmNo;
            }
            // cualquier otro texto es la respuesta al prompt pendiente
            return UserIntent::Continue;
        }

        if matches!(lowered, "thanks" | "thank you" | "great" | "done")
            || lowered.starts_with("thanks")
            || lowered.starts_with("thank you")
        {
            return UserIntent::Acknowledge;
        }

        UserIntent::Unknown
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(
        &self,
        context: &IntentContext,
        message: &str,
    ) -> Result<IntentDecision, DomainError> {
        let lowered = message.trim().to_lowercase();
        let provides_data =
            lowered.chars().any(|c| c.is_ascii_digit()) || lowered.contains("upload://");
        Ok(IntentDecision {
            intent: Self::intent_for(context, &lowered),
            provides_data,
        })
    }
}
