//! Workflow de documentos con foto (pasaporte y licencia de conducir).
//!
//! Un único grafo parametrizado por `CardKind`: subir imagen, extraer datos,
//! mostrar y pedir conformidad. Un "no" del usuario reinicia la captura
//! completa (imagen nueva), acotado por la fase `acknowledge`.

use std::sync::Arc;

use kyc_core::{DefinitionError, StepContext, StepHandler, StepOutcome, WorkflowDefinition};
use kyc_domain::validators::is_affirmative;
use kyc_domain::{CardDetails, CardExtractor, CardKind};

use crate::{keys, phases, Say};

pub const PASSPORT_KEY: &str = "passport";
pub const DL_KEY: &str = "dl";

/// Clave de workflow para la clase de documento.
pub fn key_for(kind: CardKind) -> &'static str {
    match kind {
        CardKind::Passport => PASSPORT_KEY,
        CardKind::DrivingLicence => DL_KEY,
    }
}

struct PromptImage {
    kind: CardKind,
}
impl StepHandler for PromptImage {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::EXTRACTION) > 0 {
            StepOutcome::message(format!(
                "We could not read that image. Please upload a clearer photo of your {}.",
                self.kind.as_str()
            ))
        } else if cx.attempts(phases::ACKNOWLEDGE) > 0 {
            StepOutcome::message(format!(
                "Let us try again. Please upload a fresh photo of your {}.",
                self.kind.as_str()
            ))
        } else {
            StepOutcome::message(format!(
                "Please upload a clear photo of your {}.",
                self.kind.as_str()
            ))
        }
    }
}

struct ExtractDetails {
    kind: CardKind,
    extractor: Arc<dyn CardExtractor>,
}
impl StepHandler for ExtractDetails {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        match self.extractor.extract(self.kind, cx.input().trim()) {
            Ok(details) => {
                cx.set_str(keys::HOLDER_NAME, details.holder_name);
                cx.set_str(keys::DOB, details.dob);
                cx.set_str(keys::ADDRESS, details.address);
                StepOutcome::decide("extracted")
            }
            Err(err) => {
                log::warn!("card extraction failed: {err}");
                StepOutcome::decide(cx.retry_or_terminate(phases::EXTRACTION))
            }
        }
    }
}

struct PromptAcknowledge {
    kind: CardKind,
}
impl StepHandler for PromptAcknowledge {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let details = CardDetails {
            holder_name: cx.get_str(keys::HOLDER_NAME).unwrap_or("").to_string(),
            dob: cx.get_str(keys::DOB).unwrap_or("").to_string(),
            address: cx.get_str(keys::ADDRESS).unwrap_or("").to_string(),
        };
        StepOutcome::message(format!(
            "We read the following from your {}:\n{}\nDo these details look correct? (yes/no)",
            self.kind.as_str(),
            details.summary()
        ))
    }
}

struct CheckAcknowledge;
impl StepHandler for CheckAcknowledge {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if is_affirmative(cx.input()) {
            StepOutcome::decide("yes")
        } else {
            // "no" o respuesta ilegible: repetir la captura completa
            StepOutcome::decide(cx.retry_or_terminate(phases::ACKNOWLEDGE))
        }
    }
}

struct Finish {
    kind: CardKind,
}
impl StepHandler for Finish {
    fn execute(&self, _cx: &mut StepContext<'_>) -> StepOutcome {
        StepOutcome::message(format!(
            "Your {} has been verified successfully.",
            self.kind.as_str()
        ))
    }
}

/// Grafo del workflow de verificación por imagen para `kind`.
pub fn definition(
    kind: CardKind,
    extractor: Arc<dyn CardExtractor>,
) -> Result<WorkflowDefinition, DefinitionError> {
    WorkflowDefinition::builder(key_for(kind))
        .step("prompt_image", PromptImage { kind })
        .step("extract_details", ExtractDetails { kind, extractor })
        .step("prompt_acknowledge", PromptAcknowledge { kind })
        .step("check_acknowledge", CheckAcknowledge)
        .step("finish", Finish { kind })
        .step(
            "abort",
            Say("Too many failed attempts. The document was not verified."),
        )
        .edge("prompt_image", "extract_details")
        .branch(
            "extract_details",
            &[
                ("extracted", "prompt_acknowledge"),
                ("retry", "prompt_image"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_acknowledge", "check_acknowledge")
        .branch(
            "check_acknowledge",
            &[
                ("yes", "finish"),
                ("retry", "prompt_image"),
                ("terminate", "abort"),
            ],
        )
        .pause_after(
            "prompt_image",
            "I still need a photo of the document to continue.",
        )
        .pause_after(
            "prompt_acknowledge",
            "Please confirm the extracted details with yes or no.",
        )
        .terminal_success("finish")
        .terminal_failure("abort")
        .retry_limit(phases::EXTRACTION, phases::FORMAT_LIMIT)
        .retry_limit(phases::ACKNOWLEDGE, phases::CONFIRMATION_LIMIT)
        .build()
}
