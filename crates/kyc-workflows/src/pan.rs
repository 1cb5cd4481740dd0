//! Workflow PAN: datos del titular, número PAN, confirmación, lookup NSDL.
//!
//! El primer step decide la ruta: si el payload viene sembrado con nombre y
//! fecha de nacimiento (Aadhaar ya verificado en la sesión), se salta la
//! captura manual. El lazo de corrección de la confirmación está acotado por
//! la fase `confirmation`; si el lookup no confirma los datos, el terminal
//! recomienda la verificación por imagen (pasaporte o licencia). Cuando la
//! sesión trae un Aadhaar verificado, los datos del PAN además se cotejan
//! contra él después del lookup.

use std::sync::Arc;

use kyc_core::{DefinitionError, StepContext, StepHandler, StepOutcome, WorkflowDefinition};
use kyc_domain::validators::{
    holder_data_matches, is_affirmative, is_valid_date, is_valid_pan_format,
};
use kyc_domain::{AadhaarDetails, LookupOutcome, PanDetails, PanDirectory};

use crate::{keys, phases, Say};

pub const KEY: &str = "pan";

/// Elige ruta manual o precargada según lo que ya sepa la sesión.
struct CheckSeededDetails;
impl StepHandler for CheckSeededDetails {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.contains(keys::HOLDER_NAME) && cx.contains(keys::DOB) {
            StepOutcome::decide("prefilled")
        } else {
            StepOutcome::decide("manual")
        }
    }
}

struct PromptName;
impl StepHandler for PromptName {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::NAME_FORMAT) > 0 {
            StepOutcome::message("Please share your full name as printed on your PAN card.")
        } else {
            StepOutcome::message("Please share your full name.")
        }
    }
}

struct CaptureName;
impl StepHandler for CaptureName {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let name = cx.input().trim().to_string();
        if name.len() >= 2 && name.chars().any(|c| c.is_alphabetic()) {
            cx.set_str(keys::HOLDER_NAME, name);
            StepOutcome::decide("valid")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::NAME_FORMAT))
        }
    }
}

struct PromptDob;
impl StepHandler for PromptDob {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::DOB_FORMAT) > 0 {
            StepOutcome::message(
                "That date was not valid. Please share your date of birth as DD/MM/YYYY.",
            )
        } else {
            StepOutcome::message("Please share your date of birth (DD/MM/YYYY).")
        }
    }
}

struct CheckDob;
impl StepHandler for CheckDob {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let input = cx.input().trim().to_string();
        if is_valid_date(&input) {
            cx.set_str(keys::DOB, input);
            StepOutcome::decide("valid")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::DOB_FORMAT))
        }
    }
}

struct PromptPan;
impl StepHandler for PromptPan {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::NUMBER_FORMAT) > 0 {
            StepOutcome::message(
                "That does not look like a valid PAN. The format is 5 letters, \
                 4 digits and a letter, for example ABCDE1234F.",
            )
        } else if cx.attempts(phases::CONFIRMATION) > 0 {
            StepOutcome::message("Let us correct that. Please share your PAN number again.")
        } else {
            StepOutcome::message("Please share your 10 character PAN number.")
        }
    }
}

struct CheckPanFormat;
impl StepHandler for CheckPanFormat {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let input = cx.input().trim().to_uppercase();
        if is_valid_pan_format(&input) {
            cx.set_str(keys::PAN_NUMBER, input);
            StepOutcome::decide("valid")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::NUMBER_FORMAT))
        }
    }
}

struct PromptConfirmation;
impl StepHandler for PromptConfirmation {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let details = PanDetails {
            pan_number: cx.get_str(keys::PAN_NUMBER).unwrap_or("").to_string(),
            holder_name: cx.get_str(keys::HOLDER_NAME).unwrap_or("").to_string(),
            dob: cx.get_str(keys::DOB).unwrap_or("").to_string(),
        };
        StepOutcome::message(format!(
            "Please confirm your PAN details:\n{}\nIs this correct? (yes/no)",
            details.summary()
        ))
    }
}

struct CheckConfirmation;
impl StepHandler for CheckConfirmation {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let input = cx.input();
        if is_affirmative(input) {
            StepOutcome::decide("yes")
        } else {
            // "no" reabre la captura del PAN; el lazo de corrección está
            // acotado por la fase, igual que una respuesta no parseable
            StepOutcome::decide(cx.retry_or_terminate(phases::CONFIRMATION))
        }
    }
}

struct LookupPan {
    directory: Arc<dyn PanDirectory>,
}
impl StepHandler for LookupPan {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let pan = cx.get_str(keys::PAN_NUMBER).unwrap_or("").to_string();
        let name = cx.get_str(keys::HOLDER_NAME).unwrap_or("").to_string();
        let dob = cx.get_str(keys::DOB).unwrap_or("").to_string();
        match self.directory.verify(&pan, &name, &dob) {
            Ok(LookupOutcome::Verified(_)) => {
                // con un Aadhaar verificado en la sesión, los datos del PAN
                // tienen que coincidir con los del Aadhaar
                let entered = PanDetails {
                    pan_number: pan,
                    holder_name: name,
                    dob,
                };
                let reference = cx
                    .payload()
                    .get(keys::AADHAAR_REFERENCE)
                    .cloned()
                    .and_then(|value| serde_json::from_value::<AadhaarDetails>(value).ok());
                match reference {
                    Some(aadhaar) if !holder_data_matches(&entered, &aadhaar) => {
                        StepOutcome::decide("aadhaar_mismatch")
                    }
                    _ => StepOutcome::decide("verified"),
                }
            }
            Ok(LookupOutcome::NoMatch) => StepOutcome::decide("no_match"),
            Err(err) => {
                log::warn!("nsdl lookup failed: {err}");
                StepOutcome::decide(cx.retry_or_terminate(phases::LOOKUP))
            }
        }
    }
}

struct Finish;
impl StepHandler for Finish {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let pan = cx.get_str(keys::PAN_NUMBER).unwrap_or("");
        StepOutcome::message(format!("Your PAN {pan} has been verified successfully."))
    }
}

/// Grafo completo del workflow PAN.
pub fn definition(directory: Arc<dyn PanDirectory>) -> Result<WorkflowDefinition, DefinitionError> {
    WorkflowDefinition::builder(KEY)
        .step("check_seeded_details", CheckSeededDetails)
        .step("prompt_name", PromptName)
        .step("capture_name", CaptureName)
        .step("prompt_dob", PromptDob)
        .step("check_dob", CheckDob)
        .step("prompt_pan", PromptPan)
        .step("check_pan_format", CheckPanFormat)
        .step("prompt_confirmation", PromptConfirmation)
        .step("check_confirmation", CheckConfirmation)
        .step("lookup_pan", LookupPan { directory })
        .step("finish", Finish)
        .step(
            "no_match",
            Say("We could not verify your PAN against the registry. You can try \
                 verifying with a passport or driving licence instead."),
        )
        .step(
            "aadhaar_mismatch",
            Say("The PAN details do not match your verified Aadhaar details. PAN \
                 verification was not completed."),
        )
        .step(
            "abort",
            Say("Too many failed attempts. PAN verification was not completed. You can \
                 try verifying with a passport or driving licence instead."),
        )
        .branch(
            "check_seeded_details",
            &[("prefilled", "prompt_pan"), ("manual", "prompt_name")],
        )
        .edge("prompt_name", "capture_name")
        .branch(
            "capture_name",
            &[
                ("valid", "prompt_dob"),
                ("retry", "prompt_name"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_dob", "check_dob")
        .branch(
            "check_dob",
            &[
                ("valid", "prompt_pan"),
                ("retry", "prompt_dob"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_pan", "check_pan_format")
        .branch(
            "check_pan_format",
            &[
                ("valid", "prompt_confirmation"),
                ("retry", "prompt_pan"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_confirmation", "check_confirmation")
        .branch(
            "check_confirmation",
            &[
                ("yes", "lookup_pan"),
                ("retry", "prompt_pan"),
                ("terminate", "abort"),
            ],
        )
        .branch(
            "lookup_pan",
            &[
                ("verified", "finish"),
                ("no_match", "no_match"),
                ("aadhaar_mismatch", "aadhaar_mismatch"),
                ("retry", "lookup_pan"),
                ("terminate", "abort"),
            ],
        )
        .pause_after("prompt_name", "I still need your full name to continue with PAN.")
        .pause_after(
            "prompt_dob",
            "I still need your date of birth (DD/MM/YYYY) to continue with PAN.",
        )
        .pause_after("prompt_pan", "I still need your 10 character PAN number.")
        .pause_after(
            "prompt_confirmation",
            "Please confirm the PAN details with yes or no.",
        )
        .terminal_success("finish")
        .terminal_failure("no_match")
        .terminal_failure("aadhaar_mismatch")
        .terminal_failure("abort")
        .retry_limit(phases::NAME_FORMAT, phases::FORMAT_LIMIT)
        .retry_limit(phases::DOB_FORMAT, phases::FORMAT_LIMIT)
        .retry_limit(phases::NUMBER_FORMAT, phases::FORMAT_LIMIT)
        .retry_limit(phases::CONFIRMATION, phases::CONFIRMATION_LIMIT)
        .retry_limit(phases::LOOKUP, phases::LOOKUP_LIMIT)
        .build()
}
