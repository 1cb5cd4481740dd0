//! Workflow Aadhaar: número, OTP, lookup UIDAI, confirmación.
//!
//! Pausas en los tres prompts (número, OTP, confirmación). Los prompts
//! ajustan su texto según los intentos acumulados, porque el mensaje del
//! último step del turno es el que ve el usuario.

use std::sync::Arc;

use kyc_core::{DefinitionError, StepContext, StepHandler, StepOutcome, WorkflowDefinition};
use kyc_domain::validators::{
    is_affirmative, is_negative, is_valid_aadhaar_number, is_valid_otp_format, mask_aadhaar,
    normalize_aadhaar_number,
};
use kyc_domain::{AadhaarDetails, AadhaarDirectory, LookupOutcome, OtpVerifier};

use crate::{keys, phases, Say};

pub const KEY: &str = "aadhaar";

struct PromptNumber;
impl StepHandler for PromptNumber {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::NUMBER_FORMAT) > 0 {
            StepOutcome::message(
                "That does not look like a valid Aadhaar number. \
                 Please share the 12 digit number, digits only.",
            )
        } else {
            StepOutcome::message("Please share your 12 digit Aadhaar number.")
        }
    }
}

struct CheckNumberFormat;
impl StepHandler for CheckNumberFormat {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let input = cx.input().trim().to_string();
        if is_valid_aadhaar_number(&input) {
            cx.set_str(keys::AADHAAR_NUMBER, normalize_aadhaar_number(&input));
            StepOutcome::decide("valid")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::NUMBER_FORMAT))
        }
    }
}

struct PromptOtp {
    otp: Arc<dyn OtpVerifier>,
}
impl StepHandler for PromptOtp {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let number = cx.get_str(keys::AADHAAR_NUMBER).unwrap_or("").to_string();
        if let Err(err) = self.otp.send_code(&number) {
            log::warn!("otp send failed: {err}");
        }
        if cx.attempts(phases::OTP_FORMAT) > 0 || cx.attempts(phases::OTP_CODE) > 0 {
            StepOutcome::message(
                "That code was not accepted. We have sent a fresh 6 digit OTP \
                 to your registered mobile number, please share it.",
            )
        } else {
            StepOutcome::message(
                "We have sent a 6 digit OTP to your registered mobile number. \
                 Please share the code.",
            )
        }
    }
}

struct CheckOtpFormat;
impl StepHandler for CheckOtpFormat {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if is_valid_otp_format(cx.input()) {
            StepOutcome::decide("valid")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::OTP_FORMAT))
        }
    }
}

struct CheckOtpCode {
    otp: Arc<dyn OtpVerifier>,
}
impl StepHandler for CheckOtpCode {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let number = cx.get_str(keys::AADHAAR_NUMBER).unwrap_or("").to_string();
        match self.otp.verify_code(&number, cx.input()) {
            Ok(true) => StepOutcome::decide("valid"),
            Ok(false) => {
                StepOutcome::decide(cx.retry_or_terminate(phases::OTP_CODE))
            }
            Err(err) => {
                log::warn!("otp verify failed: {err}");
                StepOutcome::decide(cx.retry_or_terminate(phases::OTP_CODE))
            }
        }
    }
}

struct LookupDirectory {
    directory: Arc<dyn AadhaarDirectory>,
}
impl StepHandler for LookupDirectory {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let number = cx.get_str(keys::AADHAAR_NUMBER).unwrap_or("").to_string();
        match self.directory.verify(&number) {
            Ok(LookupOutcome::Verified(record)) => {
                cx.set_str(keys::HOLDER_NAME, record.holder_name);
                cx.set_str(keys::DOB, record.dob);
                cx.set_str(keys::ADDRESS, record.address);
                StepOutcome::decide("found")
            }
            Ok(LookupOutcome::NoMatch) => StepOutcome::decide("no_match"),
            Err(err) => {
                log::warn!("uidai lookup failed: {err}");
                StepOutcome::decide(cx.retry_or_terminate(phases::LOOKUP))
            }
        }
    }
}

struct PromptConfirmation;
impl StepHandler for PromptConfirmation {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let details = AadhaarDetails {
            aadhaar_number: cx.get_str(keys::AADHAAR_NUMBER).unwrap_or("").to_string(),
            holder_name: cx.get_str(keys::HOLDER_NAME).unwrap_or("").to_string(),
            dob: cx.get_str(keys::DOB).unwrap_or("").to_string(),
            address: cx.get_str(keys::ADDRESS).unwrap_or("").to_string(),
        };
        StepOutcome::message(format!(
            "We found the following details on record:\n{}\nIs this correct? (yes/no)",
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
        } else if is_negative(input) {
            StepOutcome::decide("no")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::CONFIRMATION))
        }
    }
}

struct Finish;
impl StepHandler for Finish {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let number = cx.get_str(keys::AADHAAR_NUMBER).unwrap_or("");
        StepOutcome::message(format!(
            "Your Aadhaar {} has been verified successfully.",
            mask_aadhaar(number)
        ))
    }
}

/// Grafo completo del workflow Aadhaar.
pub fn definition(
    directory: Arc<dyn AadhaarDirectory>,
    otp: Arc<dyn OtpVerifier>,
) -> Result<WorkflowDefinition, DefinitionError> {
    WorkflowDefinition::builder(KEY)
        .step("prompt_number", PromptNumber)
        .step("check_number_format", CheckNumberFormat)
        .step(
            "prompt_otp",
            PromptOtp {
                otp: Arc::clone(&otp),
            },
        )
        .step("check_otp_format", CheckOtpFormat)
        .step("check_otp_code", CheckOtpCode { otp })
        .step("lookup_directory", LookupDirectory { directory })
        .step("prompt_confirmation", PromptConfirmation)
        .step("check_confirmation", CheckConfirmation)
        .step("finish", Finish)
        .step(
            "reject",
            Say("We could not verify this Aadhaar number against the registry."),
        )
        .step(
            "mismatch",
            Say("The details on record do not match. Aadhaar verification was not completed."),
        )
        .step(
            "abort",
            Say("Too many failed attempts. Aadhaar verification was not completed."),
        )
        .edge("prompt_number", "check_number_format")
        .branch(
            "check_number_format",
            &[
                ("valid", "prompt_otp"),
                ("retry", "prompt_number"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_otp", "check_otp_format")
        .branch(
            "check_otp_format",
            &[
                ("valid", "check_otp_code"),
                ("retry", "prompt_otp"),
                ("terminate", "abort"),
            ],
        )
        .branch(
            "check_otp_code",
            &[
                ("valid", "lookup_directory"),
                ("retry", "prompt_otp"),
                ("terminate", "abort"),
            ],
        )
        .branch(
            "lookup_directory",
            &[
                ("found", "prompt_confirmation"),
                ("no_match", "reject"),
                ("retry", "lookup_directory"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_confirmation", "check_confirmation")
        .branch(
            "check_confirmation",
            &[
                ("yes", "finish"),
                ("no", "mismatch"),
                ("retry", "prompt_confirmation"),
                ("terminate", "abort"),
            ],
        )
        .pause_after(
            "prompt_number",
            "I still need your 12 digit Aadhaar number to continue.",
        )
        .pause_after(
            "prompt_otp",
            "I still need the 6 digit OTP we sent to your mobile number.",
        )
        .pause_after(
            "prompt_confirmation",
            "Please confirm the Aadhaar details with yes or no.",
        )
        .terminal_success("finish")
        .terminal_failure("reject")
        .terminal_failure("mismatch")
        .terminal_failure("abort")
        .retry_limit(phases::NUMBER_FORMAT, phases::FORMAT_LIMIT)
        .retry_limit(phases::OTP_FORMAT, phases::FORMAT_LIMIT)
        .retry_limit(phases::OTP_CODE, phases::CODE_LIMIT)
        .retry_limit(phases::LOOKUP, phases::LOOKUP_LIMIT)
        .retry_limit(phases::CONFIRMATION, phases::CONFIRMATION_LIMIT)
        .build()
}
