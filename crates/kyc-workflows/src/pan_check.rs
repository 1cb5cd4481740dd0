//! Sondeo de elegibilidad PAN.
//!
//! Se arranca cuando la persona declara no tener PAN: tres preguntas en
//! secuencia (cuenta bancaria, ITR reciente, ocupación) con una única fase
//! de reintento compartida, y un análisis final que recomienda seguir con
//! PAN o con la declaración Form 60. El sondeo no verifica ningún
//! documento; solo orienta el siguiente paso.

use std::sync::Arc;

use kyc_core::{DefinitionError, StepContext, StepHandler, StepOutcome, WorkflowDefinition};
use kyc_domain::validators::{is_affirmative, is_negative};
use kyc_domain::{PanEligibilityAnalyzer, ProbeAnswers};
use serde_json::Value;

use crate::{keys, phases, Say};

pub const KEY: &str = "pan_check";

struct PromptBankAccount;
impl StepHandler for PromptBankAccount {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::PROBE_FORMAT) > 0 {
            StepOutcome::message(
                "Please answer yes or no. Do you currently have an active bank account?",
            )
        } else {
            StepOutcome::message(
                "I understand you do not have a PAN card. To follow the correct \
                 procedure I need to ask a few questions, please answer accurately.\n\
                 Do you currently have an active bank account? (yes/no)",
            )
        }
    }
}

struct CheckBankAccount;
impl StepHandler for CheckBankAccount {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let input = cx.input();
        if is_affirmative(input) {
            cx.set(keys::HAS_BANK_ACCOUNT, Value::Bool(true));
            StepOutcome::decide("answered")
        } else if is_negative(input) {
            cx.set(keys::HAS_BANK_ACCOUNT, Value::Bool(false));
            StepOutcome::decide("answered")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::PROBE_FORMAT))
        }
    }
}

struct PromptItr;
impl StepHandler for PromptItr {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::PROBE_FORMAT) > 0 && !cx.contains(keys::FILED_ITR) {
            // el reintento puede venir de esta pregunta o de la anterior
            StepOutcome::message(
                "Please answer yes or no. Have you filed an Income Tax Return (ITR) \
                 in India in the last 3 years?",
            )
        } else {
            StepOutcome::message(
                "Have you filed an Income Tax Return (ITR) in India in the last \
                 3 years? (yes/no)",
            )
        }
    }
}

struct CheckItr;
impl StepHandler for CheckItr {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let input = cx.input();
        if is_affirmative(input) {
            cx.set(keys::FILED_ITR, Value::Bool(true));
            StepOutcome::decide("answered")
        } else if is_negative(input) {
            cx.set(keys::FILED_ITR, Value::Bool(false));
            StepOutcome::decide("answered")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::PROBE_FORMAT))
        }
    }
}

struct PromptOccupation;
impl StepHandler for PromptOccupation {
    fn execute(&self, _cx: &mut StepContext<'_>) -> StepOutcome {
        StepOutcome::message(
            "What best describes your occupation? For example salaried, \
             self-employed, business owner, student, homemaker, retired or \
             unemployed.",
        )
    }
}

struct CaptureOccupation;
impl StepHandler for CaptureOccupation {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let occupation = cx.input().trim().to_string();
        if occupation.chars().any(|c| c.is_alphabetic()) {
            cx.set_str(keys::OCCUPATION, occupation);
            StepOutcome::decide("valid")
        } else {
            StepOutcome::decide(cx.retry_or_terminate(phases::PROBE_FORMAT))
        }
    }
}

struct Analyze {
    analyzer: Arc<dyn PanEligibilityAnalyzer>,
}
impl StepHandler for Analyze {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let answers = ProbeAnswers {
            has_bank_account: cx
                .payload()
                .get(keys::HAS_BANK_ACCOUNT)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            filed_itr: cx
                .payload()
                .get(keys::FILED_ITR)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            occupation: cx.get_str(keys::OCCUPATION).unwrap_or("").to_string(),
        };
        match self.analyzer.likely_has_pan(&answers) {
            Ok(true) => StepOutcome::decide("pan"),
            Ok(false) => StepOutcome::decide("form60"),
            Err(err) => {
                log::warn!("eligibility analysis failed: {err}");
                StepOutcome::decide(cx.retry_or_terminate(phases::ANALYSIS))
            }
        }
    }
}

/// Grafo completo del sondeo de elegibilidad.
pub fn definition(
    analyzer: Arc<dyn PanEligibilityAnalyzer>,
) -> Result<WorkflowDefinition, DefinitionError> {
    WorkflowDefinition::builder(KEY)
        .step("prompt_bank_account", PromptBankAccount)
        .step("check_bank_account", CheckBankAccount)
        .step("prompt_itr", PromptItr)
        .step("check_itr", CheckItr)
        .step("prompt_occupation", PromptOccupation)
        .step("capture_occupation", CaptureOccupation)
        .step("analyze", Analyze { analyzer })
        .step(
            "recommend_pan",
            Say("Based on your answers you are likely required to hold a PAN card. \
                 Please proceed with PAN verification, or with Form 60 only if you \
                 are certain you do not have one."),
        )
        .step(
            "recommend_form60",
            Say("Thank you for answering. Based on your answers you can proceed \
                 with a Form 60 declaration instead of PAN verification."),
        )
        .step(
            "abort",
            Say("Too many unreadable answers. The PAN eligibility check was not \
                 completed."),
        )
        .edge("prompt_bank_account", "check_bank_account")
        .branch(
            "check_bank_account",
            &[
                ("answered", "prompt_itr"),
                ("retry", "prompt_bank_account"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_itr", "check_itr")
        .branch(
            "check_itr",
            &[
                ("answered", "prompt_occupation"),
                ("retry", "prompt_itr"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_occupation", "capture_occupation")
        .branch(
            "capture_occupation",
            &[
                ("valid", "analyze"),
                ("retry", "prompt_occupation"),
                ("terminate", "abort"),
            ],
        )
        .branch(
            "analyze",
            &[
                ("pan", "recommend_pan"),
                ("form60", "recommend_form60"),
                ("retry", "analyze"),
                ("terminate", "abort"),
            ],
        )
        .pause_after(
            "prompt_bank_account",
            "Please answer the bank account question with yes or no.",
        )
        .pause_after(
            "prompt_itr",
            "Please answer the income tax return question with yes or no.",
        )
        .pause_after(
            "prompt_occupation",
            "I still need your occupation to finish the eligibility check.",
        )
        .terminal_success("recommend_pan")
        .terminal_success("recommend_form60")
        .terminal_failure("abort")
        .retry_limit(phases::PROBE_FORMAT, phases::FORMAT_LIMIT)
        .retry_limit(phases::ANALYSIS, phases::LOOKUP_LIMIT)
        .build()
}
