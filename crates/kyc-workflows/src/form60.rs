//! Workflow Form 60: ingreso agrícola y otros ingresos.
//!
//! Dos preguntas en secuencia con una única fase de reintento compartida:
//! dos montos ilegibles en total, en cualquiera de las dos preguntas,
//! terminan el run.

use kyc_core::{DefinitionError, StepContext, StepHandler, StepOutcome, WorkflowDefinition};
use kyc_domain::validators::parse_income;
use kyc_domain::Form60Details;
use serde_json::Value;

use crate::{keys, phases, Say};

pub const KEY: &str = "form60";

struct PromptAgriIncome;
impl StepHandler for PromptAgriIncome {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::INCOME_FORMAT) > 0 {
            StepOutcome::message(
                "That amount was not readable. Please share your annual agricultural \
                 income in rupees, digits only.",
            )
        } else {
            StepOutcome::message(
                "Form 60 declaration. What is your annual agricultural income in rupees?",
            )
        }
    }
}

struct CheckAgriIncome;
impl StepHandler for CheckAgriIncome {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        match parse_income(cx.input()) {
            Some(amount) => {
                cx.set(keys::AGRICULTURAL_INCOME, Value::from(amount));
                StepOutcome::decide("valid")
            }
            None => StepOutcome::decide(cx.retry_or_terminate(phases::INCOME_FORMAT)),
        }
    }
}

struct PromptOtherIncome;
impl StepHandler for PromptOtherIncome {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        if cx.attempts(phases::INCOME_FORMAT) > 0 && !cx.contains(keys::OTHER_INCOME) {
            // puede venir de un fallo en cualquiera de las dos preguntas
            StepOutcome::message(
                "What is your annual income from other sources, in rupees, digits only?",
            )
        } else {
            StepOutcome::message("And what is your annual income from other sources?")
        }
    }
}

struct CheckOtherIncome;
impl StepHandler for CheckOtherIncome {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        match parse_income(cx.input()) {
            Some(amount) => {
                cx.set(keys::OTHER_INCOME, Value::from(amount));
                StepOutcome::decide("valid")
            }
            None => StepOutcome::decide(cx.retry_or_terminate(phases::INCOME_FORMAT)),
        }
    }
}

struct Finish;
impl StepHandler for Finish {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome {
        let agri = cx
            .payload()
            .get(keys::AGRICULTURAL_INCOME)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let other = cx
            .payload()
            .get(keys::OTHER_INCOME)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let details = Form60Details {
            agricultural_income: agri,
            other_income: other,
        };
        StepOutcome::message(format!(
            "Your Form 60 declaration has been recorded.\n{}",
            details.summary()
        ))
    }
}

/// Grafo completo del workflow Form 60.
pub fn definition() -> Result<WorkflowDefinition, DefinitionError> {
    WorkflowDefinition::builder(KEY)
        .step("prompt_agri_income", PromptAgriIncome)
        .step("check_agri_income", CheckAgriIncome)
        .step("prompt_other_income", PromptOtherIncome)
        .step("check_other_income", CheckOtherIncome)
        .step("finish", Finish)
        .step(
            "abort",
            Say("Too many unreadable amounts. The Form 60 declaration was not recorded."),
        )
        .edge("prompt_agri_income", "check_agri_income")
        .branch(
            "check_agri_income",
            &[
                ("valid", "prompt_other_income"),
                ("retry", "prompt_agri_income"),
                ("terminate", "abort"),
            ],
        )
        .edge("prompt_other_income", "check_other_income")
        .branch(
            "check_other_income",
            &[
                ("valid", "finish"),
                ("retry", "prompt_other_income"),
                ("terminate", "abort"),
            ],
        )
        .pause_after(
            "prompt_agri_income",
            "I still need your annual agricultural income to finish Form 60.",
        )
        .pause_after(
            "prompt_other_income",
            "I still need your annual income from other sources to finish Form 60.",
        )
        .terminal_success("finish")
        .terminal_failure("abort")
        .retry_limit(phases::INCOME_FORMAT, phases::FORMAT_LIMIT)
        .build()
}
