//! Contrato de ejecución de un step y su contexto.

use serde_json::{Map, Value};

use super::retry::{RetryCounters, RetryLimits};
use crate::constants::{DECIDE_RETRY, DECIDE_TERMINATE};
use crate::model::Decision;

/// Resultado de ejecutar un step.
///
/// - `decision`: etiqueta que selecciona la transición saliente. `None` para
///   steps con una única arista incondicional.
/// - `message`: fragmento de mensaje al usuario. Si varios steps del mismo
///   turno escriben, el último gana (es el comportamiento esperado: el
///   prompt final reemplaza a los intermedios).
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub decision: Option<Decision>,
    pub message: Option<String>,
}

impl StepOutcome {
    /// Continuar por la única arista incondicional, sin mensaje.
    pub fn proceed() -> Self {
        Self::default()
    }

    pub fn decide(label: impl Into<Decision>) -> Self {
        Self {
            decision: Some(label.into()),
            message: None,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            decision: None,
            message: Some(text.into()),
        }
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        self.message = Some(text.into());
        self
    }
}

/// Contexto mutable entregado a `StepHandler::execute`.
///
/// El input del usuario está disponible durante todo el turno: el step que
/// sigue a la pausa lo consume primero, y los steps de decisión posteriores
/// del mismo turno pueden releerlo.
pub struct StepContext<'a> {
    input: &'a str,
    payload: &'a mut Map<String, Value>,
    counters: &'a mut RetryCounters,
    limits: &'a RetryLimits,
    bumps: Vec<(String, u32)>,
}

impl<'a> StepContext<'a> {
    pub fn new(
        input: &'a str,
        payload: &'a mut Map<String, Value>,
        counters: &'a mut RetryCounters,
        limits: &'a RetryLimits,
    ) -> Self {
        Self {
            input,
            payload,
            counters,
            limits,
            bumps: Vec::new(),
        }
    }

    /// Input crudo del turno ("" cuando el turno no trae texto).
    pub fn input(&self) -> &str {
        self.input
    }

    pub fn attempts(&self, phase: &str) -> u32 {
        self.counters.attempts(phase)
    }

    /// Registra un fallo de la fase y decide `retry`/`terminate` contra el
    /// límite configurado. Una fase sin límite configurado nunca termina por
    /// esta vía (el builder exige límites explícitos para las fases usadas).
    pub fn retry_or_terminate(&mut self, phase: &str) -> Decision {
        let attempt = self.counters.bump(phase);
        self.bumps.push((phase.to_string(), attempt));
        match self.limits.limit(phase) {
            Some(limit) if attempt >= limit => Decision::new(DECIDE_TERMINATE),
            _ => Decision::new(DECIDE_RETRY),
        }
    }

    // --- helpers de payload ---

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.payload.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.payload.insert(key.to_string(), value);
    }

    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.payload.insert(key.to_string(), Value::String(value.into()));
    }

    pub fn payload(&self) -> &Map<String, Value> {
        self.payload
    }

    /// Consumida por el motor tras `execute` para registrar eventos
    /// `RetryRecorded`.
    pub(crate) fn into_bumps(self) -> Vec<(String, u32)> {
        self.bumps
    }
}

/// Un step ejecutable. Implementaciones deben ser puras respecto de
/// (contexto, input); todo efecto colateral es una llamada bloqueante a un
/// colaborador inyectado en la construcción del handler.
pub trait StepHandler: Send + Sync {
    fn execute(&self, cx: &mut StepContext<'_>) -> StepOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn retry_or_terminate_respects_limit() {
        let mut payload = Map::new();
        let mut counters = RetryCounters::default();
        let mut limits = IndexMap::new();
        limits.insert("format".to_string(), 2u32);
        let limits = RetryLimits::new(limits);

        let mut cx = StepContext::new("", &mut payload, &mut counters, &limits);
        assert_eq!(cx.retry_or_terminate("format").as_str(), "retry");
        assert_eq!(cx.retry_or_terminate("format").as_str(), "terminate");
        let bumps = cx.into_bumps();
        assert_eq!(bumps, vec![("format".to_string(), 1), ("format".to_string(), 2)]);
    }
}
