//! Política de reintentos por fase.
//!
//! Cada fase reintentable (formato de número, código OTP, confirmación de
//! datos extraídos...) lleva su propio contador dentro de la instancia.
//! Nunca se comparten entre instancias ni entre fases: un contador global de
//! proceso mezclaría sesiones distintas.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Contadores por fase, parte del estado serializado de la instancia.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryCounters {
    counts: BTreeMap<String, u32>,
}

impl RetryCounters {
    /// Incrementa la fase y devuelve el número de intento resultante.
    pub fn bump(&mut self, phase: &str) -> u32 {
        let n = self.counts.entry(phase.to_string()).or_insert(0);
        *n += 1;
        *n
    }

    pub fn attempts(&self, phase: &str) -> u32 {
        self.counts.get(phase).copied().unwrap_or(0)
    }
}

/// Umbrales por fase, configuración inmutable de la definición.
///
/// Semántica: con límite N, los fallos 1..N-1 producen `retry` y el fallo
/// N-ésimo produce `terminate`. Los valores observados en este dominio son 2
/// para fases de formato y 3 para código/lookup.
#[derive(Debug, Clone, Default)]
pub struct RetryLimits {
    limits: IndexMap<String, u32>,
}

impl RetryLimits {
    pub fn new(limits: IndexMap<String, u32>) -> Self {
        Self { limits }
    }

    pub fn limit(&self, phase: &str) -> Option<u32> {
        self.limits.get(phase).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.limits.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_monotonic_and_per_phase() {
        let mut c = RetryCounters::default();
        assert_eq!(c.bump("format"), 1);
        assert_eq!(c.bump("format"), 2);
        assert_eq!(c.attempts("format"), 2);
        // otra fase arranca desde cero
        assert_eq!(c.attempts("otp_code"), 0);
        assert_eq!(c.bump("otp_code"), 1);
    }
}
