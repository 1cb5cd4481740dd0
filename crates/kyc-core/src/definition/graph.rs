//! Estructura inmutable del grafo.

use indexmap::IndexMap;

use crate::model::{Decision, StepId, WorkflowKey};
use crate::step::{RetryLimits, StepHandler, TerminalKind};

/// Transición saliente de un step.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Única arista incondicional (steps de prompt, preparación, etc.).
    Always(StepId),
    /// Aristas seleccionadas por la etiqueta de decisión del step.
    ByDecision(IndexMap<Decision, StepId>),
}

/// Grafo dirigido inmutable de un workflow documental.
///
/// Invariantes (garantizadas por el builder):
/// - todo endpoint de transición está registrado;
/// - los terminales no tienen aristas salientes;
/// - todo step de pausa tiene arista saliente y texto de retorno;
/// - ningún step no-terminal queda sin salida.
pub struct WorkflowDefinition {
    pub(crate) key: WorkflowKey,
    pub(crate) entry: StepId,
    pub(crate) handlers: IndexMap<StepId, Box<dyn StepHandler>>,
    pub(crate) transitions: IndexMap<StepId, Transition>,
    /// step de pausa -> texto de guía para retomar el prompt pendiente.
    pub(crate) pause_after: IndexMap<StepId, String>,
    pub(crate) terminals: IndexMap<StepId, TerminalKind>,
    pub(crate) retry_limits: RetryLimits,
    pub(crate) definition_hash: String,
}

impl std::fmt::Debug for WorkflowDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowDefinition")
            .field("key", &self.key)
            .field("entry", &self.entry)
            .field("steps", &self.handlers.keys().collect::<Vec<_>>())
            .field("transitions", &self.transitions)
            .field("pause_after", &self.pause_after)
            .field("terminals", &self.terminals)
            .field("retry_limits", &self.retry_limits)
            .field("definition_hash", &self.definition_hash)
            .finish()
    }
}

impl WorkflowDefinition {
    pub fn builder(key: impl Into<WorkflowKey>) -> super::WorkflowBuilder {
        super::WorkflowBuilder::new(key.into())
    }

    pub fn key(&self) -> &WorkflowKey {
        &self.key
    }

    pub fn entry(&self) -> &StepId {
        &self.entry
    }

    pub fn handler(&self, step: &StepId) -> Option<&dyn StepHandler> {
        self.handlers.get(step).map(|b| b.as_ref())
    }

    pub fn has_step(&self, step: &StepId) -> bool {
        self.handlers.contains_key(step)
    }

    /// Resuelve la transición saliente para la decisión emitida. `None`
    /// significa error de configuración (el motor lo convierte en
    /// `EngineError::MissingTransition`).
    pub fn next_step(&self, from: &StepId, decision: Option<&Decision>) -> Option<&StepId> {
        match self.transitions.get(from)? {
            Transition::Always(next) => Some(next),
            Transition::ByDecision(map) => decision.and_then(|d| map.get(d)),
        }
    }

    pub fn pauses_after(&self, step: &StepId) -> bool {
        self.pause_after.contains_key(step)
    }

    /// Texto de guía configurado para un step de pausa.
    pub fn follow_up(&self, step: &StepId) -> Option<&str> {
        self.pause_after.get(step).map(String::as_str)
    }

    pub fn terminal_kind(&self, step: &StepId) -> Option<TerminalKind> {
        self.terminals.get(step).copied()
    }

    pub fn retry_limits(&self) -> &RetryLimits {
        &self.retry_limits
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    pub fn step_ids(&self) -> impl Iterator<Item = &StepId> {
        self.handlers.keys()
    }
}
