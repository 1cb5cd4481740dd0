//! Construcción y validación de definiciones.
//!
//! El builder acumula steps, aristas, pausas y límites; `build` valida la
//! forma del grafo y sella el hash de definición. Un grafo mal formado es un
//! error de programación del workflow, por eso se rechaza al construir y no
//! en runtime.

use indexmap::IndexMap;
use serde_json::{json, Value};
use thiserror::Error;

use super::graph::{Transition, WorkflowDefinition};
use crate::constants::ENGINE_VERSION;
use crate::hashing::hash_value;
use crate::model::{Decision, StepId, WorkflowKey};
use crate::step::{RetryLimits, StepHandler, TerminalKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("workflow '{workflow}' has no steps")]
    Empty { workflow: String },
    #[error("workflow '{workflow}': step '{step}' registered twice")]
    DuplicateStep { workflow: String, step: String },
    #[error("workflow '{workflow}': transition references unknown step '{step}'")]
    UnknownEndpoint { workflow: String, step: String },
    #[error("workflow '{workflow}': step '{step}' already has an outgoing transition")]
    DuplicateTransition { workflow: String, step: String },
    #[error("workflow '{workflow}': terminal step '{step}' has an outgoing transition")]
    TerminalWithEdge { workflow: String, step: String },
    #[error("workflow '{workflow}': terminal step '{step}' marked as pause")]
    TerminalPause { workflow: String, step: String },
    #[error("workflow '{workflow}': pause step '{step}' has no outgoing transition")]
    PauseWithoutEdge { workflow: String, step: String },
    #[error("workflow '{workflow}': step '{step}' is a dead end (no transition, not terminal)")]
    DeadEnd { workflow: String, step: String },
    #[error("workflow '{workflow}': retry limit for phase '{phase}' must be at least 1")]
    ZeroRetryLimit { workflow: String, phase: String },
}

/// Builder fluido. El primer step registrado es el entry.
pub struct WorkflowBuilder {
    key: WorkflowKey,
    handlers: IndexMap<StepId, Box<dyn StepHandler>>,
    transitions: IndexMap<StepId, Transition>,
    pause_after: IndexMap<StepId, String>,
    terminals: IndexMap<StepId, TerminalKind>,
    retry_limits: IndexMap<String, u32>,
    duplicate: Option<StepId>,
}

impl WorkflowBuilder {
    pub fn new(key: WorkflowKey) -> Self {
        Self {
            key,
            handlers: IndexMap::new(),
            transitions: IndexMap::new(),
            pause_after: IndexMap::new(),
            terminals: IndexMap::new(),
            retry_limits: IndexMap::new(),
            duplicate: None,
        }
    }

    pub fn step(mut self, id: impl Into<StepId>, handler: impl StepHandler + 'static) -> Self {
        let id = id.into();
        if self.handlers.insert(id.clone(), Box::new(handler)).is_some() {
            self.duplicate.get_or_insert(id);
        }
        self
    }

    /// Arista incondicional `from -> to`.
    pub fn edge(mut self, from: impl Into<StepId>, to: impl Into<StepId>) -> Self {
        let from = from.into();
        if self
            .transitions
            .insert(from.clone(), Transition::Always(to.into()))
            .is_some()
        {
            self.duplicate.get_or_insert(from);
        }
        self
    }

    /// Aristas etiquetadas `from --label--> to`.
    pub fn branch(mut self, from: impl Into<StepId>, edges: &[(&str, &str)]) -> Self {
        let from = from.into();
        let mut map = IndexMap::new();
        for (label, to) in edges {
            map.insert(Decision::new(*label), StepId::new(*to));
        }
        if self
            .transitions
            .insert(from.clone(), Transition::ByDecision(map))
            .is_some()
        {
            self.duplicate.get_or_insert(from);
        }
        self
    }

    /// Marca `step` como pausa: el turno termina tras ejecutarlo y el
    /// checkpoint apunta a su sucesor. `follow_up` es el texto de guía que el
    /// router repite cuando el usuario se desvía con el prompt pendiente.
    pub fn pause_after(mut self, step: impl Into<StepId>, follow_up: impl Into<String>) -> Self {
        self.pause_after.insert(step.into(), follow_up.into());
        self
    }

    pub fn terminal_success(mut self, step: impl Into<StepId>) -> Self {
        self.terminals.insert(step.into(), TerminalKind::Success);
        self
    }

    pub fn terminal_failure(mut self, step: impl Into<StepId>) -> Self {
        self.terminals.insert(step.into(), TerminalKind::Failure);
        self
    }

    pub fn retry_limit(mut self, phase: impl Into<String>, limit: u32) -> Self {
        self.retry_limits.insert(phase.into(), limit);
        self
    }

    pub fn build(self) -> Result<WorkflowDefinition, DefinitionError> {
        let workflow = self.key.as_str().to_string();

        if let Some(step) = self.duplicate {
            return Err(DefinitionError::DuplicateStep {
                workflow,
                step: step.as_str().to_string(),
            });
        }
        let entry = match self.handlers.keys().next() {
            Some(first) => first.clone(),
            None => return Err(DefinitionError::Empty { workflow }),
        };

        // Endpoints: origen y destino de cada transición deben existir.
        for (from, transition) in &self.transitions {
            if !self.handlers.contains_key(from) {
                return Err(DefinitionError::UnknownEndpoint {
                    workflow,
                    step: from.as_str().to_string(),
                });
            }
            let targets: Vec<&StepId> = match transition {
                Transition::Always(to) => vec![to],
                Transition::ByDecision(map) => map.values().collect(),
            };
            for to in targets {
                if !self.handlers.contains_key(to) {
                    return Err(DefinitionError::UnknownEndpoint {
                        workflow,
                        step: to.as_str().to_string(),
                    });
                }
            }
        }

        for (step, _) in &self.terminals {
            if !self.handlers.contains_key(step) {
                return Err(DefinitionError::UnknownEndpoint {
                    workflow,
                    step: step.as_str().to_string(),
                });
            }
            if self.transitions.contains_key(step) {
                return Err(DefinitionError::TerminalWithEdge {
                    workflow,
                    step: step.as_str().to_string(),
                });
            }
            if self.pause_after.contains_key(step) {
                return Err(DefinitionError::TerminalPause {
                    workflow,
                    step: step.as_str().to_string(),
                });
            }
        }

        for (step, _) in &self.pause_after {
            if !self.handlers.contains_key(step) {
                return Err(DefinitionError::UnknownEndpoint {
                    workflow,
                    step: step.as_str().to_string(),
                });
            }
            if !self.transitions.contains_key(step) {
                return Err(DefinitionError::PauseWithoutEdge {
                    workflow,
                    step: step.as_str().to_string(),
                });
            }
        }

        // Ningún step no-terminal puede quedar sin salida.
        for step in self.handlers.keys() {
            if !self.transitions.contains_key(step) && !self.terminals.contains_key(step) {
                return Err(DefinitionError::DeadEnd {
                    workflow,
                    step: step.as_str().to_string(),
                });
            }
        }

        for (phase, limit) in &self.retry_limits {
            if *limit == 0 {
                return Err(DefinitionError::ZeroRetryLimit {
                    workflow,
                    phase: phase.clone(),
                });
            }
        }

        let definition_hash = shape_hash(
            &self.key,
            &entry,
            &self.handlers,
            &self.transitions,
            &self.pause_after,
            &self.terminals,
            &self.retry_limits,
        );

        Ok(WorkflowDefinition {
            key: self.key,
            entry,
            handlers: self.handlers,
            transitions: self.transitions,
            pause_after: self.pause_after,
            terminals: self.terminals,
            retry_limits: RetryLimits::new(self.retry_limits),
            definition_hash,
        })
    }
}

/// Hash estable de la forma del grafo (ids, aristas, pausas, terminales,
/// límites, versión del motor). No incluye los handlers: dos builds del mismo
/// binario producen el mismo hash, y un cambio estructural lo invalida.
fn shape_hash(
    key: &WorkflowKey,
    entry: &StepId,
    handlers: &IndexMap<StepId, Box<dyn StepHandler>>,
    transitions: &IndexMap<StepId, Transition>,
    pause_after: &IndexMap<StepId, String>,
    terminals: &IndexMap<StepId, TerminalKind>,
    retry_limits: &IndexMap<String, u32>,
) -> String {
    let steps: Vec<&str> = handlers.keys().map(StepId::as_str).collect();
    let edges: Vec<Value> = transitions
        .iter()
        .map(|(from, t)| match t {
            Transition::Always(to) => json!([from.as_str(), null, to.as_str()]),
            Transition::ByDecision(map) => {
                let labelled: Vec<Value> = map
                    .iter()
                    .map(|(label, to)| json!([from.as_str(), label.as_str(), to.as_str()]))
                    .collect();
                Value::Array(labelled)
            }
        })
        .collect();
    let pauses: Vec<&str> = pause_after.keys().map(StepId::as_str).collect();
    let terms: Vec<Value> = terminals
        .iter()
        .map(|(s, k)| json!([s.as_str(), matches!(k, TerminalKind::Success)]))
        .collect();
    let limits: Vec<Value> = retry_limits
        .iter()
        .map(|(phase, n)| json!([phase, n]))
        .collect();

    hash_value(&json!({
        "engine": ENGINE_VERSION,
        "workflow": key.as_str(),
        "entry": entry.as_str(),
        "steps": steps,
        "edges": edges,
        "pauses": pauses,
        "terminals": terms,
        "retry_limits": limits,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{StepContext, StepOutcome};

    struct Noop;
    impl StepHandler for Noop {
        fn execute(&self, _cx: &mut StepContext<'_>) -> StepOutcome {
            StepOutcome::proceed()
        }
    }

    fn two_step() -> WorkflowBuilder {
        WorkflowDefinition::builder("demo")
            .step("ask", Noop)
            .step("done", Noop)
            .edge("ask", "done")
            .terminal_success("done")
    }

    #[test]
    fn builds_a_minimal_graph() {
        let def = two_step().build().unwrap();
        assert_eq!(def.entry().as_str(), "ask");
        assert!(def.terminal_kind(&StepId::new("done")).is_some());
        assert!(!def.definition_hash().is_empty());
    }

    #[test]
    fn rejects_unknown_endpoint() {
        let err = WorkflowDefinition::builder("demo")
            .step("ask", Noop)
            .edge("ask", "missing")
            .build()
            .unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownEndpoint { .. }));
    }

    #[test]
    fn rejects_dead_end() {
        let err = WorkflowDefinition::builder("demo")
            .step("ask", Noop)
            .step("stuck", Noop)
            .edge("ask", "stuck")
            .build()
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DeadEnd { .. }));
    }

    #[test]
    fn rejects_pause_on_terminal() {
        let err = two_step()
            .pause_after("done", "please answer")
            .build()
            .unwrap_err();
        assert!(matches!(err, DefinitionError::TerminalPause { .. }));
    }

    #[test]
    fn rejects_pause_without_edge() {
        let err = WorkflowDefinition::builder("demo")
            .step("ask", Noop)
            .step("done", Noop)
            .edge("done", "done")
            .pause_after("ask", "please answer")
            .build()
            .unwrap_err();
        assert!(matches!(err, DefinitionError::PauseWithoutEdge { .. }));
    }

    #[test]
    fn hash_changes_with_shape() {
        let a = two_step().build().unwrap();
        let b = two_step().pause_after("ask", "waiting").build().unwrap();
        assert_ne!(a.definition_hash(), b.definition_hash());
    }

    #[test]
    fn hash_is_stable_across_builds() {
        let a = two_step().build().unwrap();
        let b = two_step().build().unwrap();
        assert_eq!(a.definition_hash(), b.definition_hash());
    }
}
