//! Traversal de un turno.

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::checkpoint::{Checkpoint, CheckpointStore, PauseState};
use crate::constants::MAX_STEPS_PER_TURN;
use crate::definition::WorkflowDefinition;
use crate::errors::EngineError;
use crate::event::{EventStore, WorkflowEvent, WorkflowEventKind};
use crate::model::{SessionId, StepId, WorkflowInstance, WorkflowKey, WorkflowStatus};
use crate::step::{StepContext, TerminalKind};

/// Resultado observable de un turno.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub run_id: Uuid,
    pub workflow: WorkflowKey,
    pub status: WorkflowStatus,
    /// Mensaje al usuario compuesto por los steps del turno.
    pub message: String,
    /// Step de prompt en el que quedó pausado el run, si quedó pausado.
    pub awaiting: Option<StepId>,
    /// Snapshot del payload al cierre del turno.
    pub payload: Map<String, Value>,
}

/// Intérprete de definiciones. Sin estado propio: todo lo durable vive en
/// los stores compartidos, de modo que varios motores (o varios procesos con
/// el backend Postgres) ven los mismos checkpoints.
pub struct WorkflowEngine<C: CheckpointStore, E: EventStore> {
    checkpoints: Arc<C>,
    events: Arc<E>,
}

impl<C: CheckpointStore, E: EventStore> WorkflowEngine<C, E> {
    pub fn new(checkpoints: Arc<C>, events: Arc<E>) -> Self {
        Self { checkpoints, events }
    }

    /// Avanza el workflow de la sesión un turno: retoma el run pausado si lo
    /// hay, o arranca una instancia fresca si no hay run activo.
    pub fn advance(
        &self,
        definition: &WorkflowDefinition,
        session: &SessionId,
        input: &str,
    ) -> Result<TurnOutcome, EngineError> {
        self.advance_seeded(definition, session, input, None)
    }

    /// Como `advance`, pero si el turno arranca una instancia nueva, `seed`
    /// precarga el payload (datos ya verificados en otro workflow). Un run
    /// pausado ignora el seed: su payload manda.
    pub fn advance_seeded(
        &self,
        definition: &WorkflowDefinition,
        session: &SessionId,
        input: &str,
        seed: Option<Map<String, Value>>,
    ) -> Result<TurnOutcome, EngineError> {
        let existing = self.checkpoints.load(session, definition.key())?;

        let (mut instance, mut current) = match existing {
            Some(Checkpoint {
                instance,
                pause: Some(pause),
                definition_hash,
                ..
            }) if instance.status == WorkflowStatus::InProgress => {
                if definition_hash != definition.definition_hash() {
                    return Err(EngineError::DefinitionMismatch {
                        workflow: definition.key().clone(),
                    });
                }
                self.events.append(
                    instance.run_id,
                    WorkflowEventKind::Resumed {
                        step: pause.next.clone(),
                    },
                )?;
                log::debug!(
                    "resuming workflow={} session={} at step={}",
                    definition.key(),
                    session,
                    pause.next
                );
                (instance, pause.next)
            }
            _ => {
                let mut instance = WorkflowInstance::new(definition.key().clone());
                if let Some(seed) = seed {
                    instance.payload.extend(seed);
                }
                self.events.append(
                    instance.run_id,
                    WorkflowEventKind::RunStarted {
                        workflow: definition.key().as_str().to_string(),
                        definition_hash: definition.definition_hash().to_string(),
                    },
                )?;
                log::debug!(
                    "starting workflow={} session={} run={}",
                    definition.key(),
                    session,
                    instance.run_id
                );
                (instance, definition.entry().clone())
            }
        };

        let mut hops = 0usize;
        loop {
            hops += 1;
            if hops > MAX_STEPS_PER_TURN {
                return Err(EngineError::TraversalBudget(MAX_STEPS_PER_TURN));
            }

            let Some(handler) = definition.handler(&current) else {
                return Err(EngineError::UnknownStep {
                    workflow: definition.key().clone(),
                    step: current,
                });
            };

            let mut cx = StepContext::new(
                input,
                &mut instance.payload,
                &mut instance.counters,
                definition.retry_limits(),
            );
            let outcome = handler.execute(&mut cx);
            let bumps = cx.into_bumps();

            for (phase, attempt) in bumps {
                self.events.append(
                    instance.run_id,
                    WorkflowEventKind::RetryRecorded { phase, attempt },
                )?;
            }

            instance.last_step = Some(current.clone());
            instance.last_decision = outcome.decision.clone();
            if let Some(message) = outcome.message {
                instance.message = message;
            }

            self.events.append(
                instance.run_id,
                WorkflowEventKind::StepExecuted {
                    step: current.clone(),
                    decision: outcome.decision.clone(),
                },
            )?;

            if let Some(kind) = definition.terminal_kind(&current) {
                instance.status = match kind {
                    TerminalKind::Success => WorkflowStatus::Success,
                    TerminalKind::Failure => WorkflowStatus::Failure,
                };
                let checkpoint =
                    Checkpoint::terminal(instance.clone(), definition.definition_hash());
                self.checkpoints
                    .save(session, definition.key(), &checkpoint)?;
                self.events.append(
                    instance.run_id,
                    WorkflowEventKind::RunFinished {
                        status: instance.status,
                    },
                )?;
                log::info!(
                    "workflow={} session={} finished status={:?}",
                    definition.key(),
                    session,
                    instance.status
                );
                return Ok(TurnOutcome {
                    run_id: instance.run_id,
                    workflow: definition.key().clone(),
                    status: instance.status,
                    message: instance.message,
                    awaiting: None,
                    payload: instance.payload,
                });
            }

            let Some(next) = definition.next_step(&current, instance.last_decision.as_ref())
            else {
                return Err(EngineError::MissingTransition {
                    workflow: definition.key().clone(),
                    step: current,
                    decision: instance
                        .last_decision
                        .as_ref()
                        .map(|d| d.as_str().to_string())
                        .unwrap_or_else(|| "<none>".to_string()),
                });
            };
            let next = next.clone();

            if definition.pauses_after(&current) {
                let checkpoint = Checkpoint::paused(
                    instance.clone(),
                    PauseState {
                        after: current.clone(),
                        next: next.clone(),
                    },
                    definition.definition_hash(),
                );
                self.checkpoints
                    .save(session, definition.key(), &checkpoint)?;
                self.events
                    .append(instance.run_id, WorkflowEventKind::PausedForInput { next })?;
                return Ok(TurnOutcome {
                    run_id: instance.run_id,
                    workflow: definition.key().clone(),
                    status: WorkflowStatus::InProgress,
                    message: instance.message,
                    awaiting: Some(current),
                    payload: instance.payload,
                });
            }

            current = next;
        }
    }

    /// Descarta el checkpoint de (sesión, workflow), pausado o terminal.
    pub fn reset(&self, session: &SessionId, workflow: &WorkflowKey) -> Result<(), EngineError> {
        self.checkpoints.clear(session, workflow)?;
        Ok(())
    }

    pub fn load_checkpoint(
        &self,
        session: &SessionId,
        workflow: &WorkflowKey,
    ) -> Result<Option<Checkpoint>, EngineError> {
        Ok(self.checkpoints.load(session, workflow)?)
    }

    pub fn events_for(&self, run_id: Uuid) -> Result<Vec<WorkflowEvent>, EngineError> {
        Ok(self.events.list(run_id)?)
    }
}
