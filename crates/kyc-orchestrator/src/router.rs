//! El router: una decisión por turno.
//!
//! Orden de resolución: intención clasificada, workflow activo, conjunto de
//! completados. Las preguntas fuera de flujo se responden sin tocar el
//! estado de los workflows y terminan con la guía del prompt pendiente.
//! Un candado por sesión serializa el ciclo leer-avanzar-guardar: dos
//! turnos simultáneos sobre la misma sesión nunca se entrelazan.

use std::sync::{Arc, PoisonError};

use kyc_core::{CheckpointStore, EventStore, SessionId, WorkflowKey, WorkflowStatus};

use crate::answer::QuestionAnswerer;
use crate::completion::{completion_message, is_fully_verified, suggest_next};
use crate::dispatcher::Dispatcher;
use crate::errors::OrchestratorError;
use crate::intent::{IntentClassifier, IntentContext, IntentDecision, UserIntent};
use crate::session::{SessionState, SessionStore};

pub struct Router<C: CheckpointStore, E: EventStore> {
    dispatcher: Dispatcher<C, E>,
    classifier: Arc<dyn IntentClassifier>,
    answerer: Arc<dyn QuestionAnswerer>,
    sessions: SessionStore,
}

impl<C: CheckpointStore, E: EventStore> Router<C, E> {
    pub fn new(
        dispatcher: Dispatcher<C, E>,
        classifier: Arc<dyn IntentClassifier>,
        answerer: Arc<dyn QuestionAnswerer>,
    ) -> Self {
        Self {
            dispatcher,
            classifier,
            answerer,
            sessions: SessionStore::new(),
        }
    }

    /// Procesa un turno completo y devuelve el mensaje saliente.
    pub fn handle_turn(
        &self,
        session: &SessionId,
        message: &str,
    ) -> Result<String, OrchestratorError> {
        let lock = self.sessions.turn_lock(session);
        let _turn = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let state = self.sessions.snapshot(session);
        let context = IntentContext {
            active_workflow: state.active.clone(),
            awaiting_input: state.active.is_some(),
        };
        let IntentDecision {
            intent,
            provides_data,
        } = match self.classifier.classify(&context, message) {
            Ok(decision) => decision,
            Err(err) => {
                // el clasificador nunca tumba el turno
                log::warn!("intent classification failed: {err}");
                IntentDecision {
                    intent: UserIntent::Unknown,
                    provides_data: false,
                }
            }
        };
        log::debug!("session={session} intent={intent:?} provides_data={provides_data}");

        match intent {
            UserIntent::Start(key) => self.handle_start(session, &state, key),
            UserIntent::Continue | UserIntent::ConfirmYes | UserIntent::ConfirmNo => {
                match &state.active {
                    Some(active) => self.delegate(session, active.clone(), message),
                    None => self.fallback(session, &state),
                }
            }
            UserIntent::Question => self.handle_question(session, &state, message),
            UserIntent::Acknowledge => {
                if is_fully_verified(&state.completed) {
                    Ok(completion_message().to_string())
                } else {
                    self.fallback(session, &state)
                }
            }
            // intención dudosa pero con datos concretos y un prompt
            // pendiente: se tratan como respuesta al workflow activo
            UserIntent::Unknown => match (&state.active, provides_data) {
                (Some(active), true) => self.delegate(session, active.clone(), message),
                _ => self.fallback(session, &state),
            },
        }
    }

    /// Snapshot del estado conversacional de la sesión.
    pub fn session_state(&self, session: &SessionId) -> SessionState {
        self.sessions.snapshot(session)
    }

    /// Cancela el workflow activo: borra su checkpoint y lo desactiva. El
    /// conjunto de completados no se toca.
    pub fn reset(&self, session: &SessionId) -> Result<(), OrchestratorError> {
        let lock = self.sessions.turn_lock(session);
        let _turn = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let state = self.sessions.snapshot(session);
        if let Some(active) = &state.active {
            self.dispatcher.reset(session, active)?;
        }
        self.sessions.update(session, SessionState::clear_active);
        Ok(())
    }

    fn handle_start(
        &self,
        session: &SessionId,
        state: &SessionState,
        key: WorkflowKey,
    ) -> Result<String, OrchestratorError> {
        if !self.dispatcher.has_workflow(&key) {
            return Ok(format!(
                "I cannot verify '{key}' here. {}",
                self.next_step_line(state)
            ));
        }
        if state.is_completed(&key) {
            return Ok(format!(
                "You have already completed {key} verification. {}",
                self.next_step_line(state)
            ));
        }
        if let Some(active) = &state.active {
            if active != &key {
                // un solo workflow activo por sesión
                let guidance = self.guidance_line(session, state)?;
                return Ok(format!(
                    "Please finish your {active} verification first. {guidance}"
                ));
            }
            // pedir de nuevo el activo repite el prompt pendiente
            return self.guidance_line(session, state);
        }
        self.delegate(session, key, "")
    }

    fn handle_question(
        &self,
        session: &SessionId,
        state: &SessionState,
        message: &str,
    ) -> Result<String, OrchestratorError> {
        let answer = match self.answerer.answer(message) {
            Ok(answer) => answer,
            Err(err) => {
                log::warn!("question answering failed: {err}");
                "Sorry, I could not answer that right now.".to_string()
            }
        };
        if state.active.is_some() {
            // el estado del workflow queda intacto; solo se agrega la guía
            let guidance = self.guidance_line(session, state)?;
            Ok(format!("{answer}\n{guidance}"))
        } else {
            Ok(format!("{answer}\n{}", self.next_step_line(state)))
        }
    }

    /// Delegación al dispatcher más el bookkeeping posterior: alta
    /// idempotente en completados y desactivación en cualquier terminal.
    fn delegate(
        &self,
        session: &SessionId,
        key: WorkflowKey,
        input: &str,
    ) -> Result<String, OrchestratorError> {
        let outcome = self.dispatcher.dispatch(session, &key, input)?;
        let mut message = outcome.message;
        match outcome.status {
            WorkflowStatus::InProgress => {
                self.sessions
                    .update(session, |s| s.active = Some(key.clone()));
            }
            WorkflowStatus::Success => {
                let completed = self.sessions.update(session, |s| {
                    s.clear_active();
                    s.mark_completed(key.clone());
                    s.completed.clone()
                });
                if is_fully_verified(&completed) {
                    message.push('\n');
                    message.push_str(completion_message());
                } else if let Some(next) = suggest_next(&completed) {
                    message.push_str(&format!(
                        "\nYou can proceed with {next} verification next."
                    ));
                }
            }
            WorkflowStatus::Failure => {
                self.sessions.update(session, SessionState::clear_active);
            }
        }
        Ok(message)
    }

    /// Guía del prompt pendiente del workflow activo.
    fn guidance_line(
        &self,
        session: &SessionId,
        state: &SessionState,
    ) -> Result<String, OrchestratorError> {
        let Some(active) = &state.active else {
            return Ok(self.next_step_line(state));
        };
        Ok(self
            .dispatcher
            .guidance(session, active)?
            .unwrap_or_else(|| format!("Please continue with your {active} verification.")))
    }

    fn next_step_line(&self, state: &SessionState) -> String {
        match suggest_next(&state.completed) {
            Some(next) => format!("Would you like to verify your {next}?"),
            None => completion_message().to_string(),
        }
    }

    fn fallback(
        &self,
        session: &SessionId,
        state: &SessionState,
    ) -> Result<String, OrchestratorError> {
        if state.active.is_some() {
            self.guidance_line(session, state)
        } else {
            Ok(format!(
                "I did not catch that. {}",
                self.next_step_line(state)
            ))
        }
    }
}
