//! Despacho a los workflows especialistas.
//!
//! Tabla de lookup clave de documento -> definición, más el sembrado de
//! datos entre flujos: un PAN que arranca en una sesión con Aadhaar
//! verificado hereda nombre y fecha de nacimiento y se salta la captura
//! manual.

use kyc_core::{
    CheckpointStore, EventStore, SessionId, TurnOutcome, WorkflowEngine, WorkflowKey,
    WorkflowStatus,
};
use kyc_domain::AadhaarDetails;
use kyc_workflows::{keys, WorkflowRegistry};
use serde_json::{Map, Value};

use crate::errors::OrchestratorError;

pub struct Dispatcher<C: CheckpointStore, E: EventStore> {
    engine: WorkflowEngine<C, E>,
    registry: WorkflowRegistry,
}

impl<C: CheckpointStore, E: EventStore> Dispatcher<C, E> {
    pub fn new(engine: WorkflowEngine<C, E>, registry: WorkflowRegistry) -> Self {
        Self { engine, registry }
    }

    pub fn has_workflow(&self, key: &WorkflowKey) -> bool {
        self.registry.contains_key(key)
    }

    /// Un turno del workflow `key` con el input crudo del usuario.
    pub fn dispatch(
        &self,
        session: &SessionId,
        key: &WorkflowKey,
        input: &str,
    ) -> Result<TurnOutcome, OrchestratorError> {
        let definition = self
            .registry
            .get(key)
            .ok_or_else(|| OrchestratorError::UnknownWorkflow(key.as_str().to_string()))?;
        let seed = self.seed_for(session, key)?;
        let outcome = self.engine.advance_seeded(definition, session, input, seed)?;
        log::debug!(
            "dispatched workflow={key} session={session} status={:?} awaiting={:?}",
            outcome.status,
            outcome.awaiting
        );
        Ok(outcome)
    }

    /// Datos verificados en otro workflow que precargan un arranque nuevo.
    /// Solo PAN hereda, desde un Aadhaar terminado en SUCCESS en la misma
    /// sesión. Un run pausado ignora el seed en el motor.
    fn seed_for(
        &self,
        session: &SessionId,
        key: &WorkflowKey,
    ) -> Result<Option<Map<String, Value>>, OrchestratorError> {
        if key.as_str() != "pan" {
            return Ok(None);
        }
        let Some(checkpoint) = self
            .engine
            .load_checkpoint(session, &WorkflowKey::new("aadhaar"))?
        else {
            return Ok(None);
        };
        if checkpoint.instance.status != WorkflowStatus::Success {
            return Ok(None);
        }
        // un payload que no forma los detalles completos no siembra nada
        let Ok(details) = serde_json::from_value::<AadhaarDetails>(Value::Object(
            checkpoint.instance.payload.clone(),
        )) else {
            return Ok(None);
        };
        let mut seed = Map::new();
        // la referencia completa habilita el cotejo PAN vs Aadhaar del lookup
        if let Ok(reference) = serde_json::to_value(&details) {
            seed.insert(keys::AADHAAR_REFERENCE.to_string(), reference);
        }
        seed.insert(
            keys::HOLDER_NAME.to_string(),
            Value::String(details.holder_name),
        );
        seed.insert(keys::DOB.to_string(), Value::String(details.dob));
        Ok(Some(seed))
    }

    /// Texto de guía del prompt pendiente del workflow, si está pausado.
    pub fn guidance(
        &self,
        session: &SessionId,
        key: &WorkflowKey,
    ) -> Result<Option<String>, OrchestratorError> {
        let Some(definition) = self.registry.get(key) else {
            return Ok(None);
        };
        let Some(checkpoint) = self.engine.load_checkpoint(session, key)? else {
            return Ok(None);
        };
        Ok(checkpoint
            .pause
            .as_ref()
            .and_then(|pause| definition.follow_up(&pause.after))
            .map(str::to_string))
    }

    /// Descarta el run (pausado o terminal) del workflow en la sesión.
    pub fn reset(&self, session: &SessionId, key: &WorkflowKey) -> Result<(), OrchestratorError> {
        self.engine.reset(session, key)?;
        Ok(())
    }
}
