//! Persistencia de checkpoints.
//!
//! El trait es el seam de inyección: el binario elige memoria o Postgres y
//! el motor no distingue. Las claves son (sesión, workflow): una sesión
//! mantiene a lo sumo un checkpoint por tipo de documento.

use dashmap::DashMap;

use super::types::Checkpoint;
use crate::errors::StoreError;
use crate::model::{SessionId, WorkflowKey};

pub trait CheckpointStore: Send + Sync {
    fn load(
        &self,
        session: &SessionId,
        workflow: &WorkflowKey,
    ) -> Result<Option<Checkpoint>, StoreError>;

    /// Sobrescribe el checkpoint de (sesión, workflow).
    fn save(
        &self,
        session: &SessionId,
        workflow: &WorkflowKey,
        checkpoint: &Checkpoint,
    ) -> Result<(), StoreError>;

    /// Borra el checkpoint si existe. Borrar uno inexistente no es error.
    fn clear(&self, session: &SessionId, workflow: &WorkflowKey) -> Result<(), StoreError>;
}

/// Implementación en memoria para CLI y tests.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    inner: DashMap<(SessionId, WorkflowKey), Checkpoint>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl CheckpointStore for InMemoryCheckpointStore {
    fn load(
        &self,
        session: &SessionId,
        workflow: &WorkflowKey,
    ) -> Result<Option<Checkpoint>, StoreError> {
        Ok(self
            .inner
            .get(&(session.clone(), workflow.clone()))
            .map(|entry| entry.value().clone()))
    }

    fn save(
        &self,
        session: &SessionId,
        workflow: &WorkflowKey,
        checkpoint: &Checkpoint,
    ) -> Result<(), StoreError> {
        self.inner
            .insert((session.clone(), workflow.clone()), checkpoint.clone());
        Ok(())
    }

    fn clear(&self, session: &SessionId, workflow: &WorkflowKey) -> Result<(), StoreError> {
        self.inner.remove(&(session.clone(), workflow.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::PauseState;
    use crate::model::{StepId, WorkflowInstance};

    #[test]
    fn save_load_clear_roundtrip() {
        let store = InMemoryCheckpointStore::new();
        let session = SessionId::generate("cli");
        let workflow = WorkflowKey::new("aadhaar");
        let instance = WorkflowInstance::new(workflow.clone());
        let cp = Checkpoint::paused(
            instance,
            PauseState {
                after: StepId::new("prompt_number"),
                next: StepId::new("check_number_format"),
            },
            "abc",
        );

        assert!(store.load(&session, &workflow).unwrap().is_none());
        store.save(&session, &workflow, &cp).unwrap();
        let loaded = store.load(&session, &workflow).unwrap().unwrap();
        assert!(loaded.is_paused());
        assert_eq!(loaded.pause.unwrap().next.as_str(), "check_number_format");

        store.clear(&session, &workflow).unwrap();
        assert!(store.load(&session, &workflow).unwrap().is_none());
        // clear de algo ausente no falla
        store.clear(&session, &workflow).unwrap();
    }
}
