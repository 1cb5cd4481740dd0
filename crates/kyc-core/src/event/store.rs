//! Almacenamiento append-only de eventos por run.

use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use super::types::{WorkflowEvent, WorkflowEventKind};
use crate::errors::StoreError;

pub trait EventStore: Send + Sync {
    /// Sella y agrega un evento al run. El store asigna `seq` y timestamp.
    fn append(&self, run_id: Uuid, kind: WorkflowEventKind) -> Result<WorkflowEvent, StoreError>;

    /// Eventos del run en orden de inserción.
    fn list(&self, run_id: Uuid) -> Result<Vec<WorkflowEvent>, StoreError>;
}

/// Implementación en memoria para CLI y tests.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: DashMap<Uuid, Vec<WorkflowEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, run_id: Uuid, kind: WorkflowEventKind) -> Result<WorkflowEvent, StoreError> {
        let mut entry = self.inner.entry(run_id).or_default();
        let event = WorkflowEvent {
            seq: entry.len() as u64,
            run_id,
            kind,
            ts: Utc::now(),
        };
        entry.push(event.clone());
        Ok(event)
    }

    fn list(&self, run_id: Uuid) -> Result<Vec<WorkflowEvent>, StoreError> {
        Ok(self
            .inner
            .get(&run_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
