//! Estado conversacional por sesión.
//!
//! Separado del estado de los workflows: aquí vive qué documento está
//! activo y cuáles ya se completaron; los checkpoints de cada workflow los
//! guarda el motor. Un reset descarta el workflow activo pero conserva lo
//! completado.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use indexmap::IndexSet;
use kyc_core::{SessionId, WorkflowKey};

/// Un único workflow puede estar activo por sesión.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub active: Option<WorkflowKey>,
    pub completed: IndexSet<WorkflowKey>,
}

impl SessionState {
    /// Agrega al conjunto de completados. Idempotente: marcar dos veces el
    /// mismo documento no duplica la entrada.
    pub fn mark_completed(&mut self, workflow: WorkflowKey) {
        self.completed.insert(workflow);
    }

    pub fn is_completed(&self, workflow: &WorkflowKey) -> bool {
        self.completed.contains(workflow)
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }
}

/// Estados de sesión en memoria, con acceso concurrente por clave.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: DashMap<SessionId, SessionState>,
    turn_locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, session: &SessionId) -> SessionState {
        self.inner
            .get(session)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Aplica `f` sobre el estado de la sesión, creándolo si no existe.
    pub fn update<R>(&self, session: &SessionId, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut entry = self.inner.entry(session.clone()).or_default();
        f(entry.value_mut())
    }

    /// Candado de turno de la sesión. El router lo sostiene durante el ciclo
    /// completo leer-avanzar-guardar: dos turnos concurrentes sobre la misma
    /// sesión se ejecutan uno después del otro.
    pub fn turn_lock(&self, session: &SessionId) -> Arc<Mutex<()>> {
        Arc::clone(&self.turn_locks.entry(session.clone()).or_default())
    }
}
