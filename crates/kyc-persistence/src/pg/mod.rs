//! Implementaciones Postgres (Diesel) de los stores del core.
//!
//! - `PgCheckpointStore`: upsert por (sesión, workflow); el checkpoint
//!   completo se guarda como JSONB y las columnas planas (status, hash)
//!   quedan para consultas operativas.
//! - `PgEventStore`: append-only con orden total por `seq` (BIGSERIAL), sin
//!   updates ni deletes; lectura por `run_id` ordenada por `seq`.
//! - Errores transitorios: reintento con backoff pequeño en toda operación.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use kyc_core::{
    Checkpoint, CheckpointStore, EventStore, SessionId, StoreError, WorkflowEvent,
    WorkflowEventKind, WorkflowKey, WorkflowStatus,
};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{workflow_checkpoints, workflow_events};

/// Pool r2d2 de conexiones Postgres. Al construirlo se corren las
/// migraciones pendientes una sola vez.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones: permite inyectar un pool real o un
/// doble de pruebas sin acoplar los stores a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(
        &self,
    ) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

/// `ConnectionProvider` respaldado por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(
        &self,
    ) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = workflow_checkpoints)]
struct NewCheckpointRow<'a> {
    session_id: &'a str,
    workflow_key: &'a str,
    run_id: &'a Uuid,
    status: &'a str,
    definition_hash: &'a str,
    state: &'a Value,
    updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = workflow_events)]
struct NewEventRow<'a> {
    run_id: &'a Uuid,
    event_type: &'a str,
    payload: &'a Value,
}

/// Errores que conviene reintentar con backoff.
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
                || m.contains("could not serialize access due to concurrent update")
                || m.contains("connection closed")
                || m.contains("connection refused")
                || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry con backoff pequeño (15ms, 30ms, 45ms; hasta 3 reintentos).
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
where
    F: FnMut() -> Result<T, PersistenceError>,
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!(
                    "retryable error (attempt {}): {:?} -> sleeping {}ms",
                    attempts + 1,
                    e,
                    delay_ms
                );
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

fn status_label(status: WorkflowStatus) -> &'static str {
    match status {
        WorkflowStatus::InProgress => "inprogress",
        WorkflowStatus::Success => "success",
        WorkflowStatus::Failure => "failure",
    }
}

/// Variante en minúsculas, estable en el tiempo, para la columna
/// `event_type` (el enum completo viaja en `payload`).
fn event_type_for(kind: &WorkflowEventKind) -> &'static str {
    match kind {
        WorkflowEventKind::RunStarted { .. } => "runstarted",
        WorkflowEventKind::Resumed { .. } => "resumed",
        WorkflowEventKind::StepExecuted { .. } => "stepexecuted",
        WorkflowEventKind::RetryRecorded { .. } => "retryrecorded",
        WorkflowEventKind::PausedForInput { .. } => "pausedforinput",
        WorkflowEventKind::RunFinished { .. } => "runfinished",
    }
}

/// Implementación Postgres de `CheckpointStore`.
pub struct PgCheckpointStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgCheckpointStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> CheckpointStore for PgCheckpointStore<P> {
    fn load(
        &self,
        session: &SessionId,
        workflow: &WorkflowKey,
    ) -> Result<Option<Checkpoint>, StoreError> {
        debug!("checkpoint load session={session} workflow={workflow}");
        let state: Option<Value> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            workflow_checkpoints::table
                .filter(workflow_checkpoints::session_id.eq(session.as_str()))
                .filter(workflow_checkpoints::workflow_key.eq(workflow.as_str()))
                .select(workflow_checkpoints::state)
                .first(&mut conn)
                .optional()
                .map_err(PersistenceError::from)
        })?;
        match state {
            None => Ok(None),
            Some(state) => {
                let checkpoint: Checkpoint = serde_json::from_value(state)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(checkpoint))
            }
        }
    }

    fn save(
        &self,
        session: &SessionId,
        workflow: &WorkflowKey,
        checkpoint: &Checkpoint,
    ) -> Result<(), StoreError> {
        debug!(
            "checkpoint save session={session} workflow={workflow} status={:?}",
            checkpoint.instance.status
        );
        let state = serde_json::to_value(checkpoint)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let row = NewCheckpointRow {
            session_id: session.as_str(),
            workflow_key: workflow.as_str(),
            run_id: &checkpoint.instance.run_id,
            status: status_label(checkpoint.instance.status),
            definition_hash: &checkpoint.definition_hash,
            state: &state,
            updated_at: checkpoint.updated_at,
        };
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(workflow_checkpoints::table)
                .values(&row)
                .on_conflict((
                    workflow_checkpoints::session_id,
                    workflow_checkpoints::workflow_key,
                ))
                .do_update()
                .set((
                    workflow_checkpoints::run_id.eq(row.run_id),
                    workflow_checkpoints::status.eq(row.status),
                    workflow_checkpoints::definition_hash.eq(row.definition_hash),
                    workflow_checkpoints::state.eq(row.state),
                    workflow_checkpoints::updated_at.eq(row.updated_at),
                ))
                .execute(&mut conn)
                .map_err(PersistenceError::from)
        })?;
        Ok(())
    }

    fn clear(&self, session: &SessionId, workflow: &WorkflowKey) -> Result<(), StoreError> {
        debug!("checkpoint clear session={session} workflow={workflow}");
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::delete(
                workflow_checkpoints::table
                    .filter(workflow_checkpoints::session_id.eq(session.as_str()))
                    .filter(workflow_checkpoints::workflow_key.eq(workflow.as_str())),
            )
            .execute(&mut conn)
            .map_err(PersistenceError::from)
        })?;
        Ok(())
    }
}

/// Implementación Postgres de `EventStore` (append-only).
pub struct PgEventStore<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgEventStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: ConnectionProvider> EventStore for PgEventStore<P> {
    fn append(&self, run_id: Uuid, kind: WorkflowEventKind) -> Result<WorkflowEvent, StoreError> {
        let event_type = event_type_for(&kind);
        let payload =
            serde_json::to_value(&kind).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let (seq, ts): (i64, DateTime<Utc>) = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(workflow_events::table)
                .values(NewEventRow {
                    run_id: &run_id,
                    event_type,
                    payload: &payload,
                })
                .returning((workflow_events::seq, workflow_events::ts))
                .get_result(&mut conn)
                .map_err(PersistenceError::from)
        })?;
        debug!("event append run={run_id} seq={seq} type={event_type}");
        Ok(WorkflowEvent {
            seq: seq as u64,
            run_id,
            kind,
            ts,
        })
    }

    fn list(&self, run_id: Uuid) -> Result<Vec<WorkflowEvent>, StoreError> {
        let rows: Vec<(i64, DateTime<Utc>, Value)> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            workflow_events::table
                .filter(workflow_events::run_id.eq(run_id))
                .order(workflow_events::seq.asc())
                .select((
                    workflow_events::seq,
                    workflow_events::ts,
                    workflow_events::payload,
                ))
                .load(&mut conn)
                .map_err(PersistenceError::from)
        })?;
        let mut events = Vec::with_capacity(rows.len());
        for (seq, ts, payload) in rows {
            let kind: WorkflowEventKind = serde_json::from_value(payload)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            events.push(WorkflowEvent {
                seq: seq as u64,
                run_id,
                kind,
                ts,
            });
        }
        Ok(events)
    }
}

/// Construye un pool Postgres r2d2 y corre las migraciones pendientes.
pub fn build_pool(
    database_url: &str,
    min_size: u32,
    max_size: u32,
) -> Result<PgPool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .min_idle(Some(final_min))
        .max_size(validated_max)
        .build(manager)
        .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración y construye un
/// pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env();
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
