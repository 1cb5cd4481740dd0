//! kyc-core: motor genérico de workflows conversacionales interrumpibles.
//!
//! Un workflow de verificación documental es un grafo dirigido de steps con
//! etiquetas de decisión. El motor avanza exactamente un turno lógico por
//! invocación: ejecuta steps hasta alcanzar un step de pausa (espera input
//! del usuario) o un step terminal (SUCCESS/FAILURE), y persiste un
//! `Checkpoint` tras cada turno. Las cinco máquinas documentales se expresan
//! como datos (`WorkflowDefinition`) interpretados por un único
//! `WorkflowEngine`.

pub mod checkpoint;
pub mod constants;
pub mod definition;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod step;

pub use checkpoint::{Checkpoint, CheckpointStore, InMemoryCheckpointStore, PauseState};
pub use definition::{DefinitionError, Transition, WorkflowBuilder, WorkflowDefinition};
pub use engine::{TurnOutcome, WorkflowEngine};
pub use errors::{EngineError, StoreError};
pub use event::{event_variants, EventStore, InMemoryEventStore, WorkflowEvent, WorkflowEventKind};
pub use model::{Decision, SessionId, StepId, WorkflowInstance, WorkflowKey, WorkflowStatus};
pub use step::{RetryCounters, RetryLimits, StepContext, StepHandler, StepOutcome, TerminalKind};
