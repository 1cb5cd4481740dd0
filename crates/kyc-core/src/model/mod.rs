//! Tipos de identidad y estado de instancia.

pub mod ids;
pub mod instance;

pub use ids::{Decision, SessionId, SessionIdError, StepId, WorkflowKey};
pub use instance::{WorkflowInstance, WorkflowStatus};
