//! Orquestación por sesión: intención, despacho y bookkeeping de completitud.
//!
//! El router toma una decisión por turno a partir de la intención
//! clasificada, el workflow activo de la sesión y el conjunto de documentos
//! completados. El despacho concreto (motor + definiciones) vive en el
//! dispatcher; la conversación fuera de flujo, en el answerer.

pub mod answer;
pub mod completion;
pub mod dispatcher;
pub mod errors;
pub mod intent;
pub mod router;
pub mod session;

pub use answer::{QuestionAnswerer, ScriptedAnswerer};
pub use completion::{completion_message, is_fully_verified, suggest_next};
pub use dispatcher::Dispatcher;
pub use errors::OrchestratorError;
pub use intent::{IntentClassifier, IntentContext, IntentDecision, KeywordClassifier, UserIntent};
pub use router::Router;
pub use session::{SessionState, SessionStore};
