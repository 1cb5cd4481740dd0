//! Definiciones de los workflows documentales.
//!
//! Cada módulo arma la `WorkflowDefinition` de un tipo de documento (más el
//! sondeo de elegibilidad PAN) como una tabla declarativa: steps, aristas
//! etiquetadas, pausas y límites de reintento. Ningún workflow interpreta su
//! propio grafo; de eso se encarga el `WorkflowEngine` de kyc-core.

pub mod aadhaar;
pub mod form60;
pub mod image_doc;
pub mod keys;
pub mod pan;
pub mod pan_check;
pub mod phases;
pub mod registry;

pub use registry::{build_registry, Collaborators, WorkflowRegistry};

use kyc_core::{StepContext, StepHandler, StepOutcome};

/// Step que solo emite un mensaje fijo. Lo usan los terminales de todos los
/// workflows.
pub(crate) struct Say(pub &'static str);

impl StepHandler for Say {
    fn execute(&self, _cx: &mut StepContext<'_>) -> StepOutcome {
        StepOutcome::message(self.0)
    }
}
