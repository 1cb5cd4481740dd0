//! Registro de definiciones: una por tipo de documento.

use std::sync::Arc;

use indexmap::IndexMap;
use kyc_core::{DefinitionError, WorkflowDefinition, WorkflowKey};
use kyc_domain::{
    AadhaarDirectory, CardExtractor, CardKind, FixtureCardExtractor, InMemoryAadhaarDirectory,
    InMemoryPanDirectory, OtpVerifier, PanDirectory, PanEligibilityAnalyzer,
    RuleBasedEligibilityAnalyzer, StaticOtpVerifier,
};

use crate::{aadhaar, form60, image_doc, pan, pan_check};

pub type WorkflowRegistry = IndexMap<WorkflowKey, WorkflowDefinition>;

/// Colaboradores inyectados en los handlers. Cada binario decide las
/// implementaciones; `Default` arma el juego en memoria.
#[derive(Clone)]
pub struct Collaborators {
    pub aadhaar_directory: Arc<dyn AadhaarDirectory>,
    pub pan_directory: Arc<dyn PanDirectory>,
    pub otp: Arc<dyn OtpVerifier>,
    pub extractor: Arc<dyn CardExtractor>,
    pub eligibility: Arc<dyn PanEligibilityAnalyzer>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            aadhaar_directory: Arc::new(InMemoryAadhaarDirectory::new()),
            pan_directory: Arc::new(InMemoryPanDirectory::new()),
            otp: Arc::new(StaticOtpVerifier::default()),
            extractor: Arc::new(FixtureCardExtractor::new()),
            eligibility: Arc::new(RuleBasedEligibilityAnalyzer::new()),
        }
    }
}

/// Construye las seis definiciones. Falla si algún grafo está mal formado,
/// lo que es un error de programación y se detecta al arrancar.
pub fn build_registry(collab: &Collaborators) -> Result<WorkflowRegistry, DefinitionError> {
    let definitions = [
        aadhaar::definition(
            Arc::clone(&collab.aadhaar_directory),
            Arc::clone(&collab.otp),
        )?,
        pan::definition(Arc::clone(&collab.pan_directory))?,
        pan_check::definition(Arc::clone(&collab.eligibility))?,
        form60::definition()?,
        image_doc::definition(CardKind::Passport, Arc::clone(&collab.extractor))?,
        image_doc::definition(CardKind::DrivingLicence, Arc::clone(&collab.extractor))?,
    ];

    let mut registry = IndexMap::new();
    for definition in definitions {
        registry.insert(definition.key().clone(), definition);
    }
    Ok(registry)
}
