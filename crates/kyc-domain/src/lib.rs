//! kyc-domain: tipos de documento, validadores de formato y colaboradores
//! de verificación (directorios, OTP, extracción de imagen) con
//! implementaciones deterministas en memoria para CLI y tests.

pub mod details;
pub mod directory;
pub mod eligibility;
pub mod error;
pub mod extractor;
pub mod otp;
pub mod validators;

pub use details::{AadhaarDetails, CardDetails, Form60Details, PanDetails};
pub use directory::{
    AadhaarDirectory, HolderRecord, InMemoryAadhaarDirectory, InMemoryPanDirectory, LookupOutcome,
    PanDirectory,
};
pub use eligibility::{PanEligibilityAnalyzer, ProbeAnswers, RuleBasedEligibilityAnalyzer};
pub use error::DomainError;
pub use extractor::{CardExtractor, CardKind, FixtureCardExtractor};
pub use otp::{OtpVerifier, StaticOtpVerifier};
