//! Fases de reintento y sus límites por defecto.
//!
//! Semántica del límite N: los fallos 1..N-1 reintentan, el N-ésimo termina
//! el run. Formato y confirmaciones cortan a 2; código OTP y lookups, que
//! pueden fallar por causas ajenas al usuario, toleran 3.

pub const NUMBER_FORMAT: &str = "number_format";
pub const OTP_FORMAT: &str = "otp_format";
pub const OTP_CODE: &str = "otp_code";
pub const LOOKUP: &str = "lookup";
pub const CONFIRMATION: &str = "confirmation";
pub const NAME_FORMAT: &str = "name_format";
pub const DOB_FORMAT: &str = "dob_format";
pub const INCOME_FORMAT: &str = "income_format";
pub const EXTRACTION: &str = "extraction";
pub const ACKNOWLEDGE: &str = "acknowledge";
pub const PROBE_FORMAT: &str = "probe_format";
pub const ANALYSIS: &str = "analysis";

pub const FORMAT_LIMIT: u32 = 2;
pub const CODE_LIMIT: u32 = 3;
pub const LOOKUP_LIMIT: u32 = 3;
pub const CONFIRMATION_LIMIT: u32 = 2;
