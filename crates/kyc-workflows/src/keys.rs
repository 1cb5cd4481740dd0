//! Claves compartidas del payload.
//!
//! Los workflows escriben y leen estas claves; el orquestador las usa para
//! sembrar flujos dependientes (PAN precargado desde Aadhaar) y para armar
//! resúmenes. Cambiarlas rompe checkpoints en vuelo.

pub const AADHAAR_NUMBER: &str = "aadhaar_number";
pub const PAN_NUMBER: &str = "pan_number";
pub const HOLDER_NAME: &str = "holder_name";
pub const DOB: &str = "dob";
pub const ADDRESS: &str = "address";
/// Detalles completos del Aadhaar verificado en la sesión, sembrados en un
/// run PAN nuevo para el cotejo cruzado posterior al lookup.
pub const AADHAAR_REFERENCE: &str = "aadhaar_reference";
pub const AGRICULTURAL_INCOME: &str = "agricultural_income";
pub const OTHER_INCOME: &str = "other_income";
pub const HAS_BANK_ACCOUNT: &str = "has_bank_account";
pub const FILED_ITR: &str = "filed_itr";
pub const OCCUPATION: &str = "occupation";
