//! Bookkeeping de completitud entre documentos.
//!
//! Los documentos se agrupan por requisito: identidad {aadhaar, dl,
//! passport} y fiscal {form60, pan}. Completar cualquier miembro satisface
//! el grupo; ningún workflow marca hermanos como completados, el grupo se
//! evalúa al leer. La sugerencia del siguiente documento es determinista:
//! orden lexicográfico sobre los pendientes.

use indexmap::IndexSet;
use kyc_core::WorkflowKey;

/// Grupos de requisito: basta un documento por grupo.
const REQUIREMENT_GROUPS: [&[&str]; 2] = [&["aadhaar", "dl", "passport"], &["form60", "pan"]];

fn group_satisfied(group: &[&str], completed: &IndexSet<WorkflowKey>) -> bool {
    group
        .iter()
        .any(|key| completed.contains(&WorkflowKey::new(*key)))
}

/// KYC completo: todos los grupos satisfechos.
pub fn is_fully_verified(completed: &IndexSet<WorkflowKey>) -> bool {
    REQUIREMENT_GROUPS
        .iter()
        .all(|group| group_satisfied(group, completed))
}

/// Primer documento pendiente en orden lexicográfico, tomado de los grupos
/// aún no satisfechos. `None` cuando el KYC está completo.
pub fn suggest_next(completed: &IndexSet<WorkflowKey>) -> Option<WorkflowKey> {
    let mut outstanding: Vec<&str> = REQUIREMENT_GROUPS
        .iter()
        .filter(|group| !group_satisfied(group, completed))
        .flat_map(|group| group.iter().copied())
        .collect();
    outstanding.sort_unstable();
    outstanding.first().map(|key| WorkflowKey::new(*key))
}

pub fn completion_message() -> &'static str {
    "All required documents are verified. Your KYC is complete, thank you!"
}
