use std::sync::Arc;

use kyc_core::{
    InMemoryCheckpointStore, InMemoryEventStore, WorkflowEngine, WorkflowKey, WorkflowStatus,
};
use kyc_workflows::{build_registry, Collaborators, WorkflowRegistry};
use serde_json::Value;

fn setup() -> (
    WorkflowRegistry,
    WorkflowEngine<InMemoryCheckpointStore, InMemoryEventStore>,
) {
    let registry = build_registry(&Collaborators::default()).unwrap();
    let engine = WorkflowEngine::new(
        Arc::new(InMemoryCheckpointStore::new()),
        Arc::new(InMemoryEventStore::new()),
    );
    (registry, engine)
}

#[test]
fn aadhaar_happy_path_ends_in_success() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("aadhaar")];
    let session = kyc_core::SessionId::generate("test");

    let turn = engine.advance(def, &session, "").unwrap();
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_number");

    let turn = engine.advance(def, &session, "1234 5678 9012").unwrap();
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_otp");
    assert!(turn.message.contains("6 digit OTP"));

    let turn = engine.advance(def, &session, "123456").unwrap();
    assert_eq!(
        turn.awaiting.as_ref().unwrap().as_str(),
        "prompt_confirmation"
    );
    // el resumen enmascara el número
    assert!(turn.message.contains("XXXX XXXX 9012"));
    assert!(!turn.message.contains("123456789012"));
    assert!(turn.message.contains("Ananya Sharma"));

    let turn = engine.advance(def, &session, "yes").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Success);
    assert!(turn.message.contains("verified successfully"));
    assert_eq!(
        turn.payload.get("holder_name"),
        Some(&Value::from("Ananya Sharma"))
    );
}

#[test]
fn aadhaar_second_bad_number_terminates() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("aadhaar")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();

    let turn = engine.advance(def, &session, "12AB").unwrap();
    assert_eq!(turn.status, WorkflowStatus::InProgress);
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_number");
    assert!(turn.message.contains("does not look like a valid Aadhaar"));

    let turn = engine.advance(def, &session, "still wrong").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
    assert!(turn.message.contains("Too many failed attempts"));
}

#[test]
fn aadhaar_third_wrong_otp_terminates_without_lookup() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("aadhaar")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();
    engine.advance(def, &session, "123456789012").unwrap();

    let turn = engine.advance(def, &session, "111111").unwrap();
    assert_eq!(turn.status, WorkflowStatus::InProgress);
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_otp");

    let turn = engine.advance(def, &session, "222222").unwrap();
    assert_eq!(turn.status, WorkflowStatus::InProgress);

    let turn = engine.advance(def, &session, "333333").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
    // nunca se llegó al directorio: no hay datos del titular
    assert!(turn.payload.get("holder_name").is_none());
}

#[test]
fn aadhaar_unknown_number_is_rejected() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("aadhaar")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();
    engine.advance(def, &session, "000011112222").unwrap();
    let turn = engine.advance(def, &session, "123456").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
    assert!(turn.message.contains("could not verify this Aadhaar number"));
}

#[test]
fn pan_prefilled_path_skips_manual_capture() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan")];
    let session = kyc_core::SessionId::generate("test");

    let mut seed = serde_json::Map::new();
    seed.insert("holder_name".to_string(), Value::from("Ananya Sharma"));
    seed.insert("dob".to_string(), Value::from("01/01/1990"));

    let turn = engine.advance_seeded(def, &session, "", Some(seed)).unwrap();
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_pan");

    let turn = engine.advance(def, &session, "abcde1234f").unwrap();
    assert_eq!(
        turn.awaiting.as_ref().unwrap().as_str(),
        "prompt_confirmation"
    );
    assert!(turn.message.contains("ABCDE1234F"));

    let turn = engine.advance(def, &session, "yes").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Success);
}

#[test]
fn pan_manual_path_collects_name_and_dob() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan")];
    let session = kyc_core::SessionId::generate("test");

    let turn = engine.advance(def, &session, "").unwrap();
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_name");

    let turn = engine.advance(def, &session, "Rohan Gupta").unwrap();
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_dob");

    let turn = engine.advance(def, &session, "23/06/1985").unwrap();
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_pan");

    let turn = engine.advance(def, &session, "FGHIJ5678K").unwrap();
    assert!(turn.message.contains("Rohan Gupta"));

    let turn = engine.advance(def, &session, "yes").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Success);
}

#[test]
fn pan_registry_mismatch_recommends_image_fallback() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();
    engine.advance(def, &session, "Vikram Rao").unwrap();
    engine.advance(def, &session, "02/02/1992").unwrap();
    engine.advance(def, &session, "ZZZZZ9999Z").unwrap();
    let turn = engine.advance(def, &session, "yes").unwrap();

    assert_eq!(turn.status, WorkflowStatus::Failure);
    assert!(turn.message.contains("passport or driving licence"));
}

#[test]
fn pan_that_contradicts_the_verified_aadhaar_fails() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan")];
    let session = kyc_core::SessionId::generate("test");

    // sembrado como si la sesión hubiera verificado el Aadhaar de otra
    // persona: el registro NSDL confirma el PAN pero el cotejo cruzado no
    let mut seed = serde_json::Map::new();
    seed.insert("holder_name".to_string(), Value::from("Ananya Sharma"));
    seed.insert("dob".to_string(), Value::from("01/01/1990"));
    seed.insert(
        "aadhaar_reference".to_string(),
        serde_json::json!({
            "aadhaar_number": "999988887777",
            "holder_name": "Rohan Gupta",
            "dob": "23/06/1985",
            "address": "5 MG Road, Bengaluru",
        }),
    );
    engine.advance_seeded(def, &session, "", Some(seed)).unwrap();
    engine.advance(def, &session, "ABCDE1234F").unwrap();

    let turn = engine.advance(def, &session, "yes").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
    assert!(turn.message.contains("do not match your verified Aadhaar"));
}

#[test]
fn pan_matching_the_verified_aadhaar_passes_the_cross_check() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan")];
    let session = kyc_core::SessionId::generate("test");

    let mut seed = serde_json::Map::new();
    seed.insert("holder_name".to_string(), Value::from("Ananya Sharma"));
    seed.insert("dob".to_string(), Value::from("01/01/1990"));
    seed.insert(
        "aadhaar_reference".to_string(),
        serde_json::json!({
            "aadhaar_number": "123456789012",
            "holder_name": "Ananya Sharma",
            "dob": "01/01/1990",
            "address": "221 Green Park, New Delhi",
        }),
    );
    engine.advance_seeded(def, &session, "", Some(seed)).unwrap();
    engine.advance(def, &session, "ABCDE1234F").unwrap();

    let turn = engine.advance(def, &session, "yes").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Success);
}

#[test]
fn pan_correction_loop_is_bounded() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan")];
    let session = kyc_core::SessionId::generate("test");

    let mut seed = serde_json::Map::new();
    seed.insert("holder_name".to_string(), Value::from("Ananya Sharma"));
    seed.insert("dob".to_string(), Value::from("01/01/1990"));
    engine.advance_seeded(def, &session, "", Some(seed)).unwrap();
    engine.advance(def, &session, "ABCDE1234F").unwrap();

    // primer "no": reabre la captura del PAN
    let turn = engine.advance(def, &session, "no").unwrap();
    assert_eq!(turn.status, WorkflowStatus::InProgress);
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_pan");

    engine.advance(def, &session, "ABCDE1234F").unwrap();

    // segundo "no": el lazo de corrección se corta
    let turn = engine.advance(def, &session, "no").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
}

#[test]
fn pan_check_recommends_pan_for_a_bank_account_holder() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan_check")];
    let session = kyc_core::SessionId::generate("test");

    let turn = engine.advance(def, &session, "").unwrap();
    assert!(turn.message.contains("bank account"));

    let turn = engine.advance(def, &session, "yes").unwrap();
    assert!(turn.message.contains("Income Tax Return"));

    let turn = engine.advance(def, &session, "no").unwrap();
    assert!(turn.message.contains("occupation"));

    let turn = engine.advance(def, &session, "salaried").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Success);
    assert!(turn.message.contains("PAN verification"));
    assert_eq!(turn.payload.get("has_bank_account"), Some(&Value::Bool(true)));
}

#[test]
fn pan_check_routes_to_form60_without_tax_indicators() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan_check")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();
    engine.advance(def, &session, "no").unwrap();
    engine.advance(def, &session, "no").unwrap();
    let turn = engine.advance(def, &session, "student").unwrap();

    assert_eq!(turn.status, WorkflowStatus::Success);
    assert!(turn.message.contains("Form 60"));
}

#[test]
fn pan_check_shares_one_retry_budget_across_questions() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("pan_check")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();

    // una respuesta ilegible en la primera pregunta...
    let turn = engine.advance(def, &session, "maybe").unwrap();
    assert_eq!(turn.status, WorkflowStatus::InProgress);
    assert!(turn.message.contains("yes or no"));

    engine.advance(def, &session, "yes").unwrap();

    // ...y otra en la segunda agotan el presupuesto compartido
    let turn = engine.advance(def, &session, "perhaps").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
    assert!(turn.message.contains("eligibility check was not completed"));
}

#[test]
fn form60_records_both_incomes() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("form60")];
    let session = kyc_core::SessionId::generate("test");

    let turn = engine.advance(def, &session, "").unwrap();
    assert!(turn.message.contains("agricultural income"));

    let turn = engine.advance(def, &session, "50000").unwrap();
    assert_eq!(
        turn.awaiting.as_ref().unwrap().as_str(),
        "prompt_other_income"
    );

    let turn = engine.advance(def, &session, "1,00,000").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Success);
    assert_eq!(
        turn.payload.get("agricultural_income"),
        Some(&Value::from(50_000))
    );
    assert_eq!(turn.payload.get("other_income"), Some(&Value::from(100_000)));
}

#[test]
fn form60_shares_one_retry_budget_across_questions() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("form60")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();

    // un monto ilegible en la primera pregunta...
    let turn = engine.advance(def, &session, "a lot").unwrap();
    assert_eq!(turn.status, WorkflowStatus::InProgress);

    engine.advance(def, &session, "50000").unwrap();

    // ...y otro en la segunda agotan el presupuesto compartido
    let turn = engine.advance(def, &session, "plenty").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
}

#[test]
fn passport_happy_path() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("passport")];
    let session = kyc_core::SessionId::generate("test");

    let turn = engine.advance(def, &session, "").unwrap();
    assert!(turn.message.contains("photo of your passport"));

    let turn = engine.advance(def, &session, "upload://passport.png").unwrap();
    assert!(turn.message.contains("Ananya Sharma"));
    assert_eq!(
        turn.awaiting.as_ref().unwrap().as_str(),
        "prompt_acknowledge"
    );

    let turn = engine.advance(def, &session, "yes").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Success);
    assert!(turn.message.contains("passport has been verified"));
}

#[test]
fn driving_licence_rejection_restarts_capture_then_fails() {
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("dl")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();
    engine.advance(def, &session, "upload://dl.png").unwrap();

    // primer "no": vuelve a pedir la imagen
    let turn = engine.advance(def, &session, "no").unwrap();
    assert_eq!(turn.status, WorkflowStatus::InProgress);
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_image");

    engine.advance(def, &session, "upload://dl2.png").unwrap();

    let turn = engine.advance(def, &session, "no").unwrap();
    assert_eq!(turn.status, WorkflowStatus::Failure);
}

#[test]
fn interrupted_workflow_survives_unrelated_turn_gap() {
    // la pausa es durable: nada obliga a responder en el turno siguiente
    let (registry, engine) = setup();
    let def = &registry[&WorkflowKey::new("aadhaar")];
    let session = kyc_core::SessionId::generate("test");

    engine.advance(def, &session, "").unwrap();
    let cp = engine
        .load_checkpoint(&session, &WorkflowKey::new("aadhaar"))
        .unwrap()
        .unwrap();
    assert!(cp.is_paused());

    // turnos después, el input retoma exactamente donde quedó
    let turn = engine.advance(def, &session, "123456789012").unwrap();
    assert_eq!(turn.awaiting.as_ref().unwrap().as_str(), "prompt_otp");
}
