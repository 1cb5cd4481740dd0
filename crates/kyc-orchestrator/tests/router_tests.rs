use std::sync::Arc;

use kyc_core::{
    InMemoryCheckpointStore, InMemoryEventStore, SessionId, WorkflowEngine, WorkflowKey,
};
use kyc_domain::DomainError;
use kyc_orchestrator::{
    Dispatcher, IntentClassifier, IntentContext, IntentDecision, KeywordClassifier, Router,
    ScriptedAnswerer, UserIntent,
};
use kyc_workflows::{build_registry, Collaborators};

type TestRouter = Router<InMemoryCheckpointStore, InMemoryEventStore>;

fn router() -> TestRouter {
    router_with(Arc::new(KeywordClassifier::new()))
}

fn router_with(classifier: Arc<dyn IntentClassifier>) -> TestRouter {
    let registry = build_registry(&Collaborators::default()).unwrap();
    let engine = WorkflowEngine::new(
        Arc::new(InMemoryCheckpointStore::new()),
        Arc::new(InMemoryEventStore::new()),
    );
    Router::new(
        Dispatcher::new(engine, registry),
        classifier,
        Arc::new(ScriptedAnswerer::new()),
    )
}

fn complete_aadhaar(router: &TestRouter, session: &SessionId) {
    router.handle_turn(session, "start aadhaar").unwrap();
    router.handle_turn(session, "123456789012").unwrap();
    router.handle_turn(session, "123456").unwrap();
    let reply = router.handle_turn(session, "yes").unwrap();
    assert!(reply.contains("verified successfully"));
}

#[test]
fn success_suggests_the_next_outstanding_document() {
    let router = router();
    let session = SessionId::generate("test");

    complete_aadhaar(&router, &session);
    let state = router.session_state(&session);
    assert!(state.is_completed(&WorkflowKey::new("aadhaar")));
    assert!(state.active.is_none());

    // con el grupo de identidad satisfecho, el siguiente pendiente es form60
    let reply = router.handle_turn(&session, "thanks").unwrap();
    assert!(reply.contains("form60"));
}

#[test]
fn restarting_a_completed_workflow_is_refused() {
    let router = router();
    let session = SessionId::generate("test");

    complete_aadhaar(&router, &session);
    let reply = router.handle_turn(&session, "start aadhaar").unwrap();
    assert!(reply.contains("already completed"));
    // el conjunto de completados no se duplica
    assert_eq!(router.session_state(&session).completed.len(), 1);
}

#[test]
fn only_one_workflow_can_be_active() {
    let router = router();
    let session = SessionId::generate("test");

    router.handle_turn(&session, "start aadhaar").unwrap();
    let reply = router.handle_turn(&session, "switch to passport").unwrap();
    assert!(reply.contains("finish your aadhaar verification first"));
    assert_eq!(
        router.session_state(&session).active,
        Some(WorkflowKey::new("aadhaar"))
    );
}

#[test]
fn out_of_band_question_leaves_the_pause_untouched() {
    let router = router();
    let session = SessionId::generate("test");

    router.handle_turn(&session, "start aadhaar").unwrap();
    router.handle_turn(&session, "123456789012").unwrap();
    router.handle_turn(&session, "123456").unwrap();
    // pausado en la confirmación

    let reply = router.handle_turn(&session, "what is an OTP?").unwrap();
    assert!(reply.contains("one time password"));
    // guía exacta del prompt pendiente
    assert!(reply.contains("Please confirm the Aadhaar details with yes or no."));

    // el workflow sigue exactamente donde estaba
    assert_eq!(
        router.session_state(&session).active,
        Some(WorkflowKey::new("aadhaar"))
    );
    let reply = router.handle_turn(&session, "yes").unwrap();
    assert!(reply.contains("verified successfully"));
}

#[test]
fn pan_started_after_aadhaar_skips_manual_capture() {
    let router = router();
    let session = SessionId::generate("test");

    complete_aadhaar(&router, &session);
    let reply = router.handle_turn(&session, "start pan").unwrap();
    // sembrado con nombre y fecha verificados: pide el PAN directamente
    assert!(reply.contains("PAN number"));

    router.handle_turn(&session, "ABCDE1234F").unwrap();
    let reply = router.handle_turn(&session, "yes").unwrap();
    assert!(reply.contains("PAN ABCDE1234F has been verified"));
    // con identidad y requisito fiscal cubiertos, el KYC queda completo
    assert!(reply.contains("KYC is complete"));
}

#[test]
fn failure_clears_the_active_workflow() {
    let router = router();
    let session = SessionId::generate("test");

    router.handle_turn(&session, "start aadhaar").unwrap();
    router.handle_turn(&session, "12AB").unwrap();
    let reply = router.handle_turn(&session, "nonsense").unwrap();
    assert!(reply.contains("Too many failed attempts"));

    let state = router.session_state(&session);
    assert!(state.active.is_none());
    assert!(!state.is_completed(&WorkflowKey::new("aadhaar")));

    // la sesión puede arrancar otro documento de inmediato
    let reply = router.handle_turn(&session, "start passport").unwrap();
    assert!(reply.contains("photo of your passport"));
}

#[test]
fn reset_discards_the_active_run_but_keeps_completions() {
    let router = router();
    let session = SessionId::generate("test");

    complete_aadhaar(&router, &session);
    router.handle_turn(&session, "start form 60").unwrap();
    assert!(router.session_state(&session).active.is_some());

    router.reset(&session).unwrap();
    let state = router.session_state(&session);
    assert!(state.active.is_none());
    assert!(state.is_completed(&WorkflowKey::new("aadhaar")));

    // arrancar de nuevo produce el primer prompt, no una reanudación
    let reply = router.handle_turn(&session, "start form 60").unwrap();
    assert!(reply.contains("agricultural income"));
}

#[test]
fn unknown_input_offers_the_next_document() {
    let router = router();
    let session = SessionId::generate("test");

    let reply = router.handle_turn(&session, "hmmmm").unwrap();
    assert!(reply.contains("Would you like to verify your aadhaar?"));
}

#[test]
fn declaring_no_pan_runs_the_eligibility_probe() {
    let router = router();
    let session = SessionId::generate("test");

    let reply = router
        .handle_turn(&session, "I don't have a PAN card")
        .unwrap();
    assert!(reply.contains("bank account"));

    router.handle_turn(&session, "yes").unwrap();
    router.handle_turn(&session, "no").unwrap();
    let reply = router.handle_turn(&session, "salaried").unwrap();

    assert!(reply.contains("PAN verification"));
    let state = router.session_state(&session);
    assert!(state.active.is_none());
    assert!(state.is_completed(&WorkflowKey::new("pan_check")));
}

#[test]
fn concurrent_turns_on_one_session_are_serialized() {
    let router = router();
    let session = SessionId::generate("test");
    router.handle_turn(&session, "start aadhaar").unwrap();

    // dos respuestas inválidas simultáneas: serializadas, la primera
    // reintenta y la segunda agota el límite de formato (2)
    let replies: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| scope.spawn(|| router.handle_turn(&session, "12AB").unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let failures = replies
        .iter()
        .filter(|reply| reply.contains("Too many failed attempts"))
        .count();
    assert_eq!(failures, 1);
    assert!(router.session_state(&session).active.is_none());
}

/// Clasificador que nunca reconoce una intención pero marca si el mensaje
/// trae datos, como haría un clasificador externo menos seguro que el de
/// palabras clave.
struct DataFlagClassifier;

impl IntentClassifier for DataFlagClassifier {
    fn classify(
        &self,
        _context: &IntentContext,
        message: &str,
    ) -> Result<IntentDecision, DomainError> {
        let intent = if message == "begin" {
            UserIntent::Start(WorkflowKey::new("aadhaar"))
        } else {
            UserIntent::Unknown
        };
        Ok(IntentDecision {
            intent,
            provides_data: message.chars().any(|c| c.is_ascii_digit()),
        })
    }
}

#[test]
fn unknown_intent_with_data_still_feeds_the_active_workflow() {
    let router = router_with(Arc::new(DataFlagClassifier));
    let session = SessionId::generate("test");

    router.handle_turn(&session, "begin").unwrap();
    let reply = router.handle_turn(&session, "123456789012").unwrap();
    assert!(reply.contains("6 digit OTP"));

    // sin datos, la intención desconocida solo repite la guía
    let reply = router.handle_turn(&session, "hmmmm").unwrap();
    assert!(reply.contains("I still need the 6 digit OTP"));
}
