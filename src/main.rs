//! kycflow: CLI interactiva de verificación documental KYC.
//!
//! Lee turnos de stdin y responde por stdout. Con `DATABASE_URL` definido
//! los checkpoints y el event log van a Postgres y la sesión puede retomarse
//! tras reiniciar el proceso; sin él todo queda en memoria.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use kyc_core::{
    CheckpointStore, EventStore, InMemoryCheckpointStore, InMemoryEventStore, SessionId,
    WorkflowEngine,
};
use kyc_orchestrator::{Dispatcher, KeywordClassifier, Router, ScriptedAnswerer};
use kyc_workflows::{build_registry, Collaborators, WorkflowRegistry};

const GREETING: &str = "Hello! I can help you complete your KYC verification. \
You can verify: aadhaar, pan, form60, passport or dl. \
Which document would you like to start with?";

fn main() {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let registry = match build_registry(&Collaborators::default()) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("[kycflow] invalid workflow definition: {e}");
            std::process::exit(1);
        }
    };

    if std::env::var("DATABASE_URL").is_ok() {
        log::info!("checkpoints y eventos sobre Postgres");
        let pool = match kyc_persistence::build_dev_pool_from_env() {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("[kycflow] pool error: {e}");
                std::process::exit(5);
            }
        };
        let checkpoints = Arc::new(kyc_persistence::PgCheckpointStore::new(
            kyc_persistence::PoolProvider { pool: pool.clone() },
        ));
        let events = Arc::new(kyc_persistence::PgEventStore::new(
            kyc_persistence::PoolProvider { pool },
        ));
        run_repl(checkpoints, events, registry);
    } else {
        log::info!("checkpoints y eventos en memoria");
        run_repl(
            Arc::new(InMemoryCheckpointStore::new()),
            Arc::new(InMemoryEventStore::new()),
            registry,
        );
    }
}

fn run_repl<C, E>(checkpoints: Arc<C>, events: Arc<E>, registry: WorkflowRegistry)
where
    C: CheckpointStore,
    E: EventStore,
{
    let engine = WorkflowEngine::new(checkpoints, events);
    let dispatcher = Dispatcher::new(engine, registry);
    let router = Router::new(
        dispatcher,
        Arc::new(KeywordClassifier::new()),
        Arc::new(ScriptedAnswerer::new()),
    );
    let session = SessionId::generate("cli");

    println!("{GREETING}");
    prompt();
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let input = line.trim();
        match input {
            "exit" | "quit" => {
                println!("Goodbye!");
                return;
            }
            "reset" => {
                match router.reset(&session) {
                    Ok(()) => println!("Your current verification was cancelled."),
                    Err(e) => eprintln!("[kycflow] reset error: {e}"),
                }
                prompt();
                continue;
            }
            _ => {}
        }
        match router.handle_turn(&session, input) {
            Ok(reply) => println!("{reply}"),
            Err(e) => eprintln!("[kycflow] error: {e}"),
        }
        prompt();
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
