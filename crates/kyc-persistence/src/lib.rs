//! kyc-persistence
//!
//! Implementaciones Postgres (Diesel) de los stores del core: checkpoints
//! por (sesión, workflow) y event log append-only por run. Paridad 1:1 con
//! los backends en memoria; el motor no distingue cuál tiene debajo.
//!
//! Módulos:
//! - `pg`: stores sobre Postgres, pool r2d2 y retry de errores transitorios.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::init_dotenv;
pub use error::PersistenceError;
pub use pg::{
    build_dev_pool_from_env, build_pool, ConnectionProvider, PgCheckpointStore, PgEventStore,
    PgPool, PoolProvider,
};
