//! Checkpoints: el estado persistente del protocolo suspender/retomar.
//!
//! Un checkpoint por (sesión, workflow). Pausado significa "hay un run en
//! vuelo y se retoma en `pause.next`"; terminal significa "no hay run activo"
//! y un nuevo start arranca una instancia fresca.

pub mod store;
pub mod types;

pub use store::{CheckpointStore, InMemoryCheckpointStore};
pub use types::{Checkpoint, PauseState};
