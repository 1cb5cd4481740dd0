//! Constantes del motor.

/// Versión lógica del motor. Participa en el hash de definición para que un
/// cambio incompatible del intérprete invalide checkpoints pausados antiguos.
pub const ENGINE_VERSION: &str = "K1.0";

/// Cota de steps ejecutables dentro de un mismo turno. Un grafo bien formado
/// siempre alcanza una pausa o un terminal mucho antes; superar la cota
/// indica un ciclo sin pausa en la definición (error de configuración).
pub const MAX_STEPS_PER_TURN: usize = 64;

/// Etiqueta de decisión emitida por las fases de reintento cuando aún queda
/// presupuesto.
pub const DECIDE_RETRY: &str = "retry";

/// Etiqueta de decisión emitida cuando una fase agotó su presupuesto.
pub const DECIDE_TERMINATE: &str = "terminate";
