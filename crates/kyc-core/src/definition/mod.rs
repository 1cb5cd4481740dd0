//! Definición declarativa de un workflow documental.
//!
//! La definición es una tabla inmutable construida una sola vez al arrancar
//! el proceso: steps con sus handlers, tabla de transiciones etiquetadas,
//! conjunto de pausas (con su texto de retorno), terminales y límites de
//! reintento. El `WorkflowEngine` es el único intérprete; ninguna definición
//! genera closures por instancia.

pub mod builder;
pub mod graph;

pub use builder::{DefinitionError, WorkflowBuilder};
pub use graph::{Transition, WorkflowDefinition};
