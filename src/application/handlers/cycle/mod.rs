//! Learning cycle command and query handlers.

mod analyze_cycle;
mod create_cycle;
mod errors;
mod get_cycle;
mod list_cycles;
mod update_cycle;
mod view;

pub use analyze_cycle::{AnalyzeCycleCommand, AnalyzeCycleHandler};
pub use create_cycle::{CreateCycleCommand, CreateCycleHandler};
pub use errors::CycleError;
pub use get_cycle::{GetCycleHandler, GetCycleQuery};
pub use list_cycles::{ListCyclesHandler, ListCyclesQuery};
pub use update_cycle::{UpdateCycleCommand, UpdateCycleHandler};
pub use view::CycleWithSkill;
