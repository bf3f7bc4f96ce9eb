//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod cycle;
pub mod dashboard;
pub mod feedback;
pub mod skill;
pub mod user;

pub use cycle::{
    AnalyzeCycleCommand, AnalyzeCycleHandler, CreateCycleCommand, CreateCycleHandler, CycleError,
    CycleWithSkill, GetCycleHandler, GetCycleQuery, ListCyclesHandler, ListCyclesQuery,
    UpdateCycleCommand, UpdateCycleHandler,
};
pub use dashboard::{DashboardView, GetDashboardHandler, RECENT_CYCLE_LIMIT};
pub use feedback::{FeedbackError, GenerateFeedbackCommand, GenerateFeedbackHandler};
pub use skill::{
    CreateSkillCommand, CreateSkillHandler, ListSkillsHandler, ListSkillsQuery, SkillError,
};
pub use user::{SyncIdentityHandler, SyncOutcome, UserSyncError};
