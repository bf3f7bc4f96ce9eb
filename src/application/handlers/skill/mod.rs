//! Skill command and query handlers.

mod create_skill;
mod errors;
mod list_skills;

pub use create_skill::{CreateSkillCommand, CreateSkillHandler};
pub use errors::SkillError;
pub use list_skills::{ListSkillsHandler, ListSkillsQuery};
