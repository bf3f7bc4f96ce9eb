//! Learning cycle module - one pass through Kolb's experiential learning model.
//!
//! A cycle holds a title and four free-text reflections, one per stage, and
//! may carry the last AI feedback generated for exactly that text.

mod aggregate;
mod content;
mod stage;

pub use aggregate::LearningCycle;
pub use content::{CycleContent, CycleDraft};
pub use stage::Stage;
