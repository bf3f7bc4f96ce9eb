//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `UserRepository` - Local user records mirrored from the identity provider
//! - `SkillRepository` - User-defined skills
//! - `CycleRepository` - Learning cycles and their cached feedback
//!
//! ## External Service Ports
//!
//! - `AIProvider` - Chat-completion model used for feedback
//! - `SessionValidator` - Bearer token validation

mod ai_provider;
mod cycle_repository;
mod session_validator;
mod skill_repository;
mod user_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use cycle_repository::{CycleFilter, CycleRepository};
pub use session_validator::SessionValidator;
pub use skill_repository::SkillRepository;
pub use user_repository::UserRepository;
