//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `user` - Local user records synchronized from the identity provider
//! - `skill` - User-defined skill categories
//! - `cycle` - Learning cycle aggregate and the four Kolb stages
//! - `feedback` - Prompt assembly, model reply decoding and the feedback panel

pub mod cycle;
pub mod feedback;
pub mod foundation;
pub mod skill;
pub mod user;
