//! User module - local mirror of identity-provider accounts.

mod event;
mod profile;

pub use event::IdentityEvent;
pub use profile::{IdentityProfile, UserProfile};
