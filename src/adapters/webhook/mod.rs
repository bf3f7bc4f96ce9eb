//! Identity webhook adapters.
//!
//! - `SvixVerifier` - HMAC-SHA256 signature and timestamp verification
//! - `parse_identity_event` - Maps provider payloads to `IdentityEvent`

mod clerk;
mod svix;

pub use clerk::parse_identity_event;
pub use svix::{SignedHeaders, SvixVerifier, WebhookError};
