//! User synchronization from identity-provider events.

mod sync_identity;

pub use sync_identity::{SyncIdentityHandler, SyncOutcome, UserSyncError};
