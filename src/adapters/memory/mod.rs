//! In-memory repository adapters.
//!
//! A single `InMemoryStore` implements every repository port over shared
//! state so deleting a user cascades to their skills and cycles, matching
//! the relational schema. Useful for testing and local development.

mod store;

pub use store::InMemoryStore;
