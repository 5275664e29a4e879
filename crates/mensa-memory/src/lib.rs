//! In-memory backend for the mensa crowd engine.
//!
//! Implements the [`EventStore`](mensa_core::EventStore) and
//! [`AuthProvider`](mensa_core::AuthProvider) capabilities against
//! process-local state. Check-ins are held as JSON documents, the same
//! shape a document store would hold, so the lenient decode path is
//! exercised for real. Used by tests and embedded deployments; a remote
//! document-store backend plugs in behind the same traits.

pub mod auth;
pub mod store;

pub use auth::StaticAuth;
pub use store::MemoryStore;
