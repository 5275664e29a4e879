//! Mensa Core: Traits and types for the canteen crowd engine
//!
//! This crate defines the core abstractions shared by the engine and its
//! store backends:
//! - Event store capability: insert check-ins, range-query the trailing
//!   window, field-set the derived crowd state, watch for committed updates
//! - Auth capability: identity of the user submitting a check-in
//! - Data model: `CheckIn` (immutable event), `CrowdLevel` (ordered
//!   five-step scale), `CrowdState` (derived, replaced wholesale on every
//!   recomputation), `Canteen` (aggregate root)
//!
//! Key properties:
//! - `CrowdState` is always self-consistent: the display percentage is
//!   derived from the level by construction and cannot drift
//! - `CrowdLevel` decodes leniently: an unrecognized stored label becomes
//!   `Moderate` instead of failing the whole window

pub mod config;
pub mod error;
pub mod observe;
pub mod traits;
pub mod types;

pub use config::{IngestConfig, StreamConfig};
pub use error::{CrowdError, Result};
pub use traits::{AuthProvider, Clock, EventStore, SystemClock, UserIdentity};
pub use types::{
    Canteen, CanteenId, CheckIn, CheckInId, CrowdLevel, CrowdState, Envelope, NewCheckIn,
    StatusFeed, StatusKey, TimestampMillis,
};
