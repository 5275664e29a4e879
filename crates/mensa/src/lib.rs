//! Mensa: canteen crowd-level estimation engine.
//!
//! Ingests user check-ins (subjective crowd level + wait time), derives a
//! per-canteen [`CrowdState`] over a trailing 30-minute window, projects
//! it onto the canteen record, and pushes committed updates to live
//! subscribers.
//!
//! Pipeline: [`CheckInIngest`] persists the event and fires a background
//! recomputation → [`CrowdAggregator`] re-reads the trailing window and
//! computes a fresh state → [`CrowdStateProjector`] writes it back →
//! status streams deliver it to subscribers. Recomputation always re-reads
//! the full window, so concurrent triggers for the same canteen race
//! benignly: the last projected write wins and is always a valid snapshot.
//!
//! The durable store and the auth service are capabilities
//! ([`EventStore`], [`AuthProvider`]); `mensa-memory` provides the
//! in-process backend.

pub mod aggregator;
pub mod ingest;
pub mod projector;
pub mod repository;
pub mod stream;

pub use aggregator::{aggregate_window, CrowdAggregator, WINDOW_MINUTES};
pub use ingest::CheckInIngest;
pub use projector::CrowdStateProjector;
pub use repository::CanteenRepository;
pub use stream::{observe_all, observe_canteen};

pub use mensa_core::{
    AuthProvider, Canteen, CanteenId, CheckIn, CheckInId, Clock, CrowdError, CrowdLevel,
    CrowdState, Envelope, EventStore, IngestConfig, NewCheckIn, Result, StatusKey, StreamConfig,
    SystemClock, TimestampMillis, UserIdentity,
};
