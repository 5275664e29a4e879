use crate::types::TimestampMillis;

/// Time source for the ingest path.
///
/// Check-in timestamps come from this clock, not the client, so the
/// trailing window cannot be manipulated by client clock skew. Tests
/// inject a fixed clock for deterministic windows.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> TimestampMillis;
}

/// Wall-clock time via `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> TimestampMillis {
        chrono::Utc::now().timestamp_millis()
    }
}
