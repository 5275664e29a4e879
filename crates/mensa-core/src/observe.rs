//! Optional metrics instrumentation.
//!
//! When the `observe` feature is enabled, key operations emit counters
//! and histograms via the [`metrics`] crate; a downstream application
//! must install a recorder to collect them. Without the feature every
//! function here is a zero-cost no-op.

/// Record an accepted check-in.
///
/// - `mensa.check_in.accepted_total` – counter
#[inline]
pub fn record_check_in() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("mensa.check_in.accepted_total").increment(1);
    }
}

/// Record a window recomputation (counter + duration + window size).
///
/// - `mensa.aggregator.recomputes_total` – counter
/// - `mensa.aggregator.recompute_duration_seconds` – histogram
/// - `mensa.aggregator.window_check_ins` – histogram
#[inline]
pub fn record_recompute(duration: std::time::Duration, window_len: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("mensa.aggregator.recomputes_total").increment(1);
        metrics::histogram!("mensa.aggregator.recompute_duration_seconds")
            .record(duration.as_secs_f64());
        metrics::histogram!("mensa.aggregator.window_check_ins").record(window_len as f64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (duration, window_len);
    }
}

/// Record a projection write.
///
/// - `mensa.projector.applies_total` – counter with `outcome` label
#[inline]
pub fn record_projection(success: bool) {
    #[cfg(feature = "observe")]
    {
        let outcome = if success { "ok" } else { "fail" };
        metrics::counter!("mensa.projector.applies_total", "outcome" => outcome).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = success;
    }
}
