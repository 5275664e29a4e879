use crate::types::{CanteenId, CrowdState, TimestampMillis};
use serde::{Deserialize, Serialize};

/// A canteen: static descriptive fields plus the derived crowd state.
///
/// The record pre-exists (seeded outside the engine); only `crowd_state`
/// is ever written by this crate, and only through the projector's
/// field-set update, never a full-record replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canteen {
    pub id: CanteenId,
    pub name: String,
    pub location: String,
    pub opening_hours: String,
    pub crowd_state: CrowdState,
}

impl Canteen {
    /// A freshly seeded canteen carries the neutral fallback state until
    /// the first check-in triggers a real recomputation.
    pub fn seeded(
        id: impl Into<CanteenId>,
        name: impl Into<String>,
        location: impl Into<String>,
        opening_hours: impl Into<String>,
        seeded_at: TimestampMillis,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            opening_hours: opening_hours.into(),
            crowd_state: CrowdState::fallback(seeded_at),
        }
    }
}
