//! The ordered crowd scale and the derived per-canteen state.

use crate::types::TimestampMillis;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Subjective congestion level reported by a check-in.
///
/// The five values form an ordered scale; aggregation works on the
/// integer ranks, so the ordering here is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrowdLevel {
    Empty,
    Low,
    Moderate,
    Busy,
    Crowded,
}

impl CrowdLevel {
    /// All levels in rank order. Rank N is `ORDERED[N]`.
    pub const ORDERED: [CrowdLevel; 5] = [
        CrowdLevel::Empty,
        CrowdLevel::Low,
        CrowdLevel::Moderate,
        CrowdLevel::Busy,
        CrowdLevel::Crowded,
    ];

    /// Integer rank of this level on the ordered scale (0..=4).
    pub const fn rank(self) -> u32 {
        match self {
            CrowdLevel::Empty => 0,
            CrowdLevel::Low => 1,
            CrowdLevel::Moderate => 2,
            CrowdLevel::Busy => 3,
            CrowdLevel::Crowded => 4,
        }
    }

    /// Look up a level by rank, clamping out-of-range indices to
    /// `Moderate`. Valid input can never produce an index outside
    /// `[0, 4]`, but corrupted stored data must not panic the engine.
    pub fn from_rank(rank: i64) -> Self {
        usize::try_from(rank)
            .ok()
            .and_then(|i| Self::ORDERED.get(i).copied())
            .unwrap_or(CrowdLevel::Moderate)
    }

    /// Display percentage for this level. Fixed table; never set
    /// independently of the level.
    pub const fn percentage(self) -> u8 {
        match self {
            CrowdLevel::Empty => 10,
            CrowdLevel::Low => 30,
            CrowdLevel::Moderate => 50,
            CrowdLevel::Busy => 70,
            CrowdLevel::Crowded => 90,
        }
    }

    /// Wire label used in stored documents.
    pub const fn label(self) -> &'static str {
        match self {
            CrowdLevel::Empty => "EMPTY",
            CrowdLevel::Low => "LOW",
            CrowdLevel::Moderate => "MODERATE",
            CrowdLevel::Busy => "BUSY",
            CrowdLevel::Crowded => "CROWDED",
        }
    }

    /// Strict label parse. Returns `None` for unknown labels; most
    /// callers want [`CrowdLevel::from_label_lossy`] instead.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ORDERED.iter().copied().find(|l| l.label() == label)
    }

    /// Lenient label parse: an unrecognized or corrupted label is
    /// treated as `Moderate` so one bad record cannot stall a whole
    /// window aggregation.
    pub fn from_label_lossy(label: &str) -> Self {
        Self::from_label(label).unwrap_or(CrowdLevel::Moderate)
    }
}

impl Serialize for CrowdLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CrowdLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label_lossy(&label))
    }
}

/// Derived summary of recent check-ins for one canteen.
///
/// Replaced wholesale on every recomputation, never merged, so a stale
/// field from a prior computation cannot survive into a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrowdState {
    pub current_crowd_level: CrowdLevel,
    pub crowd_percentage: u8,
    pub check_ins_in_window: usize,
    pub avg_wait_time_minutes: u32,
    pub last_updated: TimestampMillis,
}

impl CrowdState {
    /// Build a state for a level, deriving the percentage from the fixed
    /// table. This is the only way the engine constructs a state, which
    /// keeps the level/percentage pairing consistent by construction.
    pub fn for_level(
        level: CrowdLevel,
        check_ins_in_window: usize,
        avg_wait_time_minutes: u32,
        last_updated: TimestampMillis,
    ) -> Self {
        Self {
            current_crowd_level: level,
            crowd_percentage: level.percentage(),
            check_ins_in_window,
            avg_wait_time_minutes,
            last_updated,
        }
    }

    /// Neutral fallback for a canteen with no signal in the window:
    /// moderately busy, 10 minute wait. Deliberately not an error state;
    /// an idle canteen is assumed moderate rather than unknown.
    pub fn fallback(last_updated: TimestampMillis) -> Self {
        Self::for_level(CrowdLevel::Moderate, 0, 10, last_updated)
    }
}
