use crate::types::{CanteenId, CheckInId, CrowdLevel, TimestampMillis};
use serde::{Deserialize, Serialize};

/// An immutable check-in event: one user's observation of a canteen's
/// crowd level and wait time. Created once on submission, never mutated,
/// retained indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: CheckInId,
    pub canteen_id: CanteenId,
    pub user_id: String,
    /// Denormalized display label captured at submission time.
    pub user_name: String,
    pub crowd_level: CrowdLevel,
    pub wait_time_minutes: u32,
    #[serde(default)]
    pub comment: String,
    /// Assigned by the ingest clock, never client-supplied, so a skewed
    /// client clock cannot shift the trailing window.
    pub created_at: TimestampMillis,
}

/// Insert form of a check-in: everything but the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckIn {
    pub canteen_id: CanteenId,
    pub user_id: String,
    pub user_name: String,
    pub crowd_level: CrowdLevel,
    pub wait_time_minutes: u32,
    #[serde(default)]
    pub comment: String,
    pub created_at: TimestampMillis,
}

impl CheckIn {
    /// Attach a store-assigned id to an insert form.
    pub fn from_new(id: CheckInId, new: NewCheckIn) -> Self {
        Self {
            id,
            canteen_id: new.canteen_id,
            user_id: new.user_id,
            user_name: new.user_name,
            crowd_level: new.crowd_level,
            wait_time_minutes: new.wait_time_minutes,
            comment: new.comment,
            created_at: new.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_document_with_corrupted_level_still_decodes() {
        let doc = serde_json::json!({
            "id": "chk-000001",
            "canteenId": "north",
            "userId": "u1",
            "userName": "Sam",
            "crowdLevel": "VERY_FULL",
            "waitTimeMinutes": 7,
            "createdAt": 1_700_000_000_000_i64,
        });
        let check_in: CheckIn = serde_json::from_value(doc).unwrap();
        assert_eq!(check_in.crowd_level, CrowdLevel::Moderate);
        // Absent comment defaults to empty
        assert_eq!(check_in.comment, "");
    }
}
