pub mod canteen;
pub mod check_in;
pub mod crowd;
pub mod envelope;
pub mod status;

pub use canteen::Canteen;
pub use check_in::{CheckIn, NewCheckIn};
pub use crowd::{CrowdLevel, CrowdState};
pub use envelope::Envelope;
pub use status::{StatusFeed, StatusKey};

/// Canteen identifier - opaque, assigned when the canteen is seeded
pub type CanteenId = String;

/// Check-in identifier - opaque, assigned by the store on insert
pub type CheckInId = String;

/// Event timestamp - milliseconds since the Unix epoch
pub type TimestampMillis = i64;
