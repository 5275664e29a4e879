pub mod auth;
pub mod clock;
pub mod store;

pub use auth::{AuthProvider, UserIdentity};
pub use clock::{Clock, SystemClock};
pub use store::EventStore;
