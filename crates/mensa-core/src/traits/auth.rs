/// The signed-in user, as reported by the external auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: String,
    pub display_name: String,
}

/// Capability interface over the external authentication service.
///
/// Mutating operations require a signed-in user; the engine only reads
/// the current identity and never manages sessions itself.
pub trait AuthProvider: Send + Sync {
    fn current_user(&self) -> Option<UserIdentity>;
}
