use mensa_core::{AuthProvider, UserIdentity};
use parking_lot::RwLock;

/// Auth provider backed by a settable in-process identity.
///
/// Stands in for the external auth service in tests and embedded use:
/// the hosting application decides who is signed in.
#[derive(Default)]
pub struct StaticAuth {
    user: RwLock<Option<UserIdentity>>,
}

impl StaticAuth {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        let auth = Self::default();
        auth.sign_in(uid, display_name);
        auth
    }

    pub fn sign_in(&self, uid: impl Into<String>, display_name: impl Into<String>) {
        *self.user.write() = Some(UserIdentity {
            uid: uid.into(),
            display_name: display_name.into(),
        });
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<UserIdentity> {
        self.user.read().clone()
    }
}
