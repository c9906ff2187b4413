//! Identity provider port trait.
//!
//! Auth-state observation is an explicit capability: callers hold the
//! [`Subscription`] for as long as they want updates and drop it when done.

use crate::domain::error::AuthError;
use crate::domain::identity::Identity;
use std::sync::Arc;

/// Called with the signed-in identity, or `None` after sign-out.
pub type AuthListener = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

pub trait IdentityPort {
    /// Register a new account. Providers sign the new account in.
    fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    fn sign_out(&self) -> Result<(), AuthError>;

    fn current_identity(&self) -> Option<Identity>;

    /// Listen for auth-state changes. The listener is called once with the
    /// current state, then on every change until the subscription is dropped.
    fn subscribe(&self, listener: AuthListener) -> Subscription;
}

/// Handle that keeps a listener registered.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    on_drop: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(on_drop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_drop: Some(Box::new(on_drop)),
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.on_drop.take() {
            f();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.on_drop.is_some())
            .finish()
    }
}
