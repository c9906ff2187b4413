//! In-process identity provider.
//!
//! Accounts live only as long as the adapter. Passwords are stored as argon2
//! hashes and checked the same way a hosted provider would.

use crate::domain::error::AuthError;
use crate::domain::identity::{is_valid_email, Identity, MIN_PASSWORD_LEN};
use crate::ports::identity_port::{AuthListener, IdentityPort, Subscription};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// This provider's message for a rejected sign-in.
pub const SIGN_IN_REJECTED: &str = "Invalid email or password.";

fn rejected() -> AuthError {
    AuthError::InvalidCredentials(SIGN_IN_REJECTED.to_string())
}

struct Account {
    uid: String,
    password_hash: String,
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, Account>,
    current: Option<Identity>,
    listeners: HashMap<u64, AuthListener>,
    next_listener: u64,
}

#[derive(Clone, Default)]
pub struct MemoryIdentityAdapter {
    state: Arc<Mutex<State>>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl MemoryIdentityAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_count(&self) -> usize {
        lock(&self.state).accounts.len()
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::Provider(format!("password hashing failed: {e}")))
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Set the signed-in identity and notify listeners outside the lock.
    fn set_current(&self, identity: Option<Identity>) {
        let listeners: Vec<AuthListener> = {
            let mut state = lock(&self.state);
            state.current = identity.clone();
            state.listeners.values().cloned().collect()
        };
        for listener in listeners {
            listener(identity.as_ref());
        }
    }
}

impl IdentityPort for MemoryIdentityAdapter {
    fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if lock(&self.state).accounts.contains_key(&email) {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let password_hash = Self::hash_password(password)?;
        let identity = Identity {
            uid: format!("{:016x}", rand::random::<u64>()),
            email: email.clone(),
        };

        {
            let mut state = lock(&self.state);
            // Re-check: another caller may have registered while hashing.
            if state.accounts.contains_key(&email) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            state.accounts.insert(
                email,
                Account {
                    uid: identity.uid.clone(),
                    password_hash,
                },
            );
        }

        log::info!("created account {}", identity.email);
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        let (uid, hash) = {
            let state = lock(&self.state);
            match state.accounts.get(&email) {
                Some(account) => (account.uid.clone(), account.password_hash.clone()),
                None => return Err(rejected()),
            }
        };

        if !Self::verify_password(password, &hash) {
            log::warn!("failed sign-in for {}", email);
            return Err(rejected());
        }

        let identity = Identity { uid, email };
        self.set_current(Some(identity.clone()));
        Ok(identity)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        if lock(&self.state).current.is_none() {
            return Err(AuthError::NotSignedIn);
        }
        self.set_current(None);
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        lock(&self.state).current.clone()
    }

    fn subscribe(&self, listener: AuthListener) -> Subscription {
        let (id, current) = {
            let mut state = lock(&self.state);
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.insert(id, listener.clone());
            (id, state.current.clone())
        };
        listener(current.as_ref());

        let weak: Weak<Mutex<State>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                lock(&state).listeners.remove(&id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn create_account_signs_in() {
        let provider = MemoryIdentityAdapter::new();
        let identity = provider.create_account("User@Example.com", "secret1").unwrap();
        assert_eq!(identity.email, "user@example.com");
        assert_eq!(provider.current_identity(), Some(identity));
        assert_eq!(provider.account_count(), 1);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let provider = MemoryIdentityAdapter::new();
        provider.create_account("a@b.co", "secret1").unwrap();
        let err = provider.create_account("A@B.co", "secret2").unwrap_err();
        assert_eq!(err, AuthError::EmailAlreadyInUse);
    }

    #[test]
    fn weak_password_and_bad_email_are_rejected() {
        let provider = MemoryIdentityAdapter::new();
        assert_eq!(
            provider.create_account("a@b.co", "12345").unwrap_err(),
            AuthError::WeakPassword
        );
        assert_eq!(
            provider.create_account("not-an-email", "secret1").unwrap_err(),
            AuthError::InvalidEmail
        );
        assert_eq!(provider.account_count(), 0);
    }

    #[test]
    fn sign_in_checks_password() {
        let provider = MemoryIdentityAdapter::new();
        let created = provider.create_account("a@b.co", "secret1").unwrap();
        provider.sign_out().unwrap();

        assert_eq!(
            provider.sign_in("a@b.co", "wrong-pass").unwrap_err(),
            rejected()
        );
        assert_eq!(
            provider.sign_in("nobody@b.co", "secret1").unwrap_err(),
            rejected()
        );
        let signed_in = provider.sign_in("a@b.co", "secret1").unwrap();
        assert_eq!(signed_in, created);
    }

    #[test]
    fn sign_out_without_session_fails() {
        let provider = MemoryIdentityAdapter::new();
        assert_eq!(provider.sign_out().unwrap_err(), AuthError::NotSignedIn);
    }

    #[test]
    fn subscription_receives_changes_until_dropped() {
        let provider = MemoryIdentityAdapter::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let signed_in = Arc::new(Mutex::new(Vec::new()));

        let c = calls.clone();
        let s = signed_in.clone();
        let sub = provider.subscribe(Arc::new(move |identity: Option<&Identity>| {
            c.fetch_add(1, Ordering::SeqCst);
            s.lock().unwrap().push(identity.map(|i| i.email.clone()));
        }));

        provider.create_account("a@b.co", "secret1").unwrap();
        provider.sign_out().unwrap();
        drop(sub);
        provider.sign_in("a@b.co", "secret1").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *signed_in.lock().unwrap(),
            vec![None, Some("a@b.co".to_string()), None]
        );
    }

    #[test]
    fn subscription_outliving_provider_is_harmless() {
        let provider = MemoryIdentityAdapter::new();
        let sub = provider.subscribe(Arc::new(|_: Option<&Identity>| {}));
        drop(provider);
        sub.unsubscribe();
    }
}
