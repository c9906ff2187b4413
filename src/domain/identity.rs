//! Account identity, sign-up form checks and password strength.

use crate::domain::error::AuthError;

/// Shortest password the identity provider accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up form contents before they reach the provider.
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(self) -> Result<Credentials, AuthError> {
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

/// Loose shape check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Empty,
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// Graded purely on length.
    pub fn of(password: &str) -> Self {
        match password.chars().count() {
            0 => PasswordStrength::Empty,
            1..=5 => PasswordStrength::Weak,
            6..=7 => PasswordStrength::Fair,
            8..=9 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Empty => "",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PasswordStrength::Empty => "transparent",
            PasswordStrength::Weak => "red",
            PasswordStrength::Fair => "orange",
            PasswordStrength::Good => "#90EE90",
            PasswordStrength::Strong => "green",
        }
    }
}
