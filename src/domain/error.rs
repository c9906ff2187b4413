//! Domain error types.

/// Identity provider failures, each mapped to a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password is too weak")]
    WeakPassword,

    /// Sign-in rejected; carries the provider's own message.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Map an identity provider error code (e.g. `auth/weak-password`).
    pub fn from_code(code: &str) -> Self {
        Self::from_provider(code, code)
    }

    /// Map a provider error code, keeping `message` for sign-in failures.
    pub fn from_provider(code: &str, message: &str) -> Self {
        match code {
            "auth/email-already-in-use" => AuthError::EmailAlreadyInUse,
            "auth/invalid-email" => AuthError::InvalidEmail,
            "auth/weak-password" => AuthError::WeakPassword,
            "auth/wrong-password" | "auth/user-not-found" | "auth/invalid-credential" => {
                AuthError::InvalidCredentials(message.to_string())
            }
            other => AuthError::Provider(other.to_string()),
        }
    }

    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        let text = match self {
            AuthError::EmailAlreadyInUse => "That email's already registered. Try logging in.",
            AuthError::InvalidEmail => "Please enter a valid email address.",
            AuthError::WeakPassword => "Password is too weak. Use at least 6 characters.",
            AuthError::InvalidCredentials(message) => return message.clone(),
            AuthError::PasswordMismatch => "Passwords do not match!",
            AuthError::NotSignedIn => "Please log in first.",
            AuthError::Provider(_) => "Sign-up failed. Please try again.",
        };
        text.to_string()
    }
}

/// Top-level error type for compounder.
#[derive(Debug, thiserror::Error)]
pub enum CompounderError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("market data error for {symbol}: {message}")]
    Upstream { symbol: String, message: String },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("fetching {symbol} timed out after {seconds}s")]
    Timeout { symbol: String, seconds: u64 },

    #[error("fetching {symbol} was cancelled")]
    Cancelled { symbol: String },

    #[error("request {ticket} was superseded by a newer request")]
    Stale { ticket: u64 },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CompounderError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CompounderError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Message suitable for showing in place of the chart.
    pub fn user_message(&self) -> String {
        match self {
            CompounderError::InvalidInput { reason, .. } => reason.clone(),
            CompounderError::Upstream { message, .. } => message.clone(),
            CompounderError::Auth(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<&CompounderError> for std::process::ExitCode {
    fn from(err: &CompounderError) -> Self {
        let code: u8 = match err {
            CompounderError::Io(_) => 1,
            CompounderError::ConfigParse { .. }
            | CompounderError::ConfigMissing { .. }
            | CompounderError::ConfigInvalid { .. } => 2,
            CompounderError::InvalidInput { .. } => 3,
            CompounderError::Upstream { .. }
            | CompounderError::DataSource { .. }
            | CompounderError::Timeout { .. }
            | CompounderError::Cancelled { .. }
            | CompounderError::Stale { .. } => 4,
            CompounderError::Auth(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
