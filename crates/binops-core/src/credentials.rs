//! Bearer-token source for backend requests.
//!
//! The client never reads persisted storage itself; whoever constructs it
//! injects a [`CredentialProvider`].

/// Supplies the bearer token attached to each backend request.
pub trait CredentialProvider: Send + Sync {
    /// Returns the current token, or `None` to send the request unauthenticated.
    fn token(&self) -> Option<String>;
}

/// A fixed token, typically read once from configuration.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken([redacted])")
    }
}

impl CredentialProvider for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn token(&self) -> Option<String> {
        None
    }
}
