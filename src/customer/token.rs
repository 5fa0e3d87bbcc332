//! Customer access tokens.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use tracing::warn;

use crate::identity::{IdentityStoreError, KeyValueStore, MemoryStore};

/// Key under which the customer access token is stored.
pub const CUSTOMER_TOKEN_KEY: &str = "shopify_customer_token";

/// Key under which the token's expiry is stored, as RFC 3339.
pub const CUSTOMER_TOKEN_EXPIRY_KEY: &str = "shopify_customer_token_expiry";

/// A customer access token and the instant it stops working.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_at: Timestamp,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    /// Wrap a token issued by the platform.
    pub fn new(secret: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            secret: secret.into(),
            expires_at,
        }
    }

    /// The raw token, as sent back to the platform.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// When the token stops working.
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Whether the token is no longer valid at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Whether the token is no longer valid.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }
}

/// The stored customer token.
///
/// Token and expiry live under two keys of the same substrate the cart id
/// uses; a token without a readable expiry is treated as absent.
#[derive(Clone)]
pub struct TokenStore {
    substrate: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("keys", &[CUSTOMER_TOKEN_KEY, CUSTOMER_TOKEN_EXPIRY_KEY])
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Keep the customer token in `substrate`.
    pub fn new(substrate: Arc<dyn KeyValueStore>) -> Self {
        Self { substrate }
    }

    /// A token store backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The stored token, expired or not.
    ///
    /// Never fails: unreadable storage or a malformed entry reads as "signed out".
    pub fn read(&self) -> Option<AccessToken> {
        let secret = self.get(CUSTOMER_TOKEN_KEY)?;
        let expiry = self.get(CUSTOMER_TOKEN_EXPIRY_KEY)?;

        match expiry.parse::<Timestamp>() {
            Ok(expires_at) => Some(AccessToken::new(secret, expires_at)),
            Err(error) => {
                warn!("ignoring stored customer token with unreadable expiry: {error}");

                None
            }
        }
    }

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns the substrate error when either key could not be written.
    pub fn write(&self, token: &AccessToken) -> Result<(), IdentityStoreError> {
        self.substrate.set(CUSTOMER_TOKEN_KEY, token.secret())?;
        self.substrate
            .set(CUSTOMER_TOKEN_EXPIRY_KEY, &token.expires_at().to_string())
    }

    /// Forget the stored token. Both keys are removed even if one fails.
    ///
    /// # Errors
    ///
    /// Returns the first substrate error.
    pub fn clear(&self) -> Result<(), IdentityStoreError> {
        let token = self.substrate.remove(CUSTOMER_TOKEN_KEY);
        let expiry = self.substrate.remove(CUSTOMER_TOKEN_EXPIRY_KEY);

        token.and(expiry)
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.substrate.get(key) {
            Ok(value) => value.filter(|value| !value.trim().is_empty()),
            Err(error) => {
                warn!(key, "failed to read stored customer token: {error}");

                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use testresult::TestResult;

    use crate::identity::MockKeyValueStore;

    use super::*;

    fn token(expires_at: &str) -> TestResult<AccessToken> {
        Ok(AccessToken::new("secret-token", expires_at.parse()?))
    }

    #[test]
    fn write_then_read_returns_token() -> TestResult {
        let store = TokenStore::in_memory();
        let token = token("2031-05-01T10:00:00Z")?;

        store.write(&token)?;

        assert_eq!(store.read(), Some(token));

        Ok(())
    }

    #[test]
    fn token_without_expiry_reads_none() -> TestResult {
        let substrate = Arc::new(MemoryStore::new());
        substrate.set(CUSTOMER_TOKEN_KEY, "secret-token")?;

        assert!(TokenStore::new(substrate).read().is_none());

        Ok(())
    }

    #[test]
    fn unreadable_expiry_reads_none() -> TestResult {
        let substrate = Arc::new(MemoryStore::new());
        substrate.set(CUSTOMER_TOKEN_KEY, "secret-token")?;
        substrate.set(CUSTOMER_TOKEN_EXPIRY_KEY, "next tuesday")?;

        assert!(TokenStore::new(substrate).read().is_none());

        Ok(())
    }

    #[test]
    fn clear_removes_both_keys() -> TestResult {
        let substrate = Arc::new(MemoryStore::new());
        let store = TokenStore::new(substrate.clone());

        store.write(&token("2031-05-01T10:00:00Z")?)?;
        store.clear()?;

        assert_eq!(substrate.get(CUSTOMER_TOKEN_KEY)?, None);
        assert_eq!(substrate.get(CUSTOMER_TOKEN_EXPIRY_KEY)?, None);

        Ok(())
    }

    #[test]
    fn clear_attempts_expiry_after_token_failure() {
        let mut substrate = MockKeyValueStore::new();

        substrate
            .expect_remove()
            .once()
            .withf(|key| key == CUSTOMER_TOKEN_KEY)
            .returning(|_| Err(io::Error::other("read-only").into()));
        substrate
            .expect_remove()
            .once()
            .withf(|key| key == CUSTOMER_TOKEN_EXPIRY_KEY)
            .returning(|_| Ok(()));

        let result = TokenStore::new(Arc::new(substrate)).clear();

        assert!(matches!(result, Err(IdentityStoreError::Io(_))));
    }

    #[test]
    fn expiry_is_inclusive() -> TestResult {
        let token = token("2030-01-01T00:00:00Z")?;

        assert!(token.is_expired_at("2030-01-01T00:00:00Z".parse()?));
        assert!(!token.is_expired_at("2029-12-31T23:59:59Z".parse()?));

        Ok(())
    }

    #[test]
    fn debug_hides_the_secret() -> TestResult {
        let rendered = format!("{:?}", token("2030-01-01T00:00:00Z")?);

        assert!(!rendered.contains("secret-token"), "{rendered}");

        Ok(())
    }
}
