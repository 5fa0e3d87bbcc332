//! Storefront API Config

use std::{fmt, time::Duration};

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-01";

/// Default bound on a single Storefront request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for one storefront.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// GraphQL endpoint, e.g. `"https://shop.myshopify.com/api/2024-01/graphql.json"`.
    pub endpoint: String,

    /// Public Storefront API access token.
    pub access_token: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Settings for an explicit GraphQL endpoint URL.
    pub fn new(endpoint: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Settings for the GraphQL endpoint of `store_domain`.
    pub fn for_store(
        store_domain: &str,
        api_version: &str,
        access_token: impl Into<String>,
    ) -> Self {
        let domain = store_domain
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/');

        Self::new(
            format!("https://{domain}/api/{api_version}/graphql.json"),
            access_token,
        )
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
