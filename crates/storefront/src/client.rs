//! Storefront GraphQL client.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::{config::StorefrontConfig, errors::StorefrontError, wire::GraphQlResponse};

/// Header carrying the public Storefront access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// HTTP client for the Storefront GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    config: StorefrontConfig,
    http: Client,
}

impl StorefrontClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    /// The settings this client was built with.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Run a GraphQL document and decode its `data`.
    ///
    /// # Errors
    ///
    /// Returns an error on HTTP failure, a non-2xx status, top-level GraphQL
    /// errors or a response without `data`.
    pub(crate) async fn execute<T>(
        &self,
        operation: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, StorefrontError>
    where
        T: DeserializeOwned,
    {
        debug!(operation, endpoint = %self.config.endpoint, "storefront request");

        let body = json!({ "query": query, "variables": variables });

        let response = self
            .http
            .post(&self.config.endpoint)
            .header(ACCESS_TOKEN_HEADER, &self.config.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|error| self.classify(error))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(StorefrontError::Status { status, body });
        }

        let parsed: GraphQlResponse<T> = response
            .json()
            .await
            .map_err(|error| self.classify(error))?;

        if !parsed.errors.is_empty() {
            let messages: Vec<String> = parsed.errors.into_iter().map(|error| error.message).collect();

            warn!(operation, ?messages, "storefront api returned errors");

            return Err(StorefrontError::GraphQl(messages));
        }

        parsed.data.ok_or_else(|| {
            StorefrontError::Malformed(format!("{operation} response carried no data"))
        })
    }

    fn classify(&self, error: reqwest::Error) -> StorefrontError {
        if error.is_timeout() {
            return StorefrontError::Timeout(self.config.timeout);
        }

        StorefrontError::Http(error)
    }
}
