//! Storefront Config

use std::time::Duration;

use clap::Args;
use loza_storefront::{StorefrontConfig, config::DEFAULT_API_VERSION};

/// Shopify Storefront API settings.
#[derive(Debug, Args)]
pub(crate) struct StorefrontArgs {
    /// Shop domain, e.g. `loza.myshopify.com`
    #[arg(long, env = "SHOPIFY_STORE_DOMAIN")]
    pub store_domain: String,

    /// Public Storefront API access token
    #[arg(long, env = "SHOPIFY_STOREFRONT_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Storefront API version
    #[arg(long, env = "SHOPIFY_API_VERSION", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Timeout for a single Storefront call, in seconds
    #[arg(long, env = "SHOPIFY_TIMEOUT_SECONDS", default_value_t = 10u64)]
    pub timeout_seconds: u64,
}

impl StorefrontArgs {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub(crate) fn client_config(&self) -> StorefrontConfig {
        StorefrontConfig::for_store(&self.store_domain, &self.api_version, self.access_token.clone())
            .with_timeout(self.timeout())
    }
}
