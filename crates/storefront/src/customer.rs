//! Storefront customer gateway.

use async_trait::async_trait;
use jiff::Timestamp;
use loza::{
    customer::{AccessToken, Credentials, Customer, CustomerGateway, CustomerId},
    gateway::{GatewayError, UserError},
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{StorefrontGateway, errors::StorefrontError, queries, wire::WireUserError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenCreateData {
    customer_access_token_create: Option<TokenCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenCreatePayload {
    customer_access_token: Option<WireAccessToken>,

    #[serde(default)]
    customer_user_errors: Vec<WireUserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAccessToken {
    access_token: String,
    expires_at: String,
}

#[derive(Debug, Deserialize)]
struct CustomerQueryData {
    customer: Option<WireCustomer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCustomer {
    id: String,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,

    #[serde(default)]
    accepts_marketing: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenDeleteData {
    customer_access_token_delete: Option<TokenDeletePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenDeletePayload {
    #[serde(default)]
    user_errors: Vec<WireUserError>,
}

fn rejected(errors: Vec<WireUserError>) -> StorefrontError {
    StorefrontError::UserErrors(errors.into_iter().map(UserError::from).collect())
}

impl TryFrom<WireAccessToken> for AccessToken {
    type Error = StorefrontError;

    fn try_from(token: WireAccessToken) -> Result<Self, Self::Error> {
        let expires_at: Timestamp = token.expires_at.parse().map_err(|error| {
            StorefrontError::Malformed(format!("expiresAt {:?}: {error}", token.expires_at))
        })?;

        Ok(AccessToken::new(token.access_token, expires_at))
    }
}

impl TryFrom<WireCustomer> for Customer {
    type Error = StorefrontError;

    fn try_from(customer: WireCustomer) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: CustomerId::new(customer.id)?,
            email: customer.email.unwrap_or_default(),
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone: customer.phone,
            accepts_marketing: customer.accepts_marketing,
        })
    }
}

impl TokenCreatePayload {
    fn into_token(self) -> Result<AccessToken, StorefrontError> {
        if !self.customer_user_errors.is_empty() {
            return Err(rejected(self.customer_user_errors));
        }

        self.customer_access_token
            .ok_or_else(|| StorefrontError::Malformed("customerAccessToken missing".to_string()))?
            .try_into()
    }
}

#[async_trait]
impl CustomerGateway for StorefrontGateway {
    async fn create_token(&self, credentials: &Credentials) -> Result<AccessToken, GatewayError> {
        let variables = json!({
            "input": { "email": credentials.email(), "password": credentials.password() },
        });

        let data: TokenCreateData = self
            .client()
            .execute(
                "customerAccessTokenCreate",
                queries::CUSTOMER_ACCESS_TOKEN_CREATE,
                variables,
            )
            .await?;

        let token = data
            .customer_access_token_create
            .ok_or_else(|| {
                StorefrontError::Malformed("customerAccessTokenCreate payload missing".to_string())
            })?
            .into_token()?;

        debug!(expires_at = %token.expires_at(), "customer access token created");

        Ok(token)
    }

    async fn fetch_customer(&self, token: &AccessToken) -> Result<Option<Customer>, GatewayError> {
        let variables = json!({ "customerAccessToken": token.secret() });

        let data: CustomerQueryData = self
            .client()
            .execute("customer", queries::CUSTOMER_QUERY, variables)
            .await?;

        let Some(customer) = data.customer else {
            return Ok(None);
        };

        Ok(Some(Customer::try_from(customer)?))
    }

    async fn delete_token(&self, token: &AccessToken) -> Result<(), GatewayError> {
        let variables = json!({ "customerAccessToken": token.secret() });

        let data: TokenDeleteData = self
            .client()
            .execute(
                "customerAccessTokenDelete",
                queries::CUSTOMER_ACCESS_TOKEN_DELETE,
                variables,
            )
            .await?;

        let payload = data.customer_access_token_delete.ok_or_else(|| {
            StorefrontError::Malformed("customerAccessTokenDelete payload missing".to_string())
        })?;

        if !payload.user_errors.is_empty() {
            return Err(rejected(payload.user_errors).into());
        }

        Ok(())
    }
}
