//! Storefront cart gateway.

use async_trait::async_trait;
use loza::{
    cart::{CartId, CartSnapshot, LineId, MerchandiseId, Quantity},
    gateway::{CartGateway, GatewayError},
};
use serde_json::json;
use tracing::debug;

use crate::{
    client::StorefrontClient,
    errors::StorefrontError,
    queries,
    wire::{CartMutationData, CartQueryData},
};

/// [`CartGateway`] backed by the Storefront API.
#[derive(Debug, Clone)]
pub struct StorefrontGateway {
    client: StorefrontClient,
}

impl StorefrontGateway {
    /// Route cart calls through `client`.
    pub fn new(client: StorefrontClient) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &StorefrontClient {
        &self.client
    }

    async fn mutate(
        &self,
        operation: &str,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<CartSnapshot, StorefrontError> {
        let data: CartMutationData = self.client().execute(operation, document, variables).await?;

        let cart = data
            .payload
            .ok_or_else(|| StorefrontError::Malformed(format!("{operation} payload missing")))?
            .into_cart()?;

        let snapshot = CartSnapshot::try_from(cart)?;

        debug!(
            operation,
            cart_id = %snapshot.cart_id,
            total_quantity = snapshot.total_quantity,
            "storefront cart updated"
        );

        Ok(snapshot)
    }
}

#[async_trait]
impl CartGateway for StorefrontGateway {
    async fn create_cart(&self) -> Result<CartSnapshot, GatewayError> {
        let variables = json!({ "input": {} });

        Ok(self
            .mutate("cartCreate", queries::CART_CREATE, variables)
            .await?)
    }

    async fn fetch_cart(&self, cart: &CartId) -> Result<CartSnapshot, GatewayError> {
        let variables = json!({ "cartId": cart.as_str() });

        let data: CartQueryData = self
            .client
            .execute("cart", queries::CART_QUERY, variables)
            .await?;

        let cart = data.cart.ok_or(StorefrontError::CartNotFound)?;

        Ok(CartSnapshot::try_from(cart)?)
    }

    async fn add_line(
        &self,
        cart: &CartId,
        merchandise: &MerchandiseId,
        quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError> {
        let variables = json!({
            "cartId": cart.as_str(),
            "lines": [{ "merchandiseId": merchandise.as_str(), "quantity": quantity.get() }],
        });

        Ok(self
            .mutate("cartLinesAdd", queries::CART_LINES_ADD, variables)
            .await?)
    }

    async fn update_line_quantity(
        &self,
        cart: &CartId,
        line: &LineId,
        quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError> {
        let variables = json!({
            "cartId": cart.as_str(),
            "lines": [{ "id": line.as_str(), "quantity": quantity.get() }],
        });

        Ok(self
            .mutate("cartLinesUpdate", queries::CART_LINES_UPDATE, variables)
            .await?)
    }

    async fn remove_line(&self, cart: &CartId, line: &LineId) -> Result<CartSnapshot, GatewayError> {
        let variables = json!({
            "cartId": cart.as_str(),
            "lineIds": [line.as_str()],
        });

        Ok(self
            .mutate("cartLinesRemove", queries::CART_LINES_REMOVE, variables)
            .await?)
    }
}
