//! Storefront API wire types.

use loza::{
    cart::{CartId, CartSnapshot, LineId, LineItem, MerchandiseId, Price, Quantity},
    gateway::UserError,
};
use serde::Deserialize;

use crate::errors::StorefrontError;

/// Error code the API reports for a line id that is not in the cart.
const INVALID_MERCHANDISE_LINE: &str = "INVALID_MERCHANDISE_LINE";

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub(crate) data: Option<T>,

    #[serde(default)]
    pub(crate) errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CartQueryData {
    pub(crate) cart: Option<WireCart>,
}

/// `data` of any cart mutation; each document has a single root field.
#[derive(Debug, Deserialize)]
pub(crate) struct CartMutationData {
    #[serde(
        alias = "cartCreate",
        alias = "cartLinesAdd",
        alias = "cartLinesUpdate",
        alias = "cartLinesRemove"
    )]
    pub(crate) payload: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartPayload {
    cart: Option<WireCart>,

    #[serde(default)]
    user_errors: Vec<WireUserError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUserError {
    code: Option<String>,

    #[serde(default)]
    field: Option<Vec<String>>,

    message: String,
}

impl WireUserError {
    fn path(&self) -> &[String] {
        self.field.as_deref().unwrap_or_default()
    }

    fn names_cart(&self) -> bool {
        self.path().first().is_some_and(|field| field == "cartId")
    }

    fn names_line(&self) -> bool {
        if self.code.as_deref() == Some(INVALID_MERCHANDISE_LINE) {
            return true;
        }

        match self.path() {
            [first, ..] if first == "lineIds" => true,
            [first, .., last] if first == "lines" => last == "id",
            _ => false,
        }
    }
}

impl From<WireUserError> for UserError {
    fn from(error: WireUserError) -> Self {
        Self {
            code: error.code,
            field: error.field.unwrap_or_default(),
            message: error.message,
        }
    }
}

impl CartPayload {
    /// The cart a mutation returned, or the reason it returned none.
    pub(crate) fn into_cart(self) -> Result<WireCart, StorefrontError> {
        if self.user_errors.iter().any(WireUserError::names_cart) {
            return Err(StorefrontError::CartNotFound);
        }

        if self.user_errors.iter().any(WireUserError::names_line) {
            return Err(StorefrontError::LineNotFound);
        }

        if !self.user_errors.is_empty() {
            return Err(StorefrontError::UserErrors(
                self.user_errors.into_iter().map(UserError::from).collect(),
            ));
        }

        self.cart.ok_or(StorefrontError::CartNotFound)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCart {
    id: String,
    checkout_url: String,
    total_quantity: u32,
    lines: Connection<WireLine>,
    cost: WireCartCost,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct WireLine {
    id: String,
    quantity: u32,
    merchandise: WireVariant,
    cost: WireLineCost,
}

#[derive(Debug, Deserialize)]
struct WireVariant {
    id: String,
    title: String,
    price: WireMoney,
    product: WireProduct,
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    handle: String,
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLineCost {
    total_amount: WireMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCartCost {
    subtotal_amount: WireMoney,
    total_amount: WireMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMoney {
    amount: String,
    currency_code: String,
}

impl TryFrom<WireMoney> for Price {
    type Error = StorefrontError;

    fn try_from(money: WireMoney) -> Result<Self, Self::Error> {
        Ok(Price::parse(&money.amount, &money.currency_code)?)
    }
}

impl TryFrom<WireLine> for LineItem {
    type Error = StorefrontError;

    fn try_from(line: WireLine) -> Result<Self, Self::Error> {
        Ok(LineItem {
            line_id: LineId::new(line.id)?,
            merchandise_id: MerchandiseId::new(line.merchandise.id)?,
            quantity: Quantity::new(line.quantity)?,
            unit_price: line.merchandise.price.try_into()?,
            line_total: line.cost.total_amount.try_into()?,
            title: line.merchandise.title,
            product_title: line.merchandise.product.title,
            product_handle: line.merchandise.product.handle,
        })
    }
}

impl TryFrom<WireCart> for CartSnapshot {
    type Error = StorefrontError;

    fn try_from(cart: WireCart) -> Result<Self, Self::Error> {
        let lines = cart
            .lines
            .edges
            .into_iter()
            .map(|edge| LineItem::try_from(edge.node))
            .collect::<Result<Vec<_>, _>>()?;

        let snapshot = CartSnapshot {
            cart_id: CartId::new(cart.id)?,
            lines,
            total_quantity: cart.total_quantity,
            subtotal: cart.cost.subtotal_amount.try_into()?,
            total: cart.cost.total_amount.try_into()?,
            checkout_url: cart.checkout_url,
        };

        if !snapshot.quantities_consistent() {
            return Err(StorefrontError::Malformed(format!(
                "totalQuantity {} does not match line quantities {}",
                snapshot.total_quantity,
                snapshot.line_quantity_sum()
            )));
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn money(amount: &str) -> serde_json::Value {
        json!({ "amount": amount, "currencyCode": "ILS" })
    }

    fn cart_json(total_quantity: u32, quantities: &[u32]) -> serde_json::Value {
        let edges: Vec<_> = quantities
            .iter()
            .enumerate()
            .map(|(index, quantity)| {
                json!({
                    "node": {
                        "id": format!("gid://shopify/CartLine/{index}"),
                        "quantity": quantity,
                        "merchandise": {
                            "id": format!("gid://shopify/ProductVariant/{index}"),
                            "title": "250g",
                            "price": money("32.0"),
                            "product": { "id": "gid://shopify/Product/1", "handle": "tahini", "title": "Tahini" }
                        },
                        "cost": { "totalAmount": money("32.0") }
                    }
                })
            })
            .collect();

        json!({
            "id": "gid://shopify/Cart/c1?key=k",
            "checkoutUrl": "https://loza.myshopify.com/cart/c/c1?key=k",
            "totalQuantity": total_quantity,
            "lines": { "edges": edges },
            "cost": { "subtotalAmount": money("64.0"), "totalAmount": money("64.0") }
        })
    }

    fn payload(value: serde_json::Value) -> Result<CartPayload, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn cart_converts_to_snapshot() -> TestResult {
        let cart: WireCart = serde_json::from_value(cart_json(3, &[1, 2]))?;

        let snapshot = CartSnapshot::try_from(cart)?;

        assert_eq!(snapshot.cart_id, "gid://shopify/Cart/c1?key=k");
        assert_eq!(snapshot.lines.len(), 2);
        assert_eq!(snapshot.total_quantity, 3);
        assert_eq!(snapshot.total, Price::parse("64.00", "ILS")?);

        Ok(())
    }

    #[test]
    fn inconsistent_total_quantity_is_malformed() -> TestResult {
        let cart: WireCart = serde_json::from_value(cart_json(5, &[1, 2]))?;

        let result = CartSnapshot::try_from(cart);

        assert!(
            matches!(result, Err(StorefrontError::Malformed(_))),
            "expected malformed, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn cart_id_user_error_means_cart_not_found() -> TestResult {
        let payload = payload(json!({
            "cart": null,
            "userErrors": [{ "code": "INVALID", "field": ["cartId"], "message": "The specified cart does not exist." }]
        }))?;

        assert!(matches!(payload.into_cart(), Err(StorefrontError::CartNotFound)));

        Ok(())
    }

    #[test]
    fn null_cart_without_errors_means_cart_not_found() -> TestResult {
        let payload = payload(json!({ "cart": null, "userErrors": [] }))?;

        assert!(matches!(payload.into_cart(), Err(StorefrontError::CartNotFound)));

        Ok(())
    }

    #[test]
    fn line_user_errors_mean_line_not_found() -> TestResult {
        for error in [
            json!({ "code": "INVALID_MERCHANDISE_LINE", "field": null, "message": "gone" }),
            json!({ "code": "INVALID", "field": ["lineIds", "0"], "message": "gone" }),
            json!({ "code": "INVALID", "field": ["lines", "0", "id"], "message": "gone" }),
        ] {
            let payload = payload(json!({ "cart": null, "userErrors": [error] }))?;

            assert!(matches!(payload.into_cart(), Err(StorefrontError::LineNotFound)));
        }

        Ok(())
    }

    #[test]
    fn other_user_errors_are_rejections() -> TestResult {
        let payload = payload(json!({
            "cart": null,
            "userErrors": [{ "code": "INVALID", "field": ["lines", "0", "quantity"], "message": "Only 2 items were added" }]
        }))?;

        match payload.into_cart() {
            Err(StorefrontError::UserErrors(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, vec!["lines", "0", "quantity"]);
            }
            other => panic!("expected user errors, got {other:?}"),
        }

        Ok(())
    }
}
