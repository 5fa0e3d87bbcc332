//! Storefront GraphQL documents.
//!
//! Every cart document selects the full cart so each call yields a complete
//! snapshot.

macro_rules! cart_fragment {
    () => {
        r"
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        merchandise {
          ... on ProductVariant {
            id
            title
            price { amount currencyCode }
            product { id handle title }
          }
        }
        cost {
          totalAmount { amount currencyCode }
        }
      }
    }
  }
  cost {
    subtotalAmount { amount currencyCode }
    totalAmount { amount currencyCode }
  }
}
"
    };
}

/// Fetch a cart by id.
pub const CART_QUERY: &str = concat!(
    r"
query cart($cartId: ID!) {
  cart(id: $cartId) { ...CartFields }
}
",
    cart_fragment!()
);

/// Create an empty cart.
pub const CART_CREATE: &str = concat!(
    r"
mutation cartCreate($input: CartInput!) {
  cartCreate(input: $input) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}
",
    cart_fragment!()
);

/// Add merchandise lines.
pub const CART_LINES_ADD: &str = concat!(
    r"
mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}
",
    cart_fragment!()
);

/// Change line quantities.
pub const CART_LINES_UPDATE: &str = concat!(
    r"
mutation cartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}
",
    cart_fragment!()
);

/// Remove lines by id.
pub const CART_LINES_REMOVE: &str = concat!(
    r"
mutation cartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {
    cart { ...CartFields }
    userErrors { code field message }
  }
}
",
    cart_fragment!()
);

/// Exchange an email and password for a customer access token.
pub const CUSTOMER_ACCESS_TOKEN_CREATE: &str = r"
mutation customerAccessTokenCreate($input: CustomerAccessTokenCreateInput!) {
  customerAccessTokenCreate(input: $input) {
    customerAccessToken { accessToken expiresAt }
    customerUserErrors { code field message }
  }
}
";

/// Fetch the customer an access token belongs to.
pub const CUSTOMER_QUERY: &str = r"
query customer($customerAccessToken: String!) {
  customer(customerAccessToken: $customerAccessToken) {
    id
    email
    firstName
    lastName
    phone
    acceptsMarketing
  }
}
";

/// Revoke a customer access token.
pub const CUSTOMER_ACCESS_TOKEN_DELETE: &str = r"
mutation customerAccessTokenDelete($customerAccessToken: String!) {
  customerAccessTokenDelete(customerAccessToken: $customerAccessToken) {
    deletedAccessToken
    userErrors { field message }
  }
}
";
