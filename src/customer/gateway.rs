//! Remote customer accounts.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    cart::{ValidationError, ids::TypedId},
    customer::token::AccessToken,
    gateway::GatewayError,
};

/// Customer identifier, assigned by the commerce platform.
pub type CustomerId = TypedId<Customer>;

/// A signed-in customer's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// The platform's id for the customer.
    pub id: CustomerId,

    /// Sign-in email.
    pub email: String,

    /// Given name, when the customer set one.
    pub first_name: Option<String>,

    /// Family name, when the customer set one.
    pub last_name: Option<String>,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Whether the customer opted into marketing email.
    pub accepts_marketing: bool,
}

impl Customer {
    /// Full name, or the email when no name is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            return self.email.clone();
        }

        name
    }
}

/// Email and password for signing in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validate sign-in input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCredentials`] when either part is blank.
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::EmptyCredentials);
        }

        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// The sign-in email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The password, as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Customer account operations on the commerce platform.
#[automock]
#[async_trait]
pub trait CustomerGateway: Send + Sync {
    /// Exchange credentials for an access token.
    ///
    /// Wrong credentials are a [`GatewayError::Rejected`].
    async fn create_token(&self, credentials: &Credentials) -> Result<AccessToken, GatewayError>;

    /// The customer a token belongs to, or `None` when the platform no
    /// longer accepts the token.
    async fn fetch_customer(&self, token: &AccessToken) -> Result<Option<Customer>, GatewayError>;

    /// Invalidate a token on the platform.
    async fn delete_token(&self, token: &AccessToken) -> Result<(), GatewayError>;
}
