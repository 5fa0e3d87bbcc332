//! Customer session.

use std::{
    fmt,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use thiserror::Error;
use tokio::{
    sync::{Mutex as AsyncMutex, watch},
    time,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    cart::ValidationError,
    customer::{
        gateway::{Credentials, Customer, CustomerGateway},
        token::{AccessToken, TokenStore},
    },
    gateway::GatewayError,
    session::SessionConfig,
};

/// Errors surfaced by customer session operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustomerError {
    /// Bad input, rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The commerce platform call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A freshly issued token did not resolve to a customer.
    #[error("access token was not accepted")]
    TokenRejected,
}

/// Where the customer session is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CustomerState {
    /// Not started yet.
    #[default]
    Uninitialized,

    /// No usable token.
    SignedOut,

    /// A token is being issued or resolved.
    Loading,

    /// The customer is known.
    SignedIn {
        /// The loaded profile.
        customer: Arc<Customer>,
    },

    /// The last call failed; the stored token, if any, is kept.
    Error {
        /// The surfaced failure.
        reason: CustomerError,
    },
}

impl CustomerState {
    /// The signed-in customer, if any.
    #[must_use]
    pub fn customer(&self) -> Option<&Arc<Customer>> {
        match self {
            Self::SignedIn { customer } => Some(customer),
            _ => None,
        }
    }
}

/// Mirrors a signed-in customer.
///
/// Only the access token is persisted. An expired token is discarded before
/// any network call, and a token the platform refuses is discarded after one.
pub struct CustomerSession {
    gateway: Arc<dyn CustomerGateway>,
    tokens: TokenStore,
    config: SessionConfig,
    state: watch::Sender<CustomerState>,
    token: Mutex<Option<AccessToken>>,
    turns: AsyncMutex<()>,
}

impl fmt::Debug for CustomerSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerSession")
            .field("state", &*self.state.borrow())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CustomerSession {
    /// A session with the default timeout.
    pub fn new(gateway: Arc<dyn CustomerGateway>, tokens: TokenStore) -> Self {
        let (state, _) = watch::channel(CustomerState::Uninitialized);

        Self {
            gateway,
            tokens,
            config: SessionConfig::default(),
            state,
            token: Mutex::new(None),
            turns: AsyncMutex::new(()),
        }
    }

    /// Replace the session configuration.
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// A copy of the current state.
    pub fn state(&self) -> CustomerState {
        self.state.borrow().clone()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<CustomerState> {
        self.state.subscribe()
    }

    /// The signed-in customer, if any.
    pub fn customer(&self) -> Option<Arc<Customer>> {
        self.state.borrow().customer().cloned()
    }

    /// Resolve the stored token, if there is one.
    ///
    /// Does nothing once the session has started.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; the token is kept for a later retry.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), CustomerError> {
        let _turn = self.turns.lock().await;

        if !matches!(*self.state.borrow(), CustomerState::Uninitialized) {
            return Ok(());
        }

        let Some(token) = self.tokens.read() else {
            self.state.send_replace(CustomerState::SignedOut);

            return Ok(());
        };

        self.set_token(Some(token.clone()));
        self.load(&token).await.map(|_| ())
    }

    /// Sign in and load the customer.
    ///
    /// # Errors
    ///
    /// - [`CustomerError::Validation`]: blank email or password.
    /// - [`CustomerError::Gateway`]: the platform refused or failed the call.
    /// - [`CustomerError::TokenRejected`]: the new token did not resolve.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Arc<Customer>, CustomerError> {
        let credentials = Credentials::new(email, password)?;
        let _turn = self.turns.lock().await;

        self.state.send_replace(CustomerState::Loading);

        let token = match self.call(self.gateway.create_token(&credentials)).await {
            Ok(token) => token,
            Err(error) => return Err(self.failed(error.into())),
        };

        if let Err(error) = self.tokens.write(&token) {
            warn!("failed to persist customer token: {error}");
        }

        self.set_token(Some(token.clone()));

        self.load(&token).await?.ok_or(CustomerError::TokenRejected)
    }

    /// Reload the customer behind the current token.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; the token is kept for a later retry.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Option<Arc<Customer>>, CustomerError> {
        let _turn = self.turns.lock().await;

        let Some(token) = self.current_token() else {
            return Ok(None);
        };

        self.load(&token).await
    }

    /// Sign out locally, revoking the token remotely when possible.
    ///
    /// A failed revocation is logged; the local token is forgotten regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _turn = self.turns.lock().await;

        let token = self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(token) = token
            && let Err(error) = self.call(self.gateway.delete_token(&token)).await
        {
            warn!("failed to revoke customer token: {error}");
        }

        self.discard_token();
        self.state.send_replace(CustomerState::SignedOut);
    }

    async fn load(&self, token: &AccessToken) -> Result<Option<Arc<Customer>>, CustomerError> {
        if token.is_expired() {
            info!(expires_at = %token.expires_at(), "discarding expired customer token");

            return Ok(self.sign_out());
        }

        self.state.send_replace(CustomerState::Loading);

        match self.call(self.gateway.fetch_customer(token)).await {
            Ok(Some(customer)) => {
                let customer = Arc::new(customer);

                debug!(customer = %customer.id, "customer loaded");

                self.state.send_replace(CustomerState::SignedIn {
                    customer: customer.clone(),
                });

                Ok(Some(customer))
            }
            Ok(None) => {
                warn!("customer token was not accepted; signing out");

                Ok(self.sign_out())
            }
            Err(error) => Err(self.failed(error.into())),
        }
    }

    fn sign_out(&self) -> Option<Arc<Customer>> {
        self.discard_token();
        self.state.send_replace(CustomerState::SignedOut);

        None
    }

    fn failed(&self, error: CustomerError) -> CustomerError {
        self.state.send_replace(CustomerState::Error {
            reason: error.clone(),
        });

        error
    }

    async fn call<T, F>(&self, call: F) -> Result<T, GatewayError>
    where
        F: Future<Output = Result<T, GatewayError>>,
    {
        let limit = self.config.call_timeout;

        time::timeout(limit, call)
            .await
            .map_err(|_elapsed| GatewayError::Timeout(limit))?
    }

    fn discard_token(&self) {
        if let Err(error) = self.tokens.clear() {
            warn!("failed to clear stored customer token: {error}");
        }

        self.set_token(None);
    }

    fn current_token(&self) -> Option<AccessToken> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: Option<AccessToken>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }
}
