//! Cart session manager.

use std::{
    fmt,
    future::Future,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::{
    sync::{Mutex as AsyncMutex, watch},
    time,
};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    cart::{
        CartId, CartSnapshot, LineId, MerchandiseId, Quantity,
        checkout::{self, CheckoutUrlError},
    },
    gateway::{CartGateway, GatewayError},
    i18n::Locale,
    identity::IdentityStore,
    session::{
        config::SessionConfig,
        errors::{MutationOutcome, SessionError},
        observer::{NoopObserver, Operation, SessionEvent, SessionObserver},
        state::SessionState,
    },
};

#[derive(Debug, Clone, Copy)]
enum LineChange {
    SetQuantity(Quantity),
    Remove,
}

impl LineChange {
    fn operation(self) -> Operation {
        match self {
            LineChange::SetQuantity(_) => Operation::UpdateLine,
            LineChange::Remove => Operation::RemoveLine,
        }
    }
}

/// Owns the local reference to a remote cart and reconciles user intent with it.
///
/// Mutations are serialized: one submitted while another is in flight waits
/// its turn, so the final snapshot belongs to the last-submitted call. Every
/// gateway call is bounded by [`SessionConfig::call_timeout`].
pub struct CartSession {
    gateway: Arc<dyn CartGateway>,
    identity: IdentityStore,
    observer: Arc<dyn SessionObserver>,
    config: SessionConfig,
    state: watch::Sender<SessionState>,
    cart_id: Mutex<Option<CartId>>,
    turns: AsyncMutex<()>,
    closed: AtomicBool,
}

impl fmt::Debug for CartSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSession")
            .field("state", &*self.state.borrow())
            .field("cart_id", &self.current_cart_id())
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// A session with the default timeout and no observer.
    pub fn new(gateway: Arc<dyn CartGateway>, identity: IdentityStore) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);

        Self {
            gateway,
            identity,
            observer: Arc::new(NoopObserver),
            config: SessionConfig::default(),
            state,
            cart_id: Mutex::new(None),
            turns: AsyncMutex::new(()),
            closed: AtomicBool::new(false),
        }
    }

    /// Report session events to `observer`.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replace the session configuration.
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// A copy of the current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The snapshot to display: the loaded cart, or the last good one while
    /// a call is pending or after a failure.
    pub fn current_snapshot(&self) -> Option<Arc<CartSnapshot>> {
        self.state.borrow().snapshot().cloned()
    }

    /// Whether a call is in flight.
    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }

    /// The remote cart this session points at, if any.
    pub fn cart_id(&self) -> Option<CartId> {
        self.current_cart_id()
    }

    /// Checkout URL of the current cart with the `locale` parameter set.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform handed back an unparseable URL.
    pub fn checkout_url(&self, locale: Locale) -> Result<Option<Url>, CheckoutUrlError> {
        self.current_snapshot()
            .map(|snapshot| checkout::with_locale(&snapshot.checkout_url, locale))
            .transpose()
    }

    /// Load the stored cart, if there is one.
    ///
    /// Does nothing once the session has started. A stored id the platform
    /// no longer knows is cleared and the session becomes empty.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure, which also becomes the session state.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SessionError> {
        self.ensure_open()?;
        let _turn = self.turns.lock().await;

        if !self.is_uninitialized() {
            return Ok(());
        }

        self.adopt_stored_id();
        self.load().await
    }

    /// Refetch the current cart.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure, which also becomes the session state.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), SessionError> {
        self.ensure_open()?;
        let _turn = self.turns.lock().await;

        if self.is_uninitialized() {
            self.adopt_stored_id();
        }

        self.load().await
    }

    /// Add merchandise to the cart, creating a cart first when needed.
    ///
    /// A stored cart that died remotely is replaced transparently: the id is
    /// cleared, a new cart is created and the line is added there.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Validation`]: blank merchandise id or zero quantity.
    /// - [`SessionError::Gateway`]: a call failed, including the recovery.
    /// - [`SessionError::Closed`]: the session was closed.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        merchandise: &str,
        quantity: u32,
    ) -> Result<MutationOutcome, SessionError> {
        let merchandise = MerchandiseId::new(merchandise)?;
        let quantity = Quantity::new(quantity)?;

        self.ensure_open()?;
        let _turn = self.turns.lock().await;
        self.ensure_open()?;

        if self.is_uninitialized() {
            self.adopt_stored_id();
        }

        let previous = self.begin_mutation()?;

        match self.add_with_recovery(&merchandise, quantity).await {
            Ok(snapshot) => self.applied(Operation::AddLine, snapshot),
            Err(error) => Err(self.failed(error, previous)),
        }
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Validation`]: blank line id.
    /// - [`SessionError::NoCart`]: no cart is loaded.
    /// - [`SessionError::Gateway`]: the call failed.
    /// - [`SessionError::Closed`]: the session was closed.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        line: &str,
        quantity: u32,
    ) -> Result<MutationOutcome, SessionError> {
        let line = LineId::new(line)?;

        let change = match quantity {
            0 => LineChange::Remove,
            quantity => LineChange::SetQuantity(Quantity::new(quantity)?),
        };

        self.change_line(line, change).await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Same as [`CartSession::update_quantity`].
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, line: &str) -> Result<MutationOutcome, SessionError> {
        let line = LineId::new(line)?;

        self.change_line(line, LineChange::Remove).await
    }

    /// Drop the cart id from the session and the identity store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session was closed.
    pub async fn forget(&self) -> Result<(), SessionError> {
        self.ensure_open()?;
        let _turn = self.turns.lock().await;
        self.ensure_open()?;

        if let Some(cart) = self.current_cart_id() {
            debug!(%cart, "forgetting cart");
        }

        self.drop_cart_id();
        self.apply(SessionState::Empty)
    }

    /// Stop applying results. Calls in flight finish without touching state
    /// or the identity store; later calls fail with [`SessionError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Whether [`CartSession::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn load(&self) -> Result<(), SessionError> {
        let Some(cart) = self.current_cart_id() else {
            return self.apply(SessionState::Empty);
        };

        let previous = self.current_snapshot();

        self.apply(SessionState::Loading {
            cart_id: cart.clone(),
        })?;

        let result = self.call(self.gateway.fetch_cart(&cart)).await;

        self.ensure_open()?;

        match result {
            Ok(snapshot) => {
                self.observe(&SessionEvent::Loaded {
                    cart_id: snapshot.cart_id.clone(),
                    total_quantity: snapshot.total_quantity,
                });

                self.apply(SessionState::Ready {
                    snapshot: Arc::new(snapshot),
                })
            }
            Err(error) if error.is_not_found() => {
                self.drop_cart_id();
                self.observe(&SessionEvent::StaleCartDiscarded { cart_id: cart });

                self.apply(SessionState::Empty)
            }
            Err(error) => {
                let error = self.report(Operation::FetchCart, error);

                Err(self.failed(error, previous))
            }
        }
    }

    async fn add_with_recovery(
        &self,
        merchandise: &MerchandiseId,
        quantity: Quantity,
    ) -> Result<CartSnapshot, SessionError> {
        if let Some(cart) = self.current_cart_id() {
            match self
                .call(self.gateway.add_line(&cart, merchandise, quantity))
                .await
            {
                Ok(snapshot) => return Ok(snapshot),
                Err(GatewayError::CartNotFound) => {
                    self.ensure_open()?;
                    self.drop_cart_id();
                    self.observe(&SessionEvent::StaleCartDiscarded { cart_id: cart });
                }
                Err(error) => return Err(self.report(Operation::AddLine, error)),
            }
        }

        let cart = self.create_cart().await?;

        self.call(self.gateway.add_line(&cart, merchandise, quantity))
            .await
            .map_err(|error| self.report(Operation::AddLine, error))
    }

    async fn create_cart(&self) -> Result<CartId, SessionError> {
        let created = self
            .call(self.gateway.create_cart())
            .await
            .map_err(|error| self.report(Operation::CreateCart, error))?;

        self.ensure_open()?;

        let cart = created.cart_id;

        if let Err(error) = self.identity.write(&cart) {
            self.observe(&SessionEvent::IdentityWriteFailed {
                error: error.to_string(),
            });
        }

        self.set_cart_id(Some(cart.clone()));
        self.observe(&SessionEvent::CartCreated {
            cart_id: cart.clone(),
        });

        Ok(cart)
    }

    async fn change_line(
        &self,
        line: LineId,
        change: LineChange,
    ) -> Result<MutationOutcome, SessionError> {
        self.ensure_open()?;
        let _turn = self.turns.lock().await;
        self.ensure_open()?;

        let Some(current) = self.current_snapshot() else {
            return Err(SessionError::NoCart);
        };

        let operation = change.operation();
        let previous = self.begin_mutation()?;

        // The displayed snapshot can outlive its cart when a recovery created
        // a replacement but failed to add to it.
        let cart = match self.current_cart_id() {
            Some(cart) if cart == current.cart_id => cart,
            Some(cart) => {
                self.observe(&SessionEvent::LineAlreadyGone {
                    cart_id: cart.clone(),
                    line_id: line,
                });

                return self.reconcile(operation, cart, previous).await;
            }
            None => return self.expire(operation, current.cart_id.clone()),
        };

        let result = match change {
            LineChange::SetQuantity(quantity) => {
                self.call(self.gateway.update_line_quantity(&cart, &line, quantity))
                    .await
            }
            LineChange::Remove => self.call(self.gateway.remove_line(&cart, &line)).await,
        };

        self.ensure_open()?;

        match result {
            Ok(snapshot) => self.applied(operation, snapshot),
            Err(GatewayError::CartNotFound) => self.expire(operation, cart),
            Err(GatewayError::LineNotFound) => {
                self.observe(&SessionEvent::LineAlreadyGone {
                    cart_id: cart.clone(),
                    line_id: line,
                });

                self.reconcile(operation, cart, previous).await
            }
            Err(error) => {
                let error = self.report(operation, error);

                Err(self.failed(error, previous))
            }
        }
    }

    /// Replace a stale mutation with the cart as it now stands.
    async fn reconcile(
        &self,
        operation: Operation,
        cart: CartId,
        previous: Option<Arc<CartSnapshot>>,
    ) -> Result<MutationOutcome, SessionError> {
        let result = self.call(self.gateway.fetch_cart(&cart)).await;

        self.ensure_open()?;

        match result {
            Ok(snapshot) => {
                self.apply(SessionState::Ready {
                    snapshot: Arc::new(snapshot),
                })?;

                Ok(MutationOutcome::AlreadySatisfied)
            }
            Err(error) if error.is_not_found() => self.expire(operation, cart),
            Err(error) => {
                let error = self.report(Operation::FetchCart, error);

                Err(self.failed(error, previous))
            }
        }
    }

    fn expire(&self, operation: Operation, cart: CartId) -> Result<MutationOutcome, SessionError> {
        self.drop_cart_id();
        self.observe(&SessionEvent::CartExpired {
            operation,
            cart_id: cart,
        });
        self.apply(SessionState::Empty)?;

        Ok(MutationOutcome::CartExpired)
    }

    fn applied(
        &self,
        operation: Operation,
        snapshot: CartSnapshot,
    ) -> Result<MutationOutcome, SessionError> {
        self.ensure_open()?;

        self.observe(&SessionEvent::MutationApplied {
            operation,
            cart_id: snapshot.cart_id.clone(),
            total_quantity: snapshot.total_quantity,
        });

        self.apply(SessionState::Ready {
            snapshot: Arc::new(snapshot),
        })?;

        Ok(MutationOutcome::Applied)
    }

    fn failed(&self, error: SessionError, last_good: Option<Arc<CartSnapshot>>) -> SessionError {
        if error == SessionError::Closed {
            return error;
        }

        match self.apply(SessionState::Error {
            reason: error.clone(),
            last_good,
        }) {
            Ok(()) => error,
            Err(closed) => closed,
        }
    }

    fn report(&self, operation: Operation, error: GatewayError) -> SessionError {
        self.observe(&SessionEvent::CallFailed {
            operation,
            error: error.clone(),
        });

        SessionError::Gateway(error)
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

    fn begin_mutation(&self) -> Result<Option<Arc<CartSnapshot>>, SessionError> {
        let previous = self.current_snapshot();

        self.apply(SessionState::Mutating {
            snapshot: previous.clone(),
        })?;

        Ok(previous)
    }

    fn apply(&self, state: SessionState) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.state.send_replace(state);

        Ok(())
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }

        Ok(())
    }

    fn is_uninitialized(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Uninitialized)
    }

    fn adopt_stored_id(&self) {
        self.set_cart_id(self.identity.read());
    }

    fn drop_cart_id(&self) {
        if let Err(error) = self.identity.clear() {
            self.observe(&SessionEvent::IdentityWriteFailed {
                error: error.to_string(),
            });
        }

        self.set_cart_id(None);
    }

    fn current_cart_id(&self) -> Option<CartId> {
        self.cart_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_cart_id(&self, cart: Option<CartId>) {
        *self.cart_id.lock().unwrap_or_else(PoisonError::into_inner) = cart;
    }

    fn observe(&self, event: &SessionEvent) {
        self.observer.on_event(event);
    }
}
