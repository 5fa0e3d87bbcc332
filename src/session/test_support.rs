use std::{
    future,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use tokio::time;

use crate::{
    cart::{
        CartId, CartSnapshot, LineId, MerchandiseId, Quantity,
        test_support::{line, snapshot},
    },
    gateway::{CartGateway, GatewayError},
    session::observer::{SessionEvent, SessionObserver},
};

/// Keeps every event it sees.
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    events: Mutex<Vec<SessionEvent>>,
}

impl RecordingObserver {
    pub(crate) fn events(&self) -> Vec<SessionEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionObserver for RecordingObserver {
    fn on_event(&self, event: &SessionEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Answers after a configurable delay.
///
/// The nth `add_line` call sleeps for the nth configured delay and returns a
/// single line whose quantity is the one requested, so the snapshot left
/// behind shows which call was applied last.
#[derive(Debug, Default)]
pub(crate) struct DelayedGateway {
    add_delays: Mutex<Vec<Duration>>,
    create_delay: Duration,
}

impl DelayedGateway {
    pub(crate) fn with_add_delays(mut delays: Vec<Duration>) -> Self {
        delays.reverse();

        Self {
            add_delays: Mutex::new(delays),
            create_delay: Duration::ZERO,
        }
    }

    pub(crate) fn with_create_delay(delay: Duration) -> Self {
        Self {
            add_delays: Mutex::default(),
            create_delay: delay,
        }
    }

    fn next_add_delay(&self) -> Duration {
        self.add_delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default()
    }
}

fn unexpected(error: impl ToString) -> GatewayError {
    GatewayError::UnexpectedResponse(error.to_string())
}

#[async_trait]
impl CartGateway for DelayedGateway {
    async fn create_cart(&self) -> Result<CartSnapshot, GatewayError> {
        time::sleep(self.create_delay).await;

        snapshot("cart_delayed", vec![]).map_err(unexpected)
    }

    async fn fetch_cart(&self, cart: &CartId) -> Result<CartSnapshot, GatewayError> {
        snapshot(cart.as_str(), vec![]).map_err(unexpected)
    }

    async fn add_line(
        &self,
        cart: &CartId,
        merchandise: &MerchandiseId,
        quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError> {
        time::sleep(self.next_add_delay()).await;

        let added = line("line_1", merchandise.as_str(), quantity.get()).map_err(unexpected)?;

        snapshot(cart.as_str(), vec![added]).map_err(unexpected)
    }

    async fn update_line_quantity(
        &self,
        cart: &CartId,
        line_id: &LineId,
        quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError> {
        let updated = line(line_id.as_str(), "v1", quantity.get()).map_err(unexpected)?;

        snapshot(cart.as_str(), vec![updated]).map_err(unexpected)
    }

    async fn remove_line(
        &self,
        cart: &CartId,
        _line: &LineId,
    ) -> Result<CartSnapshot, GatewayError> {
        snapshot(cart.as_str(), vec![]).map_err(unexpected)
    }
}

/// Never answers.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct StalledGateway;

#[async_trait]
impl CartGateway for StalledGateway {
    async fn create_cart(&self) -> Result<CartSnapshot, GatewayError> {
        future::pending().await
    }

    async fn fetch_cart(&self, _cart: &CartId) -> Result<CartSnapshot, GatewayError> {
        future::pending().await
    }

    async fn add_line(
        &self,
        _cart: &CartId,
        _merchandise: &MerchandiseId,
        _quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError> {
        future::pending().await
    }

    async fn update_line_quantity(
        &self,
        _cart: &CartId,
        _line: &LineId,
        _quantity: Quantity,
    ) -> Result<CartSnapshot, GatewayError> {
        future::pending().await
    }

    async fn remove_line(
        &self,
        _cart: &CartId,
        _line: &LineId,
    ) -> Result<CartSnapshot, GatewayError> {
        future::pending().await
    }
}
