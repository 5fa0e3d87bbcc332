//! Cart Models

use std::{fmt, num::NonZeroU32};

use crate::cart::{
    errors::ValidationError,
    ids::{CartId, LineId, MerchandiseId},
    price::Price,
};

/// A line quantity; always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// Validate a raw quantity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroQuantity`] for zero.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(ValidationError::ZeroQuantity)
    }

    /// The raw quantity.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Quantity {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One entry in a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// The line's own id, used to update or remove it.
    pub line_id: LineId,

    /// The product variant on this line.
    pub merchandise_id: MerchandiseId,

    /// How many units are on the line.
    pub quantity: Quantity,

    /// Price of one unit.
    pub unit_price: Price,

    /// Server-computed price of the whole line.
    pub line_total: Price,

    /// Variant title, e.g. `"750ml"`.
    pub title: String,

    /// Title of the product the variant belongs to.
    pub product_title: String,

    /// URL handle of the product.
    pub product_handle: String,
}

/// Complete state of a remote cart at a point in time.
///
/// A snapshot always replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// The remote cart.
    pub cart_id: CartId,

    /// Lines in the order the platform returned them.
    pub lines: Vec<LineItem>,

    /// Server-computed item count.
    pub total_quantity: u32,

    /// Total before taxes and shipping.
    pub subtotal: Price,

    /// Amount due.
    pub total: Price,

    /// Hosted checkout page for this cart.
    pub checkout_url: String,
}

impl CartSnapshot {
    /// Sum of line quantities, as derived from `lines`.
    #[must_use]
    pub fn line_quantity_sum(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Whether the server-computed total agrees with the lines.
    #[must_use]
    pub fn quantities_consistent(&self) -> bool {
        u64::from(self.total_quantity) == self.line_quantity_sum()
    }

    /// Find a line by id.
    #[must_use]
    pub fn line(&self, line_id: &LineId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.line_id == *line_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
