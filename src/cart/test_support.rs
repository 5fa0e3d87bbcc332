use rust_decimal::Decimal;
use rusty_money::iso::ILS;

use crate::cart::{
    ValidationError,
    ids::{CartId, LineId, MerchandiseId},
    models::{CartSnapshot, LineItem, Quantity},
    price::Price,
};

pub(crate) fn ils(minor: i64) -> Price {
    Price::new(Decimal::new(minor, 2), ILS)
}

pub(crate) fn line(line_id: &str, merchandise: &str, quantity: u32) -> Result<LineItem, ValidationError> {
    Ok(LineItem {
        line_id: LineId::new(line_id)?,
        merchandise_id: MerchandiseId::new(merchandise)?,
        quantity: Quantity::new(quantity)?,
        unit_price: ils(45_00),
        line_total: ils(45_00 * i64::from(quantity)),
        title: "750ml".to_string(),
        product_title: "Olive Oil".to_string(),
        product_handle: "olive-oil".to_string(),
    })
}

pub(crate) fn snapshot(cart_id: &str, lines: Vec<LineItem>) -> Result<CartSnapshot, ValidationError> {
    let total_quantity = lines.iter().map(|line| line.quantity.get()).sum();
    let total: Decimal = lines.iter().map(|line| line.line_total.amount()).sum();

    Ok(CartSnapshot {
        cart_id: CartId::new(cart_id)?,
        lines,
        total_quantity,
        subtotal: Price::new(total, ILS),
        total: Price::new(total, ILS),
        checkout_url: format!("https://loza.example/cart/c/{cart_id}?key=secret"),
    })
}
