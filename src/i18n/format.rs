//! Price formatting

use rusty_money::{Formatter, LocalFormat, Money, Params, Position};

use crate::{
    cart::Price,
    i18n::{Direction, Locale},
};

const SYMBOL_TRAILING: &[Position] = &[
    Position::Sign,
    Position::Amount,
    Position::Space,
    Position::Symbol,
];

/// Format a price for display.
///
/// Ltr locales use the currency's own display; rtl locales move the symbol
/// after the amount.
#[must_use]
pub fn format_price(price: &Price, locale: Locale) -> String {
    let currency = price.currency();
    let money = Money::from_decimal(price.amount(), currency);

    match locale.direction() {
        Direction::Ltr => money.to_string(),
        Direction::Rtl => {
            let format = LocalFormat::from_locale(currency.locale);

            Formatter::money(
                &money,
                Params {
                    digit_separator: format.digit_separator,
                    exponent_separator: format.exponent_separator,
                    separator_pattern: format.digit_separator_pattern,
                    positions: SYMBOL_TRAILING,
                    rounding: Some(currency.exponent),
                    symbol: Some(currency.symbol),
                    code: Some(currency.iso_alpha_code),
                },
            )
        }
    }
}
