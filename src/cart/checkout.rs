//! Checkout hand-off.

use thiserror::Error;
use url::Url;

use crate::i18n::Locale;

/// The checkout URL handed back by the commerce platform was not a URL.
#[derive(Debug, Error)]
#[error("invalid checkout url: {source}")]
pub struct CheckoutUrlError {
    #[from]
    source: url::ParseError,
}

/// Set the `locale` query parameter on a checkout URL, replacing any existing one.
///
/// The URL is otherwise opaque: no other part of it is read or rewritten.
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed.
pub fn with_locale(checkout_url: &str, locale: Locale) -> Result<Url, CheckoutUrlError> {
    let mut url = Url::parse(checkout_url)?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "locale")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("locale", locale.code());

    Ok(url)
}
