//! Message catalogue
//!
//! User-facing cart text lives in one YAML dictionary per locale, bundled
//! into the binary. [`Catalog::load`] checks every dictionary against
//! [`MessageId::ALL`] so a missing or misspelled translation fails at
//! startup instead of rendering as a blank.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::i18n::Locale;

const HE: &str = include_str!("dictionaries/he.yaml");
const EN: &str = include_str!("dictionaries/en.yaml");
const AR: &str = include_str!("dictionaries/ar.yaml");

/// Identifier of a translatable cart message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Cart heading.
    CartTitle,
    /// Shown instead of an empty table.
    CartEmpty,
    /// Second line under [`MessageId::CartEmpty`].
    CartEmptyDescription,
    /// Unit after the item count.
    ItemsInCart,
    /// Line id column heading.
    Line,
    /// Product column heading.
    Item,
    /// Quantity column heading.
    Quantity,
    /// Unit price column heading.
    UnitPrice,
    /// Line total column heading.
    LineTotal,
    /// Checkout refused until the terms are accepted.
    TermsRequired,
    /// Lead-in of the terms acceptance line.
    AgreeToTerms,
    /// Name of the terms document.
    TermsAndConditions,
    /// Generic failed-update notice.
    CartError,
    /// The cart expired and was reset.
    CartExpired,
    /// The line was removed elsewhere first.
    LineAlreadyRemoved,
    /// Subtotal label.
    Subtotal,
    /// Total label.
    Total,
    /// Checkout label.
    Checkout,
    /// Prefix before the signed-in customer's name.
    SignedInAs,
    /// No customer is signed in.
    SignedOut,
    /// Sign-in was refused or could not complete.
    LoginFailed,
}

impl MessageId {
    /// Every message a dictionary must define.
    pub const ALL: [MessageId; 21] = [
        MessageId::CartTitle,
        MessageId::CartEmpty,
        MessageId::CartEmptyDescription,
        MessageId::ItemsInCart,
        MessageId::Line,
        MessageId::Item,
        MessageId::Quantity,
        MessageId::UnitPrice,
        MessageId::LineTotal,
        MessageId::TermsRequired,
        MessageId::AgreeToTerms,
        MessageId::TermsAndConditions,
        MessageId::CartError,
        MessageId::CartExpired,
        MessageId::LineAlreadyRemoved,
        MessageId::Subtotal,
        MessageId::Total,
        MessageId::Checkout,
        MessageId::SignedInAs,
        MessageId::SignedOut,
        MessageId::LoginFailed,
    ];

    /// Dotted dictionary key, `section.name`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            MessageId::CartTitle => "cart.title",
            MessageId::CartEmpty => "cart.empty",
            MessageId::CartEmptyDescription => "cart.emptyDescription",
            MessageId::ItemsInCart => "cart.itemsInCart",
            MessageId::Line => "cart.line",
            MessageId::Item => "cart.item",
            MessageId::Quantity => "cart.quantity",
            MessageId::UnitPrice => "cart.unitPrice",
            MessageId::LineTotal => "cart.lineTotal",
            MessageId::TermsRequired => "cart.termsRequired",
            MessageId::AgreeToTerms => "cart.agreeToTerms",
            MessageId::TermsAndConditions => "cart.termsAndConditions",
            MessageId::CartError => "cart.error",
            MessageId::CartExpired => "cart.expired",
            MessageId::LineAlreadyRemoved => "cart.lineAlreadyRemoved",
            MessageId::Subtotal => "common.subtotal",
            MessageId::Total => "common.total",
            MessageId::Checkout => "common.checkout",
            MessageId::SignedInAs => "account.signedInAs",
            MessageId::SignedOut => "account.signedOut",
            MessageId::LoginFailed => "account.loginFailed",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }
}

/// Catalogue validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A dictionary was not valid YAML of the expected shape.
    #[error("failed to parse {locale} dictionary: {source}")]
    Yaml {
        /// The dictionary's locale.
        locale: Locale,
        /// Parser error.
        #[source]
        source: serde_norway::Error,
    },

    /// A dictionary lacks one or more messages.
    #[error("{locale} dictionary is missing: {}", .keys.join(", "))]
    Missing {
        /// The dictionary's locale.
        locale: Locale,
        /// Keys of the absent messages.
        keys: Vec<&'static str>,
    },

    /// A dictionary defines a key no message uses.
    #[error("{locale} dictionary has unknown key: {key}")]
    Unknown {
        /// The dictionary's locale.
        locale: Locale,
        /// The unexpected dotted key.
        key: String,
    },

    /// A locale has no dictionary at all.
    #[error("no dictionary for {0}")]
    NoDictionary(Locale),
}

type Sections = FxHashMap<String, FxHashMap<String, String>>;

/// Validated translations for every locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    messages: FxHashMap<Locale, FxHashMap<MessageId, String>>,
}

impl Catalog {
    /// Load and validate the bundled dictionaries.
    ///
    /// # Errors
    ///
    /// Returns an error if any bundled dictionary is malformed or incomplete.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_sources(&[(Locale::He, HE), (Locale::En, EN), (Locale::Ar, AR)])
    }

    /// Build a catalogue from YAML sources, one per locale.
    ///
    /// # Errors
    ///
    /// Returns an error when a source does not parse, a message is missing or
    /// unknown, or a supported locale has no source.
    pub fn from_sources(sources: &[(Locale, &str)]) -> Result<Self, CatalogError> {
        let mut messages = FxHashMap::default();

        for &(locale, source) in sources {
            messages.insert(locale, parse_dictionary(locale, source)?);
        }

        if let Some(locale) = Locale::ALL
            .into_iter()
            .find(|locale| !messages.contains_key(locale))
        {
            return Err(CatalogError::NoDictionary(locale));
        }

        Ok(Self { messages })
    }

    /// Look up a message.
    #[must_use]
    pub fn get(&self, locale: Locale, id: MessageId) -> &str {
        self.messages
            .get(&locale)
            .and_then(|messages| messages.get(&id))
            .map_or(id.key(), String::as_str)
    }
}

fn parse_dictionary(
    locale: Locale,
    source: &str,
) -> Result<FxHashMap<MessageId, String>, CatalogError> {
    let sections: Sections =
        serde_norway::from_str(source).map_err(|source| CatalogError::Yaml { locale, source })?;

    let mut messages = FxHashMap::default();

    for (section, entries) in sections {
        for (name, text) in entries {
            let key = format!("{section}.{name}");
            let id = MessageId::from_key(&key).ok_or(CatalogError::Unknown { locale, key })?;

            messages.insert(id, text);
        }
    }

    let missing: Vec<&'static str> = MessageId::ALL
        .into_iter()
        .filter(|id| !messages.contains_key(id))
        .map(MessageId::key)
        .collect();

    if !missing.is_empty() {
        return Err(CatalogError::Missing {
            locale,
            keys: missing,
        });
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn bundled_dictionaries_are_complete() -> TestResult {
        let catalog = Catalog::load()?;

        for locale in Locale::ALL {
            for id in MessageId::ALL {
                assert!(
                    !catalog.get(locale, id).is_empty(),
                    "{locale} translation for {} is empty",
                    id.key()
                );
            }
        }

        Ok(())
    }

    #[test]
    fn lookup_returns_locale_text() -> TestResult {
        let catalog = Catalog::load()?;

        assert_eq!(catalog.get(Locale::En, MessageId::Checkout), "Checkout");
        assert_eq!(catalog.get(Locale::He, MessageId::Checkout), "לתשלום");

        Ok(())
    }

    #[test]
    fn missing_message_fails_validation() {
        let result = Catalog::from_sources(&[
            (Locale::He, HE),
            (Locale::En, "cart:\n  title: Cart\n"),
            (Locale::Ar, AR),
        ]);

        match result {
            Err(CatalogError::Missing { locale, keys }) => {
                assert_eq!(locale, Locale::En);
                assert!(keys.contains(&"common.checkout"));
                assert!(!keys.contains(&"cart.title"));
            }
            other => panic!("expected Missing error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_key_fails_validation() {
        let source = format!("{EN}\nextra:\n  banner: Hello\n");

        let result = Catalog::from_sources(&[(Locale::He, HE), (Locale::En, &source), (Locale::Ar, AR)]);

        assert!(
            matches!(&result, Err(CatalogError::Unknown { locale: Locale::En, key }) if key == "extra.banner"),
            "expected Unknown error, got {result:?}"
        );
    }

    #[test]
    fn missing_locale_fails_validation() {
        let result = Catalog::from_sources(&[(Locale::He, HE), (Locale::En, EN)]);

        assert!(matches!(result, Err(CatalogError::NoDictionary(Locale::Ar))));
    }
}
