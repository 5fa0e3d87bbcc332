//! Localization

pub mod catalog;
pub mod format;
pub mod locale;

pub use catalog::{Catalog, CatalogError, MessageId};
pub use format::format_price;
pub use locale::{Direction, Locale, UnknownLocale};
