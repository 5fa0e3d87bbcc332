//! Locales

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Left to right.
    Ltr,

    /// Right to left.
    Rtl,
}

/// A storefront locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    /// Hebrew; the storefront default.
    #[default]
    He,

    /// English.
    En,

    /// Arabic.
    Ar,
}

/// An unsupported locale code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl Locale {
    /// Every supported locale.
    pub const ALL: [Locale; 3] = [Locale::He, Locale::En, Locale::Ar];

    /// Two-letter code, as used in routes and the checkout hand-off.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Locale::He => "he",
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Reading direction of the locale's script.
    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Locale::He | Locale::Ar => Direction::Rtl,
            Locale::En => Direction::Ltr,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "he" => Ok(Locale::He),
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}
