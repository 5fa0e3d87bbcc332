//! Typed Identifiers

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use crate::cart::{
    errors::ValidationError,
    models::{CartSnapshot, LineItem},
};

/// An opaque, remote-assigned identifier tagged with the entity it names.
pub struct TypedId<T>(String, PhantomData<T>);

/// Cart identifier, assigned by the commerce platform on creation.
pub type CartId = TypedId<CartSnapshot>;

/// Line identifier, unique within a cart.
pub type LineId = TypedId<LineItem>;

/// Marker for purchasable variants issued by the external catalog.
#[derive(Debug)]
pub enum Merchandise {}

/// Merchandise (variant) identifier.
pub type MerchandiseId = TypedId<Merchandise>;

impl<T> TypedId<T> {
    /// Wrap a remote identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyIdentifier`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(ValidationError::EmptyIdentifier);
        }

        Ok(Self(value, PhantomData))
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw identifier.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> PartialEq<str> for TypedId<T> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<T> PartialEq<&str> for TypedId<T> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<T> TryFrom<String> for TypedId<T> {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> TryFrom<&str> for TypedId<T> {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<T> AsRef<str> for TypedId<T> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
