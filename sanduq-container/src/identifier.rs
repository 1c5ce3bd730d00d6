//! Identifiers for abstract contracts and concrete types.
//!
//! An [`Identifier`] is an opaque string naming either an abstract
//! contract (`"Mailer"`) or a concrete type (`"app::SmtpMailer"`).
//! It is the key of every registration in a container.

use std::any::type_name;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use sanduq_support::rendering::shorten_type_name;

/// Names a dependency within one container.
///
/// Cloning is cheap (the name is shared behind an `Arc`), and an
/// identifier can be looked up in maps keyed by it using a plain `&str`.
///
/// # Examples
/// ```
/// use sanduq_container::identifier::Identifier;
///
/// let key = Identifier::new("app::services::Mailer");
/// assert_eq!(key.as_str(), "app::services::Mailer");
/// assert_eq!(key.short_name(), "Mailer");
///
/// let key = Identifier::of::<String>();
/// assert_eq!(key.as_str(), "alloc::string::String");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(Arc<str>);

impl Identifier {
    /// Creates an identifier from any string-like name.
    #[inline]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Creates an identifier from the Rust type name of `T`.
    ///
    /// Handy when the catalog registers types under their own
    /// `type_name`, but any stable string works just as well.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(Arc::from(type_name::<T>()))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier with module paths stripped.
    ///
    /// Used in error messages for better developer experience.
    pub fn short_name(&self) -> String {
        shorten_type_name(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&String> for Identifier {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<&Identifier> for Identifier {
    fn from(identifier: &Identifier) -> Self {
        identifier.clone()
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
