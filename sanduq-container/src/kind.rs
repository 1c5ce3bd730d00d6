//! Registration kinds.
//!
//! A registration is one of two kinds:
//! - [`RegistrationKind::Single`] — constructed at most once, then cached
//! - [`RegistrationKind::Factory`] — constructed fresh on every request
use std::fmt;

/// How a registered identifier is satisfied.
///
/// The kind of a registration never changes; registering the same
/// identifier again replaces the registration wholesale.
///
/// # Examples
/// ```
/// use sanduq_container::kind::RegistrationKind;
///
/// assert!(RegistrationKind::Single.is_cached());
/// assert!(!RegistrationKind::Factory.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    /// One instance for the lifetime of the container.
    ///
    /// Created on first resolve, dropped together with the container.
    ///
    /// # When to use
    /// - Connection pools
    /// - Configuration objects
    /// - Shared caches
    Single,

    /// New instance created on every resolve call.
    ///
    /// Either built by a user-supplied creation strategy or by
    /// constructing the identifier itself as a concrete type.
    Factory,
}

impl RegistrationKind {
    /// Returns `true` if resolved instances are cached.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, RegistrationKind::Single)
    }
}

impl fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationKind::Single => write!(f, "Single"),
            RegistrationKind::Factory => write!(f, "Factory"),
        }
    }
}
