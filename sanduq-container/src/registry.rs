//! Registration model — how each identifier should be satisfied.
//!
//! A [`Registration`] is a passive record: all decisions are made by
//! the resolver. It only remembers the cached singleton instance and
//! the sticky failure of the last resolution attempt.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::container::Container;
use crate::error::{Result, SanduqError};
use crate::identifier::Identifier;
use crate::introspect::Instance;
use crate::kind::RegistrationKind;

/// User-supplied creation strategy for factory registrations.
///
/// Receives the container (to resolve its own dependencies) and
/// returns a fresh instance, or an error that is passed to the caller
/// untouched.
pub type CreationStrategy = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// What a registration binds its identifier to.
pub(crate) enum Binding {
    /// Constructed at most once, then cached.
    Single {
        implementation: Identifier,
        instance: OnceCell<Instance>,
    },
    /// Constructed on every request.
    Factory { strategy: Option<CreationStrategy> },
}

/// Registration entry for a single identifier.
pub(crate) struct Registration {
    identifier: Identifier,
    binding: Binding,
    failure: OnceCell<SanduqError>,
}

impl Registration {
    pub fn single(identifier: Identifier, implementation: Identifier) -> Self {
        Self {
            identifier,
            binding: Binding::Single {
                implementation,
                instance: OnceCell::new(),
            },
            failure: OnceCell::new(),
        }
    }

    pub fn factory(identifier: Identifier, strategy: Option<CreationStrategy>) -> Self {
        Self {
            identifier,
            binding: Binding::Factory { strategy },
            failure: OnceCell::new(),
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn kind(&self) -> RegistrationKind {
        match self.binding {
            Binding::Single { .. } => RegistrationKind::Single,
            Binding::Factory { .. } => RegistrationKind::Factory,
        }
    }

    /// The cached failure of an earlier attempt, if any.
    pub fn failure(&self) -> Option<&SanduqError> {
        self.failure.get()
    }

    /// Caches `failure` unless one is cached already, and returns the
    /// failure that is now sticky.
    pub fn cache_failure(&self, failure: SanduqError) -> SanduqError {
        let mut fresh = false;
        let cached = self.failure.get_or_init(|| {
            fresh = true;
            failure
        });
        if fresh {
            warn!(identifier = %self.identifier, "Resolution failed; caching failure");
        }
        cached.clone()
    }

    /// `true` once a singleton instance has been cached.
    pub fn is_resolved(&self) -> bool {
        matches!(&self.binding, Binding::Single { instance, .. } if instance.get().is_some())
    }

    /// Caches a singleton instance. The first instance wins; the cached
    /// one is returned. Factory registrations never cache.
    pub fn cache_instance(&self, value: Instance) -> Instance {
        match &self.binding {
            Binding::Single { instance, .. } => instance.get_or_init(|| value).clone(),
            Binding::Factory { .. } => value,
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Registration");
        s.field("identifier", &self.identifier)
            .field("kind", &self.kind());
        match &self.binding {
            Binding::Single { implementation, .. } => {
                s.field("implementation", implementation)
                    .field("resolved", &self.is_resolved());
            }
            Binding::Factory { strategy } => {
                s.field("strategy", &strategy.is_some());
            }
        }
        s.field("failed", &self.failure.get().is_some()).finish()
    }
}

/// Stores all registrations of a container.
///
/// Registrations are shared behind `Arc` so the resolver can release
/// the registry lock before it recurses.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    registrations: HashMap<Identifier, Arc<Registration>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    /// Inserts a registration. Last write wins: any previous
    /// registration (with its cached instance or failure) is dropped.
    pub fn insert(&mut self, registration: Registration) {
        let identifier = registration.identifier.clone();
        let kind = registration.kind();

        match self.registrations.insert(identifier.clone(), Arc::new(registration)) {
            Some(previous) => debug!(
                identifier = %identifier,
                kind = %kind,
                previous = %previous.kind(),
                "Replaced registration"
            ),
            None => debug!(identifier = %identifier, kind = %kind, "Registered dependency"),
        }
    }

    /// Looks up a registration by identifier.
    pub fn get(&self, identifier: &str) -> Option<Arc<Registration>> {
        self.registrations.get(identifier).cloned()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.registrations.contains_key(identifier)
    }

    /// Returns the number of registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// All registered identifiers (for suggestions).
    pub fn identifiers(&self) -> Vec<Identifier> {
        self.registrations.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::instance;

    fn id(name: &str) -> Identifier {
        Identifier::new(name)
    }

    #[test]
    fn register_and_get() {
        let mut registry = Registry::new();
        registry.insert(Registration::single(id("Mailer"), id("SmtpMailer")));
        assert!(registry.contains("Mailer"));
        assert_eq!(registry.get("Mailer").unwrap().kind(), RegistrationKind::Single);
        assert!(registry.get("Clock").is_none());
    }

    #[test]
    fn last_write_wins() {
        let mut registry = Registry::new();
        registry.insert(Registration::single(id("Mailer"), id("SmtpMailer")));
        registry.insert(Registration::factory(id("Mailer"), None));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Mailer").unwrap().kind(), RegistrationKind::Factory);
    }

    #[test]
    fn instance_is_set_at_most_once() {
        let registration = Registration::single(id("Clock"), id("Clock"));
        assert!(!registration.is_resolved());

        let first = instance(1u8);
        let second = instance(2u8);
        let cached = registration.cache_instance(first.clone());
        let again = registration.cache_instance(second);

        assert!(registration.is_resolved());
        assert!(Arc::ptr_eq(&cached, &first));
        assert!(Arc::ptr_eq(&again, &first));
    }

    #[test]
    fn factory_never_caches_instances() {
        let registration = Registration::factory(id("Clock"), None);
        let value = instance(1u8);
        let returned = registration.cache_instance(value.clone());

        assert!(Arc::ptr_eq(&returned, &value));
        assert!(!registration.is_resolved());

        // a second value is not swallowed by an earlier one
        let other = instance(2u8);
        assert!(Arc::ptr_eq(&registration.cache_instance(other.clone()), &other));
    }

    #[test]
    fn failure_is_sticky() {
        let registration = Registration::single(id("Mailer"), id("Ghost"));
        assert!(registration.failure().is_none());

        registration.cache_failure(SanduqError::introspection("Ghost", "first"));
        let kept = registration.cache_failure(SanduqError::introspection("Ghost", "second"));

        assert!(format!("{kept}").contains("first"));
        assert!(format!("{}", registration.failure().unwrap()).contains("first"));
    }

    #[test]
    fn debug_shows_binding() {
        let registration = Registration::factory(id("Clock"), None);
        let debug = format!("{registration:?}");
        assert!(debug.contains("Factory"));
        assert!(debug.contains("strategy: false"));
    }
}
