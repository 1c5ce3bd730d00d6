//! Provider trait — a module of related registrations.
//!
//! # Examples
//! ```rust,ignore
//! struct MailProvider;
//!
//! impl Provider for MailProvider {
//!     fn register(&self, registry: &mut dyn BindingRegistry) {
//!         registry.single("Clock");
//!         registry.single_as("Mailer", "SmtpMailer");
//!     }
//! }
//! ```

use crate::identifier::Identifier;
use crate::registry::CreationStrategy;

/// A module that registers related bindings into a container.
///
/// Split bindings by domain instead of one giant bootstrap block:
///
/// ```rust,ignore
/// container
///     .add_provider(&DatabaseProvider)
///     .add_provider(&MailProvider);
/// ```
pub trait Provider: Send + Sync {
    /// Register bindings. Called once per `add_provider`.
    fn register(&self, registry: &mut dyn BindingRegistry);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// What providers register into: a [`ContainerBuilder`] or a live
/// [`Container`].
///
/// [`ContainerBuilder`]: crate::container::ContainerBuilder
/// [`Container`]: crate::container::Container
pub trait BindingRegistry {
    /// Bind `identifier` to one cached `implementation` instance.
    fn register_single(&mut self, identifier: Identifier, implementation: Identifier);

    /// Bind `identifier` to a fresh instance per request.
    fn register_factory(&mut self, identifier: Identifier, strategy: Option<CreationStrategy>);

    /// Shorthand: `identifier` is its own implementation.
    fn single(&mut self, identifier: &str) {
        let identifier = Identifier::new(identifier);
        self.register_single(identifier.clone(), identifier);
    }

    fn single_as(&mut self, identifier: &str, implementation: &str) {
        self.register_single(Identifier::new(identifier), Identifier::new(implementation));
    }

    fn factory(&mut self, identifier: &str) {
        self.register_factory(Identifier::new(identifier), None);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::container::Container;
    use crate::fixtures::{self, Clock, SmtpMailer};
    use crate::error::Result;
    use crate::introspect::{Instance, instance};

    // Records what a provider registers
    #[derive(Default)]
    struct RecordingRegistry {
        singles: Vec<(Identifier, Identifier)>,
        factories: Vec<(Identifier, bool)>,
    }

    impl BindingRegistry for RecordingRegistry {
        fn register_single(&mut self, identifier: Identifier, implementation: Identifier) {
            self.singles.push((identifier, implementation));
        }

        fn register_factory(&mut self, identifier: Identifier, strategy: Option<CreationStrategy>) {
            self.factories.push((identifier, strategy.is_some()));
        }
    }

    struct MailProvider;

    impl Provider for MailProvider {
        fn register(&self, registry: &mut dyn BindingRegistry) {
            registry.single("Clock");
            registry.single_as("Mailer", "SmtpMailer");
            registry.factory("Greeter");
            let answer: CreationStrategy =
                Arc::new(|_: &Container| -> Result<Instance> { Ok(instance(42u32)) });
            registry.register_factory(Identifier::new("Answer"), Some(answer));
        }

        fn name(&self) -> &str {
            "mail"
        }
    }

    #[test]
    fn provider_registers_bindings() {
        let mut registry = RecordingRegistry::default();
        MailProvider.register(&mut registry);

        assert_eq!(registry.singles.len(), 2);
        assert_eq!(registry.singles[0], (Identifier::new("Clock"), Identifier::new("Clock")));
        assert_eq!(registry.singles[1].1, "SmtpMailer");
        assert_eq!(
            registry.factories,
            vec![(Identifier::new("Greeter"), false), (Identifier::new("Answer"), true)]
        );
    }

    #[test]
    fn default_name_is_type_name() {
        struct Unnamed;
        impl Provider for Unnamed {
            fn register(&self, _: &mut dyn BindingRegistry) {}
        }

        assert!(Unnamed.name().contains("Unnamed"));
        assert_eq!(MailProvider.name(), "mail");
    }

    #[test]
    fn provider_on_live_container() {
        let mut container = Container::with_catalog(fixtures::catalog());
        container.add_provider(&MailProvider);

        assert_eq!(container.len(), 4);
        let mailer: Arc<SmtpMailer> = container.get_as("Mailer").unwrap();
        let clock: Arc<Clock> = container.get_as("Clock").unwrap();
        assert!(Arc::ptr_eq(&mailer.clock, &clock));
        assert_eq!(*container.get_as::<u32>("Answer").unwrap(), 42);
    }

    #[test]
    fn provider_on_builder() {
        let container = Container::builder()
            .catalog(fixtures::catalog())
            .add_provider(&MailProvider)
            .build();

        assert!(container.has("Mailer"));
        assert!(container.get("Greeter").is_ok());
    }
}
