//! # The Container — heart of Sanduq
//!
//! Maps identifiers to construction strategies and resolves object
//! graphs on demand by introspecting constructor signatures.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──build()──> Container ──get()──> Resolver
//!                                   │                   │
//!                               Registry          TypeIntrospector
//!                           (Single | Factory)     (TypeCatalog)
//! ```
//!
//! # Examples
//! ```rust
//! use sanduq_container::prelude::*;
//! use std::sync::Arc;
//!
//! struct Clock;
//! struct SmtpMailer { clock: Arc<Clock> }
//!
//! let catalog = TypeCatalog::new()
//!     .with(TypeDescriptor::concrete("Clock").constructor(|_| Ok(instance(Clock))))
//!     .with(TypeDescriptor::abstract_type("Mailer"))
//!     .with(
//!         TypeDescriptor::concrete("SmtpMailer")
//!             .parameter("clock", "Clock")
//!             .constructor(|args| Ok(instance(SmtpMailer { clock: args.get(0)? }))),
//!     );
//!
//! let container = Container::with_catalog(catalog);
//! container.single("Clock").single_as("Mailer", "SmtpMailer");
//!
//! let mailer: Arc<SmtpMailer> = container.get_as("Mailer").expect("Failed to resolve");
//! let again: Arc<SmtpMailer> = container.get_as("Mailer").expect("Failed to resolve");
//! assert!(Arc::ptr_eq(&mailer, &again));
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use sanduq_support::rendering::suggest_similar;
use tracing::{info, instrument, trace};

use crate::catalog::{TypeCatalog, TypeDescriptor};
use crate::error::{NotFoundError, Result, SanduqError};
use crate::identifier::Identifier;
use crate::introspect::{Instance, TypeIntrospector, instance};
use crate::provider::{BindingRegistry, Provider};
use crate::registry::{CreationStrategy, Registration, Registry};
use crate::resolver::Resolver;
use crate::settings::ContainerSettings;

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] with registered bindings.
///
/// Everything the builder does can also be done on a live container;
/// the builder is convenient when bindings come from [`Provider`]s.
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .catalog(TypeCatalog::discover())
///     .single_as("Mailer", "SmtpMailer")
///     .factory_with("Request", |c| { ... })
///     .add_provider(&MailProvider)
///     .build();
/// ```
pub struct ContainerBuilder {
    registry: Registry,
    introspector: Option<Arc<dyn TypeIntrospector>>,
    settings: ContainerSettings,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            registry: Registry::new(),
            introspector: None,
            settings: ContainerSettings::default(),
        }
    }

    /// Use `catalog` for introspection.
    pub fn catalog(self, catalog: TypeCatalog) -> Self {
        self.introspector(Arc::new(catalog))
    }

    /// Use a custom introspector.
    pub fn introspector(mut self, introspector: Arc<dyn TypeIntrospector>) -> Self {
        self.introspector = Some(introspector);
        self
    }

    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Enable or disable cycle detection.
    pub fn detect_cycles(mut self, detect: bool) -> Self {
        self.settings.detect_cycles = detect;
        self
    }

    // ── Single ──

    /// Register `identifier` as its own singleton implementation.
    pub fn single(mut self, identifier: impl Into<Identifier>) -> Self {
        let identifier = identifier.into();
        self.register_single(identifier.clone(), identifier);
        self
    }

    /// Register `identifier` to be satisfied by one `implementation` instance.
    pub fn single_as(
        mut self,
        identifier: impl Into<Identifier>,
        implementation: impl Into<Identifier>,
    ) -> Self {
        self.register_single(identifier.into(), implementation.into());
        self
    }

    // ── Factory ──

    /// Register `identifier` to be constructed fresh on every request.
    pub fn factory(mut self, identifier: impl Into<Identifier>) -> Self {
        self.register_factory(identifier.into(), None);
        self
    }

    /// Register a creation strategy, invoked on every request.
    pub fn factory_with<F>(mut self, identifier: impl Into<Identifier>, strategy: F) -> Self
    where
        F: Fn(&Container) -> Result<Instance> + Send + Sync + 'static,
    {
        self.register_factory(identifier.into(), Some(Arc::new(strategy)));
        self
    }

    // ── Provider modules ──

    /// Add a [`Provider`] module.
    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        trace!(provider = provider.name(), "Adding provider");
        provider.register(&mut self);
        self
    }

    // ── Build ──

    /// Build the container.
    ///
    /// Nothing is resolved here: failures surface on the first `get`.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Container {
        info!(registered = self.registry.len(), "Building container");

        let introspector = self
            .introspector
            .unwrap_or_else(|| Arc::new(TypeCatalog::new()));

        Container {
            registry: RwLock::new(self.registry),
            introspector,
            settings: self.settings,
        }
    }
}

impl BindingRegistry for ContainerBuilder {
    fn register_single(&mut self, identifier: Identifier, implementation: Identifier) {
        self.registry.insert(Registration::single(identifier, implementation));
    }

    fn register_factory(&mut self, identifier: Identifier, strategy: Option<CreationStrategy>) {
        self.registry.insert(Registration::factory(identifier, strategy));
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Dependency injection container.
///
/// Registration and resolution take `&self`; the registry sits behind
/// a lock and cached instances are set at most once, so a container can
/// be shared between threads once bootstrapped.
pub struct Container {
    registry: RwLock<Registry>,
    introspector: Arc<dyn TypeIntrospector>,
    settings: ContainerSettings,
}

impl Container {
    /// Identifier of the container type itself.
    ///
    /// Every [`TypeCatalog::new`] knows it, so a container can resolve
    /// (a fresh container sharing its introspector and settings) without
    /// any binding.
    pub const TYPE_NAME: &'static str = "sanduq::Container";

    /// An empty container with a [`TypeCatalog::new`] catalog.
    pub fn new() -> Self {
        Self::with_catalog(TypeCatalog::new())
    }

    pub fn with_catalog(catalog: TypeCatalog) -> Self {
        Self::with_introspector(Arc::new(catalog))
    }

    pub fn with_introspector(introspector: Arc<dyn TypeIntrospector>) -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
            introspector,
            settings: ContainerSettings::default(),
        }
    }

    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Describes the container type for the catalog.
    ///
    /// The built container is empty but shares the introspector and
    /// settings of the container resolving it.
    pub(crate) fn descriptor() -> TypeDescriptor {
        TypeDescriptor::concrete(Self::TYPE_NAME).constructor(|args| {
            Ok(instance(Container {
                registry: RwLock::new(Registry::new()),
                introspector: args.introspector(),
                settings: args.settings().clone(),
            }))
        })
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    pub fn introspector(&self) -> &Arc<dyn TypeIntrospector> {
        &self.introspector
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    // ── Registration ──

    /// Register `identifier` as its own singleton implementation.
    ///
    /// Replaces any previous registration, together with its cached
    /// instance or failure.
    pub fn single(&self, identifier: impl Into<Identifier>) -> &Self {
        let identifier = identifier.into();
        self.insert(Registration::single(identifier.clone(), identifier))
    }

    /// Register `identifier` to be satisfied by one `implementation` instance.
    pub fn single_as(
        &self,
        identifier: impl Into<Identifier>,
        implementation: impl Into<Identifier>,
    ) -> &Self {
        self.insert(Registration::single(identifier.into(), implementation.into()))
    }

    /// Register `identifier` to be constructed fresh on every request.
    pub fn factory(&self, identifier: impl Into<Identifier>) -> &Self {
        self.insert(Registration::factory(identifier.into(), None))
    }

    /// Register a creation strategy, invoked on every request.
    ///
    /// ```rust,ignore
    /// container.factory_with("Request", |c| {
    ///     let clock: Arc<Clock> = c.get_as("Clock")?;
    ///     Ok(instance(Request::now(&clock)))
    /// });
    /// ```
    pub fn factory_with<F>(&self, identifier: impl Into<Identifier>, strategy: F) -> &Self
    where
        F: Fn(&Container) -> Result<Instance> + Send + Sync + 'static,
    {
        self.insert(Registration::factory(identifier.into(), Some(Arc::new(strategy))))
    }

    /// Add a [`Provider`] module.
    pub fn add_provider(&mut self, provider: &dyn Provider) -> &mut Self {
        trace!(provider = provider.name(), "Adding provider");
        provider.register(self);
        self
    }

    // ── Resolution ──

    /// Returns `true` if `get(identifier)` will not fail with
    /// [`SanduqError::NotFound`].
    ///
    /// That is: the identifier is registered, or it names a concrete
    /// type the introspector can build. A registered binding may still
    /// fail to resolve.
    pub fn has(&self, identifier: &str) -> bool {
        if self.registry.read().contains(identifier) {
            return true;
        }
        self.introspector.is_instantiable(&Identifier::new(identifier))
    }

    /// Resolve an identifier.
    ///
    /// ```rust,ignore
    /// let mailer = container.get("Mailer")?;
    /// ```
    #[instrument(skip(self), level = "debug")]
    pub fn get(&self, identifier: &str) -> Result<Instance> {
        let identifier = Identifier::new(identifier);

        if !self.has(identifier.as_str()) {
            return Err(self.not_found(&identifier));
        }

        Resolver::new(self).resolve(&identifier)
    }

    /// Resolve an identifier and downcast it to `T`.
    ///
    /// ```rust,ignore
    /// let mailer: Arc<SmtpMailer> = container.get_as("Mailer")?;
    /// ```
    pub fn get_as<T: Any + Send + Sync>(&self, identifier: &str) -> Result<Arc<T>> {
        self.get(identifier)?
            .downcast::<T>()
            .map_err(|_| SanduqError::TypeMismatch {
                identifier: Identifier::new(identifier),
                expected: type_name::<T>(),
            })
    }

    // ── Internal ──

    fn insert(&self, registration: Registration) -> &Self {
        self.registry.write().insert(registration);
        self
    }

    /// Clones the registration out so the lock is not held while resolving.
    pub(crate) fn registration(&self, identifier: &str) -> Option<Arc<Registration>> {
        self.registry.read().get(identifier)
    }

    pub(crate) fn not_found(&self, identifier: &Identifier) -> SanduqError {
        SanduqError::NotFound(NotFoundError {
            requested: identifier.clone(),
            suggestions: self.find_suggestions(identifier),
        })
    }

    fn find_suggestions(&self, identifier: &Identifier) -> Vec<Identifier> {
        let mut known = self.registry.read().identifiers();
        known.extend(self.introspector.known_types());
        known.sort();
        known.dedup();

        let names: Vec<&str> = known.iter().map(Identifier::as_str).collect();
        suggest_similar(identifier.as_str(), &names, self.settings.max_suggestions)
            .into_iter()
            .map(Identifier::from)
            .collect()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingRegistry for Container {
    fn register_single(&mut self, identifier: Identifier, implementation: Identifier) {
        self.insert(Registration::single(identifier, implementation));
    }

    fn register_factory(&mut self, identifier: Identifier, strategy: Option<CreationStrategy>) {
        self.insert(Registration::factory(identifier, strategy));
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.len())
            .field("settings", &self.settings)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::catalog::{CatalogEntry, TypeCatalog, TypeDescriptor};
    pub use crate::error::{Result, SanduqError};
    pub use crate::identifier::Identifier;
    pub use crate::introspect::{Arguments, Instance, TypeIntrospector, TypeKind, instance};
    pub use crate::kind::RegistrationKind;
    pub use crate::provider::{BindingRegistry, Provider};
    pub use crate::settings::ContainerSettings;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
