//! Type catalog — a registry of constructor signatures.
//!
//! The catalog is the default [`TypeIntrospector`]: each concrete type
//! is described once (its parameters and a constructor function) and
//! the resolver takes it from there. Descriptors are added explicitly,
//! or collected at link time from [`CatalogEntry`] submissions.
//!
//! # Examples
//! ```rust
//! use sanduq_container::catalog::{TypeCatalog, TypeDescriptor};
//! use sanduq_container::introspect::instance;
//! use std::sync::Arc;
//!
//! struct Clock;
//! struct Greeter { clock: Arc<Clock>, greeting: String }
//!
//! let catalog = TypeCatalog::new()
//!     .with(TypeDescriptor::concrete("Clock").constructor(|_| Ok(instance(Clock))))
//!     .with(
//!         TypeDescriptor::concrete("Greeter")
//!             .parameter("clock", "Clock")
//!             .with_default("greeting", String::from("hello"))
//!             .constructor(|args| {
//!                 Ok(instance(Greeter {
//!                     clock: args.get(0)?,
//!                     greeting: args.cloned(1)?,
//!                 }))
//!             }),
//!     );
//!
//! assert!(catalog.contains("Greeter"));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::container::Container;
use crate::error::{Result, SanduqError, TypeNotInstantiableError, TypeUnavailable};
use crate::identifier::Identifier;
use crate::introspect::{
    Arguments, ConstructorSignature, Instance, ParameterDescriptor, TypeIntrospector, TypeKind,
    instance,
};

/// Builds an instance of a concrete type from its resolved arguments.
pub type ConstructorFn = Arc<dyn Fn(&Arguments) -> Result<Instance> + Send + Sync>;

/// Describes one type: its kind, constructor parameters and constructor.
#[derive(Clone)]
pub struct TypeDescriptor {
    type_name: Identifier,
    kind: TypeKind,
    parameters: Vec<ParameterDescriptor>,
    constructor: Option<ConstructorFn>,
}

impl TypeDescriptor {
    /// Starts describing a concrete type.
    ///
    /// Remember to attach a [`constructor`](Self::constructor); without
    /// one, introspection of the type fails.
    pub fn concrete(type_name: impl Into<Identifier>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: TypeKind::Concrete,
            parameters: Vec::new(),
            constructor: None,
        }
    }

    /// Describes an abstract contract. It can only be resolved through
    /// a registration pointing at a concrete type.
    pub fn abstract_type(type_name: impl Into<Identifier>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: TypeKind::Abstract,
            parameters: Vec::new(),
            constructor: None,
        }
    }

    /// Describes a parameterless type built with [`Default`].
    pub fn from_default<T: Default + Any + Send + Sync>(type_name: impl Into<Identifier>) -> Self {
        Self::concrete(type_name).constructor(|_| Ok(instance(T::default())))
    }

    /// Appends a typed parameter, resolved through the container.
    pub fn parameter(self, name: impl Into<String>, declared_type: impl Into<Identifier>) -> Self {
        self.push(name.into(), Some(declared_type.into()), None)
    }

    /// Appends a typed parameter that falls back to `default` when its
    /// type cannot be found.
    pub fn optional<T: Any + Send + Sync>(
        self,
        name: impl Into<String>,
        declared_type: impl Into<Identifier>,
        default: T,
    ) -> Self {
        self.push(name.into(), Some(declared_type.into()), Some(instance(default)))
    }

    /// Appends an untyped parameter without a default.
    ///
    /// Nothing can satisfy it, so resolving the type always fails.
    pub fn untyped(self, name: impl Into<String>) -> Self {
        self.push(name.into(), None, None)
    }

    /// Appends an untyped parameter with a default value.
    pub fn with_default<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
        self.push(name.into(), None, Some(instance(value)))
    }

    /// Sets the constructor function.
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&Arguments) -> Result<Instance> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    pub fn type_name(&self) -> &Identifier {
        &self.type_name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    fn push(mut self, name: String, declared_type: Option<Identifier>, default: Option<Instance>) -> Self {
        self.parameters.push(ParameterDescriptor {
            position: self.parameters.len(),
            name,
            declared_type,
            default,
        });
        self
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// A link-time catalog submission.
///
/// ```rust,ignore
/// fn describe_clock() -> TypeDescriptor {
///     TypeDescriptor::from_default::<Clock>("Clock")
/// }
///
/// sanduq_container::inventory::submit! {
///     CatalogEntry::new("Clock", describe_clock)
/// }
///
/// let catalog = TypeCatalog::discover();
/// ```
pub struct CatalogEntry {
    /// Type name for debugging/logging
    pub type_name: &'static str,
    /// Produces the descriptor
    pub describe: fn() -> TypeDescriptor,
}

impl CatalogEntry {
    pub const fn new(type_name: &'static str, describe: fn() -> TypeDescriptor) -> Self {
        Self { type_name, describe }
    }
}

inventory::collect!(CatalogEntry);

/// The default [`TypeIntrospector`]: a map of type descriptors.
pub struct TypeCatalog {
    types: HashMap<Identifier, TypeDescriptor>,
}

impl TypeCatalog {
    /// A catalog that knows the container's own type, so a container
    /// can always resolve [`Container::TYPE_NAME`].
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.register(Container::descriptor());
        catalog
    }

    /// A catalog that knows nothing.
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// [`TypeCatalog::new`] plus every submitted [`CatalogEntry`].
    pub fn discover() -> Self {
        let mut catalog = Self::new();
        for entry in inventory::iter::<CatalogEntry> {
            debug!(type_name = entry.type_name, "Discovered catalog entry");
            catalog.register((entry.describe)());
        }
        catalog
    }

    /// Adds a descriptor, replacing any previous one for the same type.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        debug!(
            type_name = %descriptor.type_name,
            kind = ?descriptor.kind,
            parameters = descriptor.parameters.len(),
            "Registered type"
        );
        self.types.insert(descriptor.type_name.clone(), descriptor);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up a concrete descriptor that has a constructor.
    fn constructible(&self, type_name: &Identifier) -> Result<(&TypeDescriptor, &ConstructorFn)> {
        let descriptor = self.types.get(type_name).ok_or_else(|| {
            not_instantiable(type_name, TypeUnavailable::Missing)
        })?;

        if descriptor.kind == TypeKind::Abstract {
            return Err(not_instantiable(type_name, TypeUnavailable::Abstract));
        }

        let constructor = descriptor.constructor.as_ref().ok_or_else(|| {
            SanduqError::introspection(type_name, "no constructor function was registered")
        })?;

        Ok((descriptor, constructor))
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("types", &self.types.len())
            .finish()
    }
}

impl TypeIntrospector for TypeCatalog {
    fn kind_of(&self, type_name: &Identifier) -> Option<TypeKind> {
        self.types.get(type_name).map(|d| d.kind)
    }

    fn constructor(&self, type_name: &Identifier) -> Result<ConstructorSignature> {
        let (descriptor, _) = self.constructible(type_name)?;
        Ok(ConstructorSignature {
            type_name: descriptor.type_name.clone(),
            parameters: descriptor.parameters.clone(),
        })
    }

    fn instantiate(&self, type_name: &Identifier, arguments: Arguments) -> Result<Instance> {
        let (descriptor, constructor) = self.constructible(type_name)?;

        if arguments.len() != descriptor.parameters.len() {
            return Err(SanduqError::introspection(
                type_name,
                format!(
                    "constructor takes {} arguments but {} were supplied",
                    descriptor.parameters.len(),
                    arguments.len()
                ),
            ));
        }

        constructor(&arguments)
    }

    fn known_types(&self) -> Vec<Identifier> {
        self.types.keys().cloned().collect()
    }
}

fn not_instantiable(type_name: &Identifier, reason: TypeUnavailable) -> SanduqError {
    SanduqError::TypeNotInstantiable(TypeNotInstantiableError {
        type_name: type_name.clone(),
        reason,
    })
}
