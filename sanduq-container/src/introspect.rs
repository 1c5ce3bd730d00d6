//! Type introspection — the narrow seam between the resolver and
//! whatever knows how types are built.
//!
//! Rust has no runtime reflection, so constructor signatures are
//! described up front (see [`TypeCatalog`](crate::catalog::TypeCatalog))
//! and queried through the [`TypeIntrospector`] trait. The resolver only
//! ever talks to this trait, so any other source of signatures can be
//! plugged in.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use sanduq_support::rendering::{SignatureParameter, render_signature};

use crate::error::{Result, SanduqError};
use crate::identifier::Identifier;
use crate::settings::ContainerSettings;

/// A resolved, type-erased object.
///
/// Two instances are "the same" when [`Arc::ptr_eq`] says so.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Wraps a value into an [`Instance`].
#[inline]
pub fn instance<T: Any + Send + Sync>(value: T) -> Instance {
    Arc::new(value)
}

/// Whether a known type can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Can be instantiated through its constructor.
    Concrete,
    /// Interface-like contract; needs a registration to be resolved.
    Abstract,
}

/// One constructor parameter.
#[derive(Clone)]
pub struct ParameterDescriptor {
    /// Zero-based position in the constructor
    pub position: usize,
    /// Parameter name, for diagnostics
    pub name: String,
    /// Declared type, resolved recursively through the container.
    /// `None` for untyped parameters.
    pub declared_type: Option<Identifier>,
    /// Value used when nothing else satisfies the parameter
    pub default: Option<Instance>,
}

impl ParameterDescriptor {
    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("position", &self.position)
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("has_default", &self.has_default())
            .finish()
    }
}

/// The ordered parameter list of a type's constructor.
#[derive(Debug, Clone)]
pub struct ConstructorSignature {
    pub type_name: Identifier,
    pub parameters: Vec<ParameterDescriptor>,
}

impl ConstructorSignature {
    /// `true` when the constructor takes no parameters.
    #[inline]
    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Renders the signature, e.g. `Mailer::new(clock: Clock, retries = default)`.
    pub fn render(&self) -> String {
        let parameters: Vec<SignatureParameter<'_>> = self
            .parameters
            .iter()
            .map(|p| SignatureParameter {
                name: &p.name,
                declared_type: p.declared_type.as_ref().map(Identifier::as_str),
                has_default: p.has_default(),
            })
            .collect();
        render_signature(self.type_name.as_str(), &parameters)
    }
}

impl fmt::Display for ConstructorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Resolved constructor arguments, in declaration order.
///
/// Handed to a constructor together with the introspector that
/// produced the signature and the settings of the resolving container.
pub struct Arguments {
    type_name: Identifier,
    values: Vec<Instance>,
    introspector: Arc<dyn TypeIntrospector>,
    settings: ContainerSettings,
}

impl Arguments {
    pub fn new(
        type_name: Identifier,
        values: Vec<Instance>,
        introspector: Arc<dyn TypeIntrospector>,
    ) -> Self {
        Self {
            type_name,
            values,
            introspector,
            settings: ContainerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The type being constructed.
    pub fn type_name(&self) -> &Identifier {
        &self.type_name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The raw, type-erased argument at `position`.
    pub fn raw(&self, position: usize) -> Result<&Instance> {
        self.values.get(position).ok_or_else(|| {
            SanduqError::introspection(
                &self.type_name,
                format!(
                    "constructor asked for argument {position} but only {} were resolved",
                    self.values.len()
                ),
            )
        })
    }

    /// The argument at `position`, downcast to `T`.
    ///
    /// ```rust,ignore
    /// let clock: Arc<Clock> = args.get(0)?;
    /// ```
    pub fn get<T: Any + Send + Sync>(&self, position: usize) -> Result<Arc<T>> {
        let raw = self.raw(position)?.clone();
        raw.downcast::<T>().map_err(|_| {
            SanduqError::introspection(
                &self.type_name,
                format!(
                    "argument {position} is not a {}",
                    type_name::<T>()
                ),
            )
        })
    }

    /// The argument at `position`, downcast to `T` and cloned out.
    pub fn cloned<T: Any + Send + Sync + Clone>(&self, position: usize) -> Result<T> {
        self.get::<T>(position).map(|value| (*value).clone())
    }

    /// The introspector the container resolved these arguments with.
    pub fn introspector(&self) -> Arc<dyn TypeIntrospector> {
        self.introspector.clone()
    }

    /// Settings of the container resolving these arguments.
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("type_name", &self.type_name)
            .field("len", &self.values.len())
            .finish()
    }
}

/// Discovers constructor signatures and builds instances.
///
/// # Errors
/// - [`SanduqError::TypeNotInstantiable`] — the type is missing or abstract
/// - [`SanduqError::Introspection`] — anything else went wrong inside
///   the introspector (never swallowed)
pub trait TypeIntrospector: Send + Sync {
    /// Type existence check: `None` if the type is unknown.
    fn kind_of(&self, type_name: &Identifier) -> Option<TypeKind>;

    /// The constructor parameters of a concrete type.
    fn constructor(&self, type_name: &Identifier) -> Result<ConstructorSignature>;

    /// Builds an instance from already resolved arguments.
    fn instantiate(&self, type_name: &Identifier, arguments: Arguments) -> Result<Instance>;

    /// `true` if the type is known and concrete.
    fn is_instantiable(&self, type_name: &Identifier) -> bool {
        matches!(self.kind_of(type_name), Some(TypeKind::Concrete))
    }

    /// Every type this introspector knows about (for suggestions).
    fn known_types(&self) -> Vec<Identifier> {
        Vec::new()
    }
}
