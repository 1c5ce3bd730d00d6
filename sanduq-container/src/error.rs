//! Error types for Sanduq container operations.
//!
//! Failures are values while the resolver recurses (so a registration
//! can cache them) and become errors at [`Container::get`]. Nested
//! failures are wrapped, never dropped, so the final message names the
//! whole path down to the original cause.
//!
//! [`Container::get`]: crate::container::Container::get

use std::fmt;
use std::sync::Arc;

use sanduq_support::rendering::render_chain;

use crate::identifier::Identifier;
use crate::kind::RegistrationKind;

/// Main error type for all Sanduq operations.
///
/// Cloneable so a cached failure can be handed out on every later call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SanduqError {
    /// Identifier has no registration and names no instantiable type.
    #[error("{}", .0)]
    NotFound(NotFoundError),

    /// A registration exists but its implementation cannot be built.
    #[error("{}", .0)]
    Registration(RegistrationError),

    /// A constructor parameter could not be satisfied.
    #[error(transparent)]
    ParameterUnresolved(ParameterUnresolvedError),

    /// The introspector was asked about a missing or abstract type.
    #[error("{}", .0)]
    TypeNotInstantiable(TypeNotInstantiableError),

    /// The introspector itself failed while inspecting or building a type.
    #[error("{}", .0)]
    Introspection(IntrospectionError),

    /// A type (indirectly) requires itself.
    #[error("{}", .0)]
    CyclicDependency(CyclicDependencyError),

    /// The resolved instance is not of the requested Rust type.
    #[error("Type mismatch for {identifier}: expected {expected}")]
    TypeMismatch {
        identifier: Identifier,
        expected: &'static str,
    },

    /// A creation strategy or constructor failed with its own error.
    #[error("Failed to construct {identifier}: {source}")]
    ConstructionFailed {
        identifier: Identifier,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl SanduqError {
    /// Wraps an arbitrary error raised while constructing `identifier`.
    pub fn construction(
        identifier: impl Into<Identifier>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SanduqError::ConstructionFailed {
            identifier: identifier.into(),
            source: Arc::from(source.into()),
        }
    }

    /// Shorthand for an [`IntrospectionError`].
    pub fn introspection(type_name: impl Into<Identifier>, reason: impl Into<String>) -> Self {
        SanduqError::Introspection(IntrospectionError {
            type_name: type_name.into(),
            reason: reason.into(),
        })
    }

    /// Returns `true` for [`SanduqError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, SanduqError::NotFound(_))
    }

    /// The failure one level down, if this one wraps another.
    pub fn cause(&self) -> Option<&SanduqError> {
        match self {
            SanduqError::ParameterUnresolved(ParameterUnresolvedError {
                reason: UnresolvedReason::Dependency { cause, .. },
                ..
            }) => Some(&**cause),
            _ => None,
        }
    }

    /// Follows [`cause`](Self::cause) down to the original failure.
    pub fn root_cause(&self) -> &SanduqError {
        let mut current = self;
        while let Some(next) = current.cause() {
            current = next;
        }
        current
    }
}

/// Why a type cannot be instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeUnavailable {
    /// The type catalog does not know the type.
    Missing,
    /// The type is abstract (an interface-like contract).
    Abstract,
}

impl fmt::Display for TypeUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeUnavailable::Missing => write!(f, "type is not known to the type catalog"),
            TypeUnavailable::Abstract => write!(f, "type is abstract and cannot be instantiated"),
        }
    }
}

/// Error when nothing can satisfy an identifier.
#[derive(Debug, Clone)]
pub struct NotFoundError {
    /// The identifier that was requested
    pub requested: Identifier,
    /// Similar identifiers that ARE known (for "did you mean?" suggestions)
    pub suggestions: Vec<Identifier>,
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not registered and cannot be resolved",
            self.requested
        )?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: register it with .single() / .factory() or add a concrete type to the catalog"
        )
    }
}

/// Error when a registration points at something that cannot be built.
#[derive(Debug, Clone)]
pub struct RegistrationError {
    /// The registered identifier
    pub identifier: Identifier,
    pub kind: RegistrationKind,
    /// The type the registration tries to construct
    pub implementation: Identifier,
    pub reason: TypeUnavailable,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RegistrationKind::Single => write!(
                f,
                "'{}' is registered to '{}' but cannot be resolved",
                self.identifier, self.implementation
            )?,
            RegistrationKind::Factory => write!(
                f,
                "'{}' is registered to the default factory but cannot be resolved",
                self.identifier
            )?,
        }
        write!(f, "\n  Reason: {}", self.reason)?;
        write!(
            f,
            "\n  Hint: bind '{}' to a concrete type, or give the factory a creation strategy",
            self.identifier
        )
    }
}

/// Why a constructor parameter could not be satisfied.
#[derive(Debug, Clone)]
pub enum UnresolvedReason {
    /// No declared type and no default value.
    NoDefault,
    /// The declared type failed to resolve.
    Dependency {
        declared_type: Identifier,
        cause: Box<SanduqError>,
    },
}

/// Error when a constructor parameter cannot be resolved.
///
/// Names the constructor and the parameter position, with the original
/// cause attached.
#[derive(Debug, Clone)]
pub struct ParameterUnresolvedError {
    pub parameter: String,
    pub position: usize,
    /// The type whose constructor needs the parameter
    pub type_name: Identifier,
    /// Rendered constructor signature
    pub signature: String,
    pub reason: UnresolvedReason,
}

impl fmt::Display for ParameterUnresolvedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' needs an unresolvable parameter name={} at position={}",
            self.type_name, self.parameter, self.position
        )?;
        write!(f, "\n  Constructor: {}", self.signature)?;

        match &self.reason {
            UnresolvedReason::NoDefault => {
                write!(f, "\n  Reason: parameter has no declared type and no default value")?;
                write!(
                    f,
                    "\n  Hint: declare a type or a default value for `{}`",
                    self.parameter
                )
            }
            UnresolvedReason::Dependency { declared_type, cause } => {
                write!(f, "\n  Dependency: {declared_type}")?;
                write!(f, "\n  Caused by: {cause}")
            }
        }
    }
}

impl std::error::Error for ParameterUnresolvedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.reason {
            UnresolvedReason::NoDefault => None,
            UnresolvedReason::Dependency { cause, .. } => Some(&**cause),
        }
    }
}

/// Error when a type cannot be instantiated at all.
#[derive(Debug, Clone)]
pub struct TypeNotInstantiableError {
    pub type_name: Identifier,
    pub reason: TypeUnavailable,
}

impl fmt::Display for TypeNotInstantiableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' cannot be instantiated: {}", self.type_name, self.reason)
    }
}

/// Error when the introspector fails unexpectedly.
#[derive(Debug, Clone)]
pub struct IntrospectionError {
    pub type_name: Identifier,
    pub reason: String,
}

impl fmt::Display for IntrospectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Introspection of '{}' failed: {}", self.type_name, self.reason)
    }
}

/// Error when a dependency cycle is detected during resolve.
///
/// Shows the full chain so you can see WHERE the cycle is.
#[derive(Debug, Clone)]
pub struct CyclicDependencyError {
    /// Example: ["A", "B", "C", "A"]
    pub chain: Vec<Identifier>,
}

impl fmt::Display for CyclicDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cyclic dependency detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: break the cycle with a factory strategy or restructure the constructors"
        )
    }
}

/// Convenient Result type for Sanduq operations.
pub type Result<T> = std::result::Result<T, SanduqError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn no_default(parameter: &str) -> SanduqError {
        SanduqError::ParameterUnresolved(ParameterUnresolvedError {
            parameter: parameter.to_string(),
            position: 1,
            type_name: Identifier::new("Greeter"),
            signature: "Greeter::new(clock: Clock, greeting)".to_string(),
            reason: UnresolvedReason::NoDefault,
        })
    }

    #[test]
    fn not_found_error_display() {
        let err = SanduqError::NotFound(NotFoundError {
            requested: Identifier::new("Mailr"),
            suggestions: vec![Identifier::new("Mailer")],
        });

        let msg = format!("{err}");
        assert!(msg.contains("not registered"));
        assert!(msg.contains("Mailr"));
        assert!(msg.contains("- Mailer"));
    }

    #[test]
    fn registration_error_display() {
        let err = SanduqError::Registration(RegistrationError {
            identifier: Identifier::new("Mailer"),
            kind: RegistrationKind::Single,
            implementation: Identifier::new("MailerContract"),
            reason: TypeUnavailable::Abstract,
        });

        let msg = format!("{err}");
        assert!(msg.contains("registered to 'MailerContract'"));
        assert!(msg.contains("abstract"));
    }

    #[test]
    fn parameter_error_names_parameter_and_position() {
        let msg = format!("{}", no_default("greeting"));
        assert!(msg.contains("name=greeting"));
        assert!(msg.contains("position=1"));
        assert!(msg.contains("Greeter::new(clock: Clock, greeting)"));
    }

    #[test]
    fn nested_failure_keeps_full_path() {
        let inner = no_default("greeting");
        let outer = SanduqError::ParameterUnresolved(ParameterUnresolvedError {
            parameter: "greeter".to_string(),
            position: 0,
            type_name: Identifier::new("Reception"),
            signature: "Reception::new(greeter: Greeter)".to_string(),
            reason: UnresolvedReason::Dependency {
                declared_type: Identifier::new("Greeter"),
                cause: Box::new(inner),
            },
        });

        let msg = format!("{outer}");
        assert!(msg.contains("Reception"));
        assert!(msg.contains("name=greeter"));
        assert!(msg.contains("name=greeting"));

        assert!(outer.cause().is_some());
        match outer.root_cause() {
            SanduqError::ParameterUnresolved(e) => assert_eq!(e.parameter, "greeting"),
            other => panic!("Expected ParameterUnresolved, got: {other:?}"),
        }
    }

    #[test]
    fn nested_failure_is_walkable_through_source() {
        use std::error::Error as _;

        let outer = SanduqError::ParameterUnresolved(ParameterUnresolvedError {
            parameter: "greeter".to_string(),
            position: 0,
            type_name: Identifier::new("Reception"),
            signature: "Reception::new(greeter: Greeter)".to_string(),
            reason: UnresolvedReason::Dependency {
                declared_type: Identifier::new("Greeter"),
                cause: Box::new(no_default("greeting")),
            },
        });

        let mut chain = vec![outer.to_string()];
        let mut current = outer.source();
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }

        assert_eq!(chain.len(), 2);
        assert!(chain[0].contains("name=greeter"));
        assert!(chain[1].contains("name=greeting"));
        assert!(no_default("greeting").source().is_none());
    }

    #[test]
    fn cyclic_dependency_error_display() {
        let err = SanduqError::CyclicDependency(CyclicDependencyError {
            chain: vec![
                Identifier::new("A"),
                Identifier::new("B"),
                Identifier::new("A"),
            ],
        });

        let msg = format!("{err}");
        assert!(msg.contains("Cyclic"));
        assert!(msg.contains("A → B → A"));
    }

    #[test]
    fn construction_failure_keeps_source() {
        use std::error::Error as _;

        let err = SanduqError::construction("Database", "connection refused");
        assert!(format!("{err}").contains("connection refused"));
        assert!(err.source().is_some());

        let cloned = err.clone();
        assert!(format!("{cloned}").contains("Database"));
    }
}
