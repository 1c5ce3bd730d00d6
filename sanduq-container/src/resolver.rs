//! Dependency resolution.
//!
//! Given an identifier, the resolver decides through the registration
//! model how to produce an instance, and recursively resolves
//! constructor parameters through itself:
//!
//! 1. A registration always wins over ad-hoc construction.
//! 2. A cached failure is returned as-is, never retried.
//! 3. Singles construct their implementation once and cache it.
//! 4. Factories call their strategy, or construct the identifier itself.
//! 5. Unregistered identifiers are constructed directly if the
//!    introspector knows them as concrete types.
//!
//! Failures of nested dependencies are wrapped in
//! [`SanduqError::ParameterUnresolved`] on the way up, so the caller
//! learns which constructor and which parameter failed.

use tracing::{debug, trace, warn};

use sanduq_support::rendering::render_chain;

use crate::container::Container;
use crate::error::{
    CyclicDependencyError, ParameterUnresolvedError, RegistrationError, Result, SanduqError,
    TypeUnavailable, UnresolvedReason,
};
use crate::identifier::Identifier;
use crate::introspect::{Arguments, ConstructorSignature, Instance, ParameterDescriptor, TypeKind};
use crate::registry::{Binding, Registration};

/// Identifiers currently being resolved, outermost first.
///
/// Used for cycle detection: an identifier that shows up again while
/// it is still on the path depends on itself.
#[derive(Debug, Default)]
struct ResolutionPath {
    stack: Vec<Identifier>,
}

impl ResolutionPath {
    fn enter(&mut self, identifier: &Identifier) -> Result<()> {
        if let Some(start) = self.stack.iter().position(|k| k == identifier) {
            let mut chain: Vec<Identifier> = self.stack[start..].to_vec();
            chain.push(identifier.clone());

            warn!(cycle = %render_chain(&chain), "Cyclic dependency detected!");

            return Err(SanduqError::CyclicDependency(CyclicDependencyError { chain }));
        }
        self.stack.push(identifier.clone());
        Ok(())
    }

    fn leave(&mut self) {
        self.stack.pop();
    }
}

/// One top-level resolution.
///
/// Creation strategies resolve through [`Container::get`], which starts
/// a fresh resolver; cycles running through a strategy are therefore
/// not visible on the path.
pub(crate) struct Resolver<'c> {
    container: &'c Container,
    path: ResolutionPath,
}

impl<'c> Resolver<'c> {
    pub fn new(container: &'c Container) -> Self {
        Self {
            container,
            path: ResolutionPath::default(),
        }
    }

    /// Resolves `identifier` to an instance or a failure.
    pub fn resolve(&mut self, identifier: &Identifier) -> Result<Instance> {
        trace!(identifier = %identifier, "Resolving");

        let detect_cycles = self.container.settings().detect_cycles;
        if detect_cycles {
            self.path.enter(identifier)?;
        }

        let outcome = match self.container.registration(identifier.as_str()) {
            Some(registration) => self.resolve_registered(&registration),
            None => self.resolve_unregistered(identifier),
        };

        if detect_cycles {
            self.path.leave();
        }
        outcome
    }

    fn resolve_registered(&mut self, registration: &Registration) -> Result<Instance> {
        if let Some(failure) = registration.failure() {
            trace!(identifier = %registration.identifier(), "Returning cached failure");
            return Err(failure.clone());
        }

        match registration.binding() {
            Binding::Single { implementation, instance } => {
                if let Some(cached) = instance.get() {
                    trace!(identifier = %registration.identifier(), "Returning cached instance");
                    return Ok(cached.clone());
                }

                match self.construct_registered(registration, implementation) {
                    Ok(built) => Ok(registration.cache_instance(built)),
                    Err(failure) => Err(registration.cache_failure(failure)),
                }
            }
            Binding::Factory { strategy: Some(strategy) } => {
                trace!(identifier = %registration.identifier(), "Invoking creation strategy");
                strategy(self.container)
            }
            Binding::Factory { strategy: None } => self
                .construct_registered(registration, registration.identifier())
                .map_err(|failure| registration.cache_failure(failure)),
        }
    }

    /// Constructs the target of a registration, reporting a missing or
    /// abstract target as a [`SanduqError::Registration`].
    fn construct_registered(
        &mut self,
        registration: &Registration,
        implementation: &Identifier,
    ) -> Result<Instance> {
        let registration_error = |reason: TypeUnavailable| {
            SanduqError::Registration(RegistrationError {
                identifier: registration.identifier().clone(),
                kind: registration.kind(),
                implementation: implementation.clone(),
                reason,
            })
        };

        match self.container.introspector().kind_of(implementation) {
            None => return Err(registration_error(TypeUnavailable::Missing)),
            Some(TypeKind::Abstract) => return Err(registration_error(TypeUnavailable::Abstract)),
            Some(TypeKind::Concrete) => {}
        }

        self.construct(implementation).map_err(|failure| match failure {
            SanduqError::TypeNotInstantiable(e) if e.type_name == *implementation => {
                registration_error(e.reason)
            }
            other => other,
        })
    }

    /// No registration: the identifier itself must be a concrete type.
    /// Nothing is cached on this path. Only a missing or abstract type is
    /// reported as not found; other introspection failures pass through.
    fn resolve_unregistered(&mut self, identifier: &Identifier) -> Result<Instance> {
        let container = self.container;

        if !container.introspector().is_instantiable(identifier) {
            return Err(container.not_found(identifier));
        }

        self.construct(identifier).map_err(|failure| match failure {
            SanduqError::TypeNotInstantiable(e) if e.type_name == *identifier => {
                container.not_found(identifier)
            }
            other => other,
        })
    }

    /// Introspects the constructor of `type_name`, resolves every
    /// parameter in declaration order and builds the instance.
    fn construct(&mut self, type_name: &Identifier) -> Result<Instance> {
        let container = self.container;
        let introspector = container.introspector();

        let signature = introspector.constructor(type_name)?;
        if signature.is_parameterless() {
            trace!(type_name = %type_name, "Parameterless constructor");
        }

        let mut values = Vec::with_capacity(signature.parameters.len());
        for parameter in &signature.parameters {
            values.push(self.resolve_parameter(&signature, parameter)?);
        }

        let arguments = Arguments::new(type_name.clone(), values, introspector.clone())
            .with_settings(container.settings().clone());
        let built = introspector.instantiate(type_name, arguments)?;

        debug!(type_name = %type_name, "Constructed instance");
        Ok(built)
    }

    fn resolve_parameter(
        &mut self,
        signature: &ConstructorSignature,
        parameter: &ParameterDescriptor,
    ) -> Result<Instance> {
        let Some(declared_type) = &parameter.declared_type else {
            return parameter
                .default
                .clone()
                .ok_or_else(|| unresolved(signature, parameter, UnresolvedReason::NoDefault));
        };

        match (self.resolve(declared_type), &parameter.default) {
            (Ok(value), _) => Ok(value),
            (Err(failure), Some(default)) if failure.is_not_found() => {
                trace!(
                    parameter = %parameter.name,
                    declared_type = %declared_type,
                    "Dependency not found, using default"
                );
                Ok(default.clone())
            }
            (Err(failure), _) => Err(unresolved(
                signature,
                parameter,
                UnresolvedReason::Dependency {
                    declared_type: declared_type.clone(),
                    cause: Box::new(failure),
                },
            )),
        }
    }
}

fn unresolved(
    signature: &ConstructorSignature,
    parameter: &ParameterDescriptor,
    reason: UnresolvedReason,
) -> SanduqError {
    SanduqError::ParameterUnresolved(ParameterUnresolvedError {
        parameter: parameter.name.clone(),
        position: parameter.position,
        type_name: signature.type_name.clone(),
        signature: signature.render(),
        reason,
    })
}
