//! Core container implementation for Sanduq DI.

pub mod catalog;
pub mod container;
pub mod error;
pub mod identifier;
pub mod introspect;
pub mod kind;
pub mod provider;
pub(crate) mod registry;
pub(crate) mod resolver;
pub mod settings;

#[cfg(test)]
mod fixtures;

pub use catalog::{CatalogEntry, TypeCatalog, TypeDescriptor};
pub use container::{Container, ContainerBuilder, prelude};
pub use error::{Result, SanduqError};
pub use identifier::Identifier;
pub use introspect::{Instance, instance};
pub use kind::RegistrationKind;
pub use registry::CreationStrategy;

#[doc(hidden)]
pub use inventory;
