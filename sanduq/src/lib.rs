//! # Sanduq — Dependency Injection Container for Rust
//!
//! A string-keyed IoC container. Types describe their constructors in a
//! [`TypeCatalog`]; the [`Container`] resolves whole object graphs from
//! those descriptions, caching `single` bindings and building `factory`
//! bindings fresh on every request.
//!
//! ```rust
//! use sanduq::prelude::*;
//!
//! struct Clock;
//!
//! let container = Container::with_catalog(
//!     TypeCatalog::new().with(TypeDescriptor::concrete("Clock").constructor(|_| Ok(instance(Clock)))),
//! );
//! container.single("Clock");
//!
//! assert!(container.has("Clock"));
//! assert!(container.get_as::<Clock>("Clock").is_ok());
//! ```

pub use sanduq_container::*;
pub use sanduq_support::*;
