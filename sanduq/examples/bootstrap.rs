//! Bootstrapping an application graph with Sanduq.
//!
//! Run with `RUST_LOG=sanduq_container=debug` to watch the resolver.

use std::sync::Arc;

use sanduq::inventory;
use sanduq::prelude::*;
use tracing_subscriber::EnvFilter;

// === Types ===

struct Config {
    database_url: String,
}

struct Database {
    url: String,
}

struct UserRepository {
    db: Arc<Database>,
}

struct UserService {
    repo: Arc<UserRepository>,
    page_size: usize,
}

impl UserService {
    fn list(&self) -> String {
        format!("first {} users from {}", self.page_size, self.repo.db.url)
    }
}

// === Catalog ===

// Discovered at startup through `TypeCatalog::discover`.
fn describe_repository() -> TypeDescriptor {
    TypeDescriptor::concrete("UserRepository")
        .parameter("db", "Database")
        .constructor(|args| Ok(instance(UserRepository { db: args.get(0)? })))
}

inventory::submit! {
    CatalogEntry::new("UserRepository", describe_repository)
}

fn catalog() -> TypeCatalog {
    TypeCatalog::discover()
        .with(TypeDescriptor::abstract_type("Repository"))
        .with(
            TypeDescriptor::concrete("Database")
                .parameter("config", "Config")
                .constructor(|args| {
                    let config: Arc<Config> = args.get(0)?;
                    Ok(instance(Database { url: config.database_url.clone() }))
                }),
        )
        .with(
            TypeDescriptor::concrete("UserService")
                .parameter("repo", "Repository")
                .with_default("page_size", 20usize)
                .constructor(|args| {
                    Ok(instance(UserService {
                        repo: args.get(0)?,
                        page_size: args.cloned(1)?,
                    }))
                }),
        )
}

// === Provider ===

struct PersistenceProvider;

impl Provider for PersistenceProvider {
    fn register(&self, registry: &mut dyn BindingRegistry) {
        registry.single("Database");
        registry.single_as("Repository", "UserRepository");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let container = Container::builder()
        .catalog(catalog())
        .factory_with("Config", |_| {
            Ok(instance(Config {
                database_url: String::from("postgres://localhost/app"),
            }))
        })
        .add_provider(&PersistenceProvider)
        .build();

    let service: Arc<UserService> = container.get_as("UserService")?;
    println!("{}", service.list());

    // `Repository` is a single binding: one instance for the whole graph
    let repo: Arc<UserRepository> = container.get_as("Repository")?;
    assert!(Arc::ptr_eq(&repo, &service.repo));

    match container.get("Repositry") {
        Err(e) => println!("{e}"),
        Ok(_) => unreachable!("typo should not resolve"),
    }

    Ok(())
}
