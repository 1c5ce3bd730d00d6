//! Types and catalogs shared by the unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::catalog::{TypeCatalog, TypeDescriptor};
use crate::introspect::instance;

static NEXT_CLOCK: AtomicU32 = AtomicU32::new(0);

#[derive(Debug)]
pub struct Clock {
    pub serial: u32,
}

impl Default for Clock {
    fn default() -> Self {
        Self { serial: NEXT_CLOCK.fetch_add(1, Ordering::SeqCst) }
    }
}

pub struct SmtpMailer {
    pub clock: Arc<Clock>,
}

pub struct SendmailMailer;

pub struct Greeter {
    pub greeting: String,
}

/// Clock, Mailer (abstract), SmtpMailer(clock: Clock), SendmailMailer,
/// Greeter(greeting = "hello") and Broken(dsn) with no way to fill `dsn`.
pub fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(TypeDescriptor::from_default::<Clock>("Clock"))
        .with(TypeDescriptor::abstract_type("Mailer"))
        .with(
            TypeDescriptor::concrete("SmtpMailer")
                .parameter("clock", "Clock")
                .constructor(|args| Ok(instance(SmtpMailer { clock: args.get(0)? }))),
        )
        .with(TypeDescriptor::concrete("SendmailMailer").constructor(|_| Ok(instance(SendmailMailer))))
        .with(
            TypeDescriptor::concrete("Greeter")
                .with_default("greeting", String::from("hello"))
                .constructor(|args| Ok(instance(Greeter { greeting: args.cloned(0)? }))),
        )
        .with(
            TypeDescriptor::concrete("Broken")
                .untyped("dsn")
                .constructor(|_| Ok(instance(()))),
        )
}
