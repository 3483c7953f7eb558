//! Basic example of the Sanad resolver.
//!
//! Run with `RUST_LOG=sanad_container=trace cargo run --example basic`.

use std::sync::Arc;

use sanad::prelude::*;

// === Define your types ===

struct ConsoleLogger {
    prefix: String,
}

impl ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[{}] {msg}", self.prefix);
    }
}

struct Config {
    database_url: String,
}

struct Database {
    config: Arc<Config>,
    logger: Arc<ConsoleLogger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.config.database_url)
    }
}

struct UserService {
    db: Arc<Database>,
    page_size: i64,
}

impl UserService {
    fn list_users(&self) -> String {
        self.db.query(&format!("SELECT * FROM users LIMIT {}", self.page_size))
    }
}

// === Group the class declarations ===

struct AppClasses;

impl ClassProvider for AppClasses {
    fn register(&self, registry: &mut ClassRegistry) {
        registry.register(
            ClassDescriptor::of::<ConsoleLogger, _>(|args| Ok(ConsoleLogger { prefix: args.string(0)? }))
                .param(Parameter::new("prefix").default_value("LOG")),
        );
        registry.register(
            ClassDescriptor::of::<Config, _>(|args| {
                let database_url = args.string(0)?;
                if !database_url.contains("://") {
                    return Err(SanadError::construction(
                        args.class(),
                        format!("{database_url:?} is not a database URL"),
                    ));
                }
                Ok(Config { database_url })
            })
            .param(Parameter::new("database_url")),
        );
        registry.register(
            ClassDescriptor::of::<Database, _>(|args| {
                Ok(Database {
                    config: args.instance(0)?,
                    logger: args.instance(1)?,
                })
            })
            .param(Parameter::of::<Config>("config"))
            .param(Parameter::of::<ConsoleLogger>("logger")),
        );
        registry.register(
            ClassDescriptor::of::<UserService, _>(|args| {
                Ok(UserService {
                    db: args.instance(0)?,
                    page_size: args.int(1)?,
                })
            })
            .param(Parameter::of::<Database>("db"))
            .param(Parameter::new("page_size").default_value(20)),
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sanad_container=debug".into()),
        )
        .init();

    let container = Container::builder()
        .configuration_path(concat!(env!("CARGO_MANIFEST_DIR"), "/examples/container.toml"))
        .add_provider(&AppClasses)
        .build();

    // Unbound class: Database comes from the `db` singleton binding.
    let service = container.get_as::<UserService>("UserService")?;
    println!("{}", service.list_users());

    // Same singleton database, new transient service with a larger page.
    let service = container.get_as_with::<UserService>("UserService", Overrides::new().with("page_size", 100))?;
    println!("{}", service.list_users());

    println!("{container:?}");
    Ok(())
}
