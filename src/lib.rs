//! bookshelf application library
//!
//! Wires the books module to the shared database connection and serves it
//! over HTTP.

pub mod migrator;
pub mod modules;
mod utils;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sea_orm::DatabaseConnection;

pub use migrator::Migrator;

/// Open the database described by `settings` and bring its schema up to date.
pub async fn connect_and_migrate(settings: &Settings) -> anyhow::Result<DatabaseConnection> {
    let db = bookshelf_db::connect(&settings.database)
        .await
        .context("could not load the database")?;

    bookshelf_db::migrate::<Migrator>(&db)
        .await
        .context("could not migrate db")?;

    Ok(db)
}

/// Registry with every module bound to `db`.
pub fn build_registry(db: &DatabaseConnection) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db);
    registry
}

/// Run the service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let db = connect_and_migrate(&settings).await?;
    let registry = build_registry(&db);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    served
}
