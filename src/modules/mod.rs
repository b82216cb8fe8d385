pub mod books;

use bookshelf_kernel::ModuleRegistry;
use sea_orm::DatabaseConnection;

/// Register all project-specific modules, each bound to the shared connection
pub fn register_all(registry: &mut ModuleRegistry, db: &DatabaseConnection) {
    registry.register(books::create_module(db.clone()));
}
