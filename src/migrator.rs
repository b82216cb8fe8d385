use sea_orm_migration::{MigrationTrait, MigratorTrait};

use crate::modules::books;

/// Schema migrations of every module, applied at startup.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        books::migrations::all()
    }
}
