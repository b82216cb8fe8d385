use sea_orm_migration::MigrationTrait;

mod m20240601_000001_create_books; // keep filename + module name in sync

/// Migrations owned by the books module, oldest first.
pub fn all() -> Vec<Box<dyn MigrationTrait>> {
    vec![Box::new(m20240601_000001_create_books::Migration)]
}
