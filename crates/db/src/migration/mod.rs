//! Database migrations, run via the `migrator` binary or directly
//! through [`sea_orm_migration::MigratorTrait`].

pub use sea_orm_migration::prelude::*;

mod m20260727_000001_initial;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260727_000001_initial::Migration)]
    }
}
