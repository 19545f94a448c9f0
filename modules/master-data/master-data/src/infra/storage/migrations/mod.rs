use sea_orm_migration::prelude::*;

mod initial_001;

/// Creates `master_data`. Requires the `users` table from the accounts migrator.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(initial_001::Migration)]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("master_data_migrations").into_iden()
    }
}
