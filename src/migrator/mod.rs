use sea_orm_migration::prelude::*;

mod m20231207_000001_create_health_declarations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20231207_000001_create_health_declarations::Migration,
        )]
    }
}
