use health_declaration_server::{migrator, seed};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    health_declaration_server::telemetry::init_telemetry("health-declaration-seed");

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let db = Database::connect(&database_url).await?;
    migrator::Migrator::up(&db, None).await?;

    let inserted = seed::run(&db).await?;
    tracing::info!("Seeding finished, {} rows inserted", inserted);

    Ok(())
}
