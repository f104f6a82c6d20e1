use health_declaration_server::{
    app::app, config::ServerConfig, metrics, migrator, store::DeclarationStore,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present (dotenvy)
    dotenvy::dotenv().ok();

    health_declaration_server::telemetry::init_telemetry("health-declaration-api");

    let config = ServerConfig::from_env()?;

    let prometheus = axum_prometheus::PrometheusMetricLayer::pair();

    let db = Database::connect(&config.database_url).await?;
    migrator::Migrator::up(&db, None).await?;

    let store = DeclarationStore::new(db);
    metrics::init_metrics(&store).await;

    let addr = config.socket_addr();
    let prefix = config.route_prefix();
    let app = app(store, config, Some(prometheus));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {} (routes under {}/)", addr, prefix);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down server"),
        Err(err) => tracing::error!("Unable to listen for shutdown signal: {}", err),
    }
}
