use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde_json::{json, Value};

use super::ApiContext;
use crate::store::DeclarationStore;

pub const SERVICE_NAME: &str = "health-declaration-api";

// GET /health
pub async fn health_check(
    Extension(ctx): Extension<Arc<ApiContext>>,
    Extension(store): Extension<DeclarationStore>,
) -> Json<Value> {
    let database = match store.connection().ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Database ping failed: {}", e);
            "disconnected"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime": ctx.started_at.elapsed().as_secs_f64(),
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": ctx.config.environment,
        "database": database,
    }))
}

// GET /
pub async fn root(Extension(ctx): Extension<Arc<ApiContext>>) -> Json<Value> {
    let prefix = ctx.config.route_prefix();

    Json(json!({
        "message": "Health Declaration API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": format!("{prefix}/health"),
            "declarations": format!("{prefix}/health-declarations"),
            "metrics": "/metrics",
        },
    }))
}
