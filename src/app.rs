use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method, Request},
    routing::get,
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{self, ApiContext};
use crate::config::ServerConfig;
use crate::store::DeclarationStore;

pub type PrometheusPair = (
    axum_prometheus::PrometheusMetricLayer<'static>,
    metrics_exporter_prometheus::PrometheusHandle,
);

/// Builds the HTTP application. `prometheus` mounts `/metrics` when present.
pub fn app(
    store: DeclarationStore,
    config: ServerConfig,
    prometheus: Option<PrometheusPair>,
) -> Router {
    let prefix = config.route_prefix();
    let cors = cors_layer(&config.cors_origin);
    let ctx = Arc::new(ApiContext::new(config));

    let routes = Router::new()
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health_check))
        .route(
            "/health-declarations",
            get(api::health_declarations::list_declarations)
                .post(api::health_declarations::create_declaration),
        )
        .route(
            "/health-declarations/stats",
            get(api::health_declarations::declaration_stats),
        )
        .route(
            "/health-declarations/:id",
            get(api::health_declarations::get_declaration)
                .patch(api::health_declarations::update_declaration)
                .delete(api::health_declarations::delete_declaration),
        );

    let router = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&prefix, routes)
    };

    let router = router
        .layer(Extension(store))
        .layer(Extension(ctx))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str());

                    // "METHOD /path", e.g. "PATCH /api/health-declarations/:id"
                    let span_name = match matched_path {
                        Some(path) => format!("{} {}", request.method(), path),
                        None => format!("{} {}", request.method(), request.uri().path()),
                    };

                    let user_ip = api::forwarded_ip(request.headers())
                        .map(|ip| ip.to_string())
                        .unwrap_or_else(|| "unknown".to_string());

                    tracing::info_span!(
                        "request",
                        "otel.name" = span_name,
                        user_ip = %user_ip,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        // Filled in by the handlers
                        table = tracing::field::Empty,
                        action = tracing::field::Empty,
                        declaration_id = tracing::field::Empty,
                        business_event = tracing::field::Empty,
                        error = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_request(|_request: &Request<axum::body::Body>, _span: &tracing::Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(cors);

    match prometheus {
        Some((layer, handle)) => router
            .route("/metrics", get(move || async move { handle.render() }))
            .layer(layer),
        None => router,
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true);

    match origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
            layer
        }
    }
}
