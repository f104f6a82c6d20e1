#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use health_declaration_server::app::app;
use health_declaration_server::config::ServerConfig;
use health_declaration_server::migrator::Migrator;
use health_declaration_server::payload::NewDeclaration;
use health_declaration_server::store::DeclarationStore;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;

/// Fresh in-memory SQLite database with the production migrations applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn setup_store() -> DeclarationStore {
    DeclarationStore::new(setup_db().await)
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        ..ServerConfig::default()
    }
}

pub async fn build_test_app() -> (Router, DeclarationStore) {
    let store = setup_store().await;
    (app(store.clone(), test_config(), None), store)
}

pub fn declaration(name: &str) -> NewDeclaration {
    NewDeclaration {
        name: name.to_string(),
        temperature: 36.5,
        has_symptoms: false,
        symptoms: None,
        has_contact: false,
        contact_details: None,
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sends a request and returns the status with the parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
