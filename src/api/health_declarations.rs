use std::net::SocketAddr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        ConnectInfo, Extension, Path, Query,
    },
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::health_declaration::DeclarationStatus;
use crate::error::{AppError, AppResult};
use crate::payload::{DeclarationPatch, NewDeclaration};
use crate::store::{
    DeclarationStore, ListOptions, SortField, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT,
};

const TABLE: &str = "health_declarations";

/// Raw list query string. Zero or missing `page`/`limit` fall back to defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
    pub status: Option<DeclarationStatus>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn into_options(self) -> ListOptions {
        let page = match self.page {
            None | Some(0) => DEFAULT_PAGE,
            Some(page) => page.max(1) as u64,
        };
        let limit = match self.limit {
            None | Some(0) => DEFAULT_LIMIT,
            Some(limit) => limit.clamp(1, MAX_LIMIT as i64) as u64,
        };
        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        ListOptions {
            page,
            limit,
            sort_by: self.sort_by.unwrap_or_default(),
            sort_order: self.sort_order.unwrap_or_default(),
            status: self.status,
            search,
        }
    }
}

/// Malformed ids cannot match a record, so they are reported as missing.
fn parse_id(id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(id.to_string()))
}

// POST /health-declarations
pub async fn create_declaration(
    Extension(store): Extension<DeclarationStore>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<NewDeclaration>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let ip_address = super::forwarded_ip(&headers)
        .or_else(|| peer.map(|ConnectInfo(addr)| addr.ip()))
        .map(|ip| ip.to_string());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let declaration = store.create(payload, ip_address, user_agent).await?;

    tracing::Span::current()
        .record("table", TABLE)
        .record("action", "create_declaration")
        .record("declaration_id", tracing::field::display(declaration.id))
        .record("business_event", "Health declaration submitted");

    Ok((StatusCode::CREATED, Json(declaration)))
}

// GET /health-declarations
pub async fn list_declarations(
    Extension(store): Extension<DeclarationStore>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let options = query.into_options();

    let page = store.find_all(&options).await?;

    tracing::Span::current()
        .record("table", TABLE)
        .record("action", "list_declarations");

    Ok(Json(page))
}

// GET /health-declarations/stats
pub async fn declaration_stats(
    Extension(store): Extension<DeclarationStore>,
) -> AppResult<impl IntoResponse> {
    let stats = store.stats().await?;

    tracing::Span::current()
        .record("table", TABLE)
        .record("action", "declaration_stats");

    Ok(Json(stats))
}

// GET /health-declarations/:id
pub async fn get_declaration(
    Extension(store): Extension<DeclarationStore>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::Span::current()
        .record("table", TABLE)
        .record("action", "get_declaration")
        .record("declaration_id", id.as_str());

    let declaration = store.find_one(parse_id(&id)?).await?;
    Ok(Json(declaration))
}

// PATCH /health-declarations/:id
pub async fn update_declaration(
    Extension(store): Extension<DeclarationStore>,
    Path(id): Path<String>,
    payload: Result<Json<DeclarationPatch>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    tracing::Span::current()
        .record("table", TABLE)
        .record("action", "update_declaration")
        .record("declaration_id", id.as_str());

    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let declaration = store.update(parse_id(&id)?, payload).await?;

    tracing::Span::current().record(
        "business_event",
        tracing::field::display(format_args!(
            "Health declaration is {}",
            declaration.status.as_str()
        )),
    );

    Ok(Json(declaration))
}

// DELETE /health-declarations/:id
pub async fn delete_declaration(
    Extension(store): Extension<DeclarationStore>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    tracing::Span::current()
        .record("table", TABLE)
        .record("action", "delete_declaration")
        .record("declaration_id", id.as_str());

    store.remove(parse_id(&id)?).await?;

    tracing::Span::current().record("business_event", "Health declaration deleted");
    Ok(StatusCode::NO_CONTENT)
}
