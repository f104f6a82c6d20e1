use chrono::{Local, NaiveDateTime, NaiveTime, TimeZone};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::health_declaration::{self, DeclarationStatus};
use crate::entities::HealthDeclaration;
use crate::error::{AppError, AppResult};
use crate::payload::{DeclarationPatch, NewDeclaration};
use crate::validation::{validate_new, validate_patch};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "temperature")]
    Temperature,
}

impl SortField {
    fn column(self) -> health_declaration::Column {
        match self {
            SortField::CreatedAt => health_declaration::Column::CreatedAt,
            SortField::Name => health_declaration::Column::Name,
            SortField::Temperature => health_declaration::Column::Temperature,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Listing parameters. `page` and `limit` are expected to be clamped by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    pub page: u64,
    pub limit: u64,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub status: Option<DeclarationStatus>,
    pub search: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            status: None,
            search: None,
        }
    }
}

impl ListOptions {
    fn select(&self) -> Select<HealthDeclaration> {
        let mut query = HealthDeclaration::find();

        if let Some(status) = self.status {
            query = query.filter(health_declaration::Column::Status.eq(status));
        }
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(search_condition(term));
        }

        query
            .order_by(self.sort_by.column(), self.sort_order.into())
            .order_by(health_declaration::Column::Id, Order::Asc)
    }
}

/// Case-insensitive substring match over the free-text columns.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));

    [
        health_declaration::Column::Name,
        health_declaration::Column::Symptoms,
        health_declaration::Column::ContactDetails,
    ]
    .into_iter()
    .fold(Condition::any(), |condition, column| {
        condition.add(
            Expr::expr(Func::lower(Expr::col((HealthDeclaration, column))))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
    })
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationStats {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub today_submissions: u64,
}

/// Local-server midnight of the current day, as naive UTC.
pub fn start_of_today() -> NaiveDateTime {
    let midnight = Local::now().date_naive().and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.naive_utc())
        .unwrap_or(midnight)
}

/// Persistence for health declarations. Validation runs before every write.
#[derive(Clone)]
pub struct DeclarationStore {
    db: DatabaseConnection,
}

impl DeclarationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create(
        &self,
        input: NewDeclaration,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<health_declaration::Model> {
        let input = input.trimmed();
        if let Err(e) = validate_new(&input) {
            warn!(field = e.field, "Rejected health declaration: {}", e);
            return Err(e.into());
        }

        let now = chrono::Utc::now().naive_utc();
        let declaration = health_declaration::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            temperature: Set(input.temperature),
            has_symptoms: Set(input.has_symptoms),
            symptoms: Set(input.symptoms),
            has_contact: Set(input.has_contact),
            contact_details: Set(input.contact_details),
            status: Set(DeclarationStatus::Pending),
            ip_address: Set(ip_address),
            user_agent: Set(user_agent),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::storage("Failed to create health declaration"))?;

        crate::metrics::record_created(declaration.status);
        info!(
            "Health declaration created with ID: {} for {}",
            declaration.id, declaration.name
        );

        Ok(declaration)
    }

    pub async fn find_all(
        &self,
        options: &ListOptions,
    ) -> AppResult<Paginated<health_declaration::Model>> {
        let page = options.page.max(1);
        let limit = options.limit.max(1);

        let paginator = options.select().paginate(&self.db, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(AppError::storage("Failed to fetch health declarations"))?;
        // Pages past the end never reach the database, so huge offsets cannot overflow.
        let in_range = (page - 1)
            .checked_mul(limit)
            .is_some_and(|offset| offset < total);
        let data = if in_range {
            paginator
                .fetch_page(page - 1)
                .await
                .map_err(AppError::storage("Failed to fetch health declarations"))?
        } else {
            Vec::new()
        };

        let total_pages = total.div_ceil(limit);
        info!(
            "Retrieved {} health declarations (page {} of {})",
            data.len(),
            page,
            total_pages
        );

        Ok(Paginated {
            data,
            total,
            page,
            limit,
            total_pages,
        })
    }

    pub async fn find_one(&self, id: Uuid) -> AppResult<health_declaration::Model> {
        HealthDeclaration::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::storage("Failed to fetch health declaration"))?
            .ok_or_else(|| {
                warn!("Health declaration with ID {} not found", id);
                AppError::NotFound(id.to_string())
            })
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: DeclarationPatch,
    ) -> AppResult<health_declaration::Model> {
        let existing = self.find_one(id).await?;
        let patch = patch.trimmed();
        if let Err(e) = validate_patch(&patch, &existing) {
            warn!(field = e.field, "Rejected update of health declaration {}: {}", id, e);
            return Err(e.into());
        }

        let previous_status = existing.status;
        let status_only = patch.is_status_only();
        let mut declaration: health_declaration::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            declaration.name = Set(name);
        }
        if let Some(temperature) = patch.temperature {
            declaration.temperature = Set(temperature);
        }
        if let Some(has_symptoms) = patch.has_symptoms {
            declaration.has_symptoms = Set(has_symptoms);
        }
        if let Some(symptoms) = patch.symptoms {
            declaration.symptoms = Set(Some(symptoms));
        }
        if let Some(has_contact) = patch.has_contact {
            declaration.has_contact = Set(has_contact);
        }
        if let Some(contact_details) = patch.contact_details {
            declaration.contact_details = Set(Some(contact_details));
        }
        if let Some(status) = patch.status {
            declaration.status = Set(status);
        }
        declaration.updated_at = Set(chrono::Utc::now().naive_utc());

        let declaration = declaration
            .update(&self.db)
            .await
            .map_err(AppError::storage("Failed to update health declaration"))?;

        crate::metrics::record_status_change(previous_status, declaration.status);
        if status_only {
            info!(
                "Health declaration {} moved from {} to {}",
                id,
                previous_status.as_str(),
                declaration.status.as_str()
            );
        } else {
            info!("Health declaration updated with ID: {}", id);
        }

        Ok(declaration)
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let existing = self.find_one(id).await?;
        let status = existing.status;

        existing
            .delete(&self.db)
            .await
            .map_err(AppError::storage("Failed to delete health declaration"))?;

        crate::metrics::record_deleted(status);
        info!("Health declaration deleted with ID: {}", id);

        Ok(())
    }

    pub async fn stats(&self) -> AppResult<DeclarationStats> {
        let by_status = |status: DeclarationStatus| {
            HealthDeclaration::find()
                .filter(health_declaration::Column::Status.eq(status))
                .count(&self.db)
        };

        let (total, pending, approved, rejected, today_submissions) = futures::try_join!(
            HealthDeclaration::find().count(&self.db),
            by_status(DeclarationStatus::Pending),
            by_status(DeclarationStatus::Approved),
            by_status(DeclarationStatus::Rejected),
            HealthDeclaration::find()
                .filter(health_declaration::Column::CreatedAt.gte(start_of_today()))
                .count(&self.db),
        )
        .map_err(AppError::storage("Failed to get statistics"))?;

        Ok(DeclarationStats {
            total,
            pending,
            approved,
            rejected,
            today_submissions,
        })
    }
}
