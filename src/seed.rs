use chrono::{Duration, NaiveDateTime, Utc};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

use crate::entities::health_declaration::{self, DeclarationStatus};
use crate::entities::HealthDeclaration;

struct Sample {
    name: &'static str,
    temperature: f64,
    symptoms: Option<&'static str>,
    contact_details: Option<&'static str>,
    status: DeclarationStatus,
    ip_address: &'static str,
    user_agent: &'static str,
    hours_ago: i64,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "John Smith",
        temperature: 36.5,
        symptoms: None,
        contact_details: None,
        status: DeclarationStatus::Approved,
        ip_address: "192.168.1.100",
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        hours_ago: 24,
    },
    Sample {
        name: "Jane Doe",
        temperature: 37.2,
        symptoms: Some("mild headache, fatigue"),
        contact_details: None,
        status: DeclarationStatus::Pending,
        ip_address: "192.168.1.101",
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
        hours_ago: 12,
    },
    Sample {
        name: "Mike Johnson",
        temperature: 38.5,
        symptoms: Some("fever, cough, body aches"),
        contact_details: Some("Family member tested positive 3 days ago"),
        status: DeclarationStatus::Rejected,
        ip_address: "192.168.1.102",
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15",
        hours_ago: 6,
    },
    Sample {
        name: "Sarah O'Connor",
        temperature: 36.8,
        symptoms: None,
        contact_details: Some("Colleague tested positive, wore a mask throughout"),
        status: DeclarationStatus::Pending,
        ip_address: "192.168.1.103",
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36",
        hours_ago: 2,
    },
    Sample {
        name: "Li Wei",
        temperature: 36.4,
        symptoms: None,
        contact_details: None,
        status: DeclarationStatus::Approved,
        ip_address: "192.168.1.104",
        user_agent: "Mozilla/5.0 (Linux; Android 14) AppleWebKit/537.36",
        hours_ago: 1,
    },
];

impl Sample {
    fn to_active_model(&self, now: NaiveDateTime) -> health_declaration::ActiveModel {
        let created_at = now - Duration::hours(self.hours_ago);
        health_declaration::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(self.name.to_string()),
            temperature: Set(self.temperature),
            has_symptoms: Set(self.symptoms.is_some()),
            symptoms: Set(self.symptoms.map(str::to_string)),
            has_contact: Set(self.contact_details.is_some()),
            contact_details: Set(self.contact_details.map(str::to_string)),
            status: Set(self.status),
            ip_address: Set(Some(self.ip_address.to_string())),
            user_agent: Set(Some(self.user_agent.to_string())),
            created_at: Set(created_at),
            updated_at: Set(created_at),
        }
    }
}

/// Inserts the sample declarations into an empty table.
///
/// Returns how many rows were written; zero when data already exists.
pub async fn run<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let existing = HealthDeclaration::find().count(db).await?;
    if existing > 0 {
        tracing::info!("Health declarations already seeded ({} rows), skipping", existing);
        return Ok(0);
    }

    let now = Utc::now().naive_utc();
    let models = SAMPLES.iter().map(|sample| sample.to_active_model(now));
    HealthDeclaration::insert_many(models).exec(db).await?;

    tracing::info!("Seeded {} health declarations", SAMPLES.len());
    Ok(SAMPLES.len() as u64)
}
