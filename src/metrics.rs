use crate::entities::health_declaration::DeclarationStatus;
use crate::store::DeclarationStore;

/// Seeds the per-status gauges from the database so they survive restarts.
pub async fn init_metrics(store: &DeclarationStore) {
    let stats = match store.stats().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::warn!("Skipping metric initialisation: {}", e);
            return;
        }
    };

    metrics::gauge!("health_declarations_total").set(stats.total as f64);
    for (status, count) in [
        (DeclarationStatus::Pending, stats.pending),
        (DeclarationStatus::Approved, stats.approved),
        (DeclarationStatus::Rejected, stats.rejected),
    ] {
        metrics::gauge!("health_declarations_by_status", "status" => status.as_str())
            .set(count as f64);
    }

    tracing::info!(
        "Initialized metrics: Total={}, Pending={}, Approved={}, Rejected={}",
        stats.total,
        stats.pending,
        stats.approved,
        stats.rejected
    );
}

pub fn record_created(status: DeclarationStatus) {
    metrics::counter!("health_declarations_submitted_total").increment(1);
    metrics::gauge!("health_declarations_total").increment(1.0);
    metrics::gauge!("health_declarations_by_status", "status" => status.as_str()).increment(1.0);
}

pub fn record_status_change(from: DeclarationStatus, to: DeclarationStatus) {
    metrics::counter!("health_declarations_updated_total").increment(1);
    if from != to {
        metrics::gauge!("health_declarations_by_status", "status" => from.as_str()).decrement(1.0);
        metrics::gauge!("health_declarations_by_status", "status" => to.as_str()).increment(1.0);
    }
}

pub fn record_deleted(status: DeclarationStatus) {
    metrics::counter!("health_declarations_deleted_total").increment(1);
    metrics::gauge!("health_declarations_total").decrement(1.0);
    metrics::gauge!("health_declarations_by_status", "status" => status.as_str()).decrement(1.0);
}
