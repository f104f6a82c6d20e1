pub mod api;
pub mod app;
pub mod config;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod migrator;
pub mod payload;
pub mod seed;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use sea_orm;
