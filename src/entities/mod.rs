pub mod health_declaration;

pub use health_declaration::Entity as HealthDeclaration;
