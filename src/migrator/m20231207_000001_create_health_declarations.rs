use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HealthDeclarations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HealthDeclarations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HealthDeclarations::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HealthDeclarations::Temperature)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HealthDeclarations::HasSymptoms)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(HealthDeclarations::Symptoms).text())
                    .col(
                        ColumnDef::new(HealthDeclarations::HasContact)
                            .boolean()
                            .default(false)
                            .not_null(),
                    )
                    .col(ColumnDef::new(HealthDeclarations::ContactDetails).text())
                    .col(
                        ColumnDef::new(HealthDeclarations::Status)
                            .string_len(16)
                            .default("pending")
                            .not_null(),
                    )
                    // Long enough for a textual IPv6 address.
                    .col(ColumnDef::new(HealthDeclarations::IpAddress).string_len(45))
                    .col(ColumnDef::new(HealthDeclarations::UserAgent).text())
                    .col(
                        ColumnDef::new(HealthDeclarations::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HealthDeclarations::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes backing the list view's sort and filter columns
        for (name, column) in [
            ("idx_health_declarations_created_at", HealthDeclarations::CreatedAt),
            ("idx_health_declarations_name", HealthDeclarations::Name),
            ("idx_health_declarations_status", HealthDeclarations::Status),
            ("idx_health_declarations_temperature", HealthDeclarations::Temperature),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(HealthDeclarations::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HealthDeclarations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HealthDeclarations {
    Table,
    Id,
    Name,
    Temperature,
    HasSymptoms,
    Symptoms,
    HasContact,
    ContactDetails,
    Status,
    IpAddress,
    UserAgent,
    CreatedAt,
    UpdatedAt,
}
