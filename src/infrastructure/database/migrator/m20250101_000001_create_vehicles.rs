//! Create vehicles table
//!
//! Fleet vehicles with capacity tagging and a soft-delete flag.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Name).string().not_null())
                    .col(
                        ColumnDef::new(Vehicles::CapacityKg)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Vehicles::Tyres).integer().not_null())
                    .col(
                        ColumnDef::new(Vehicles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_capacity")
                    .table(Vehicles::Table)
                    .col(Vehicles::CapacityKg)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_is_active")
                    .table(Vehicles::Table)
                    .col(Vehicles::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Vehicles {
    Table,
    Id,
    Name,
    CapacityKg,
    Tyres,
    IsActive,
    CreatedAt,
}
