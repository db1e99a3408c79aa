//! Migration: Create reservations table.
//!
//! `user_id`, `partner_id` and `pet_id` are plain references without
//! foreign keys.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Reservations::PartnerId).big_integer().not_null())
                    .col(ColumnDef::new(Reservations::PetId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Reservations::ServiceCategorical)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Reservations::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Reservations::CanceledAt).timestamp().null())
                    .col(ColumnDef::new(Reservations::ImageUrl).text().null())
                    .col(ColumnDef::new(Reservations::Content).string_len(2000).not_null())
                    .col(ColumnDef::new(Reservations::VetSpecialties).string_len(255).null())
                    .col(ColumnDef::new(Reservations::PetsitterWorks).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user_id")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reservations {
    Table,
    Id,
    UserId,
    PartnerId,
    PetId,
    ServiceCategorical,
    Status,
    CreatedAt,
    CanceledAt,
    ImageUrl,
    Content,
    VetSpecialties,
    PetsitterWorks,
}
