//! Migration: Create pets table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pets::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Pets::Species).string_len(10).not_null())
                    .col(ColumnDef::new(Pets::SpeciesDetail).string_len(50).null())
                    .col(ColumnDef::new(Pets::Gender).string_len(10).not_null())
                    .col(ColumnDef::new(Pets::Birthdate).date().not_null())
                    .col(ColumnDef::new(Pets::Weight).decimal_len(4, 1).not_null())
                    .col(ColumnDef::new(Pets::AbitTypeCode).string_len(4).not_null())
                    .col(ColumnDef::new(Pets::ImageUrl).string_len(2048).null())
                    .col(ColumnDef::new(Pets::Name).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Pets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Pets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pets_user_id")
                            .from(Pets::Table, Pets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pets_user_id")
                    .table(Pets::Table)
                    .col(Pets::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Pets {
    Table,
    Id,
    UserId,
    Species,
    SpeciesDetail,
    Gender,
    Birthdate,
    Weight,
    AbitTypeCode,
    ImageUrl,
    Name,
    CreatedAt,
    UpdatedAt,
}
