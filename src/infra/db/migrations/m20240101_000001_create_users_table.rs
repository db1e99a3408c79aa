//! Migration: Create users table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(20).not_null())
                    .col(ColumnDef::new(Users::Nickname).string_len(50).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Gender).string_len(10).not_null())
                    .col(ColumnDef::new(Users::Birthdate).date().not_null())
                    .col(ColumnDef::new(Users::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Users::UserType).string_len(20).not_null())
                    .col(ColumnDef::new(Users::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Users::Tin).string_len(20).null())
                    .col(ColumnDef::new(Users::CaCategorical).string_len(10).null())
                    .col(ColumnDef::new(Users::VetSpecialty).string_len(30).null())
                    .col(ColumnDef::new(Users::PetsitterWork).string_len(30).null())
                    .col(ColumnDef::new(Users::WorkingDays).string_len(100).null())
                    .col(ColumnDef::new(Users::WorkingStartHours).string_len(8).null())
                    .col(ColumnDef::new(Users::WorkingEndHours).string_len(8).null())
                    .col(
                        ColumnDef::new(Users::LockedUntil)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::LastLoginAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Users::ProfileUrl).string_len(2048).null())
                    .col(ColumnDef::new(Users::FcmToken).string_len(512).null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Authoritative duplicate guard for concurrent signups
        manager
            .create_index(
                Index::create()
                    .name("uk_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Partner directory lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_users_user_type")
                    .table(Users::Table)
                    .col(Users::UserType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    Username,
    Nickname,
    Email,
    PasswordHash,
    Gender,
    Birthdate,
    Address,
    UserType,
    Status,
    Tin,
    CaCategorical,
    VetSpecialty,
    PetsitterWork,
    WorkingDays,
    WorkingStartHours,
    WorkingEndHours,
    LockedUntil,
    LastLoginAt,
    ProfileUrl,
    FcmToken,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
