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
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Users::DocumentType).string_len(2).not_null())
                    .col(ColumnDef::new(Users::DocumentId).string_len(15).not_null())
                    .col(ColumnDef::new(Users::City).string_len(100).not_null())
                    .col(ColumnDef::new(Users::State).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Users::ProfilePhoto).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One account per document, deactivated ones included
        manager
            .create_index(
                Index::create()
                    .name("idx_users_document")
                    .table(Users::Table)
                    .col(Users::DocumentType)
                    .col(Users::DocumentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_deleted_at")
                    .table(Users::Table)
                    .col(Users::DeletedAt)
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
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    DocumentType,
    DocumentId,
    City,
    State,
    Address,
    ProfilePhoto,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
