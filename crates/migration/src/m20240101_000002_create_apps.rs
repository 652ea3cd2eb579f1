//! Create `apps` table.
//!
//! Client applications and the secret each one signs session tokens with.
//! Rows are provisioned out of band; the auth service only reads them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Apps::Table)
                    .if_not_exists()
                    .col(pk_auto(Apps::Id))
                    .col(string_len(Apps::Name, 128).unique_key().not_null())
                    .col(string_len(Apps::Secret, 255).not_null())
                    .col(timestamp_with_time_zone(Apps::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Apps::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Apps { Table, Id, Name, Secret, CreatedAt }
