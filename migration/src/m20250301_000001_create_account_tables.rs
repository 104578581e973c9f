use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Email uniqueness lives in the schema; the store maps violations to a conflict
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::DisplayName).string().null())
                    .col(ColumnDef::new(Accounts::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Accounts::IsValid).boolean().not_null().default(false))
                    .col(ColumnDef::new(Accounts::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Accounts::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RevokedTokens::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RevokedTokens::TokenId).string().not_null().primary_key())
                    .col(ColumnDef::new(RevokedTokens::ExpiresAt).big_integer().null())
                    .col(ColumnDef::new(RevokedTokens::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Purge scans by expiry on every logout
        manager
            .create_index(
                Index::create()
                    .name("idx_revoked_tokens_expires_at")
                    .table(RevokedTokens::Table)
                    .col(RevokedTokens::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RevokedTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Email,
    PasswordHash,
    DisplayName,
    IsAdmin,
    IsValid,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RevokedTokens {
    Table,
    TokenId,
    ExpiresAt,
    CreatedAt,
}
