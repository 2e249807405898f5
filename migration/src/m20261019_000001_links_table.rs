use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // MySQL 默认排序规则不区分大小写，短 ID 必须按字节比较
        let mut id_col = ColumnDef::new(Links::Id);
        match manager.get_database_backend() {
            DatabaseBackend::MySql => {
                id_col.custom(Alias::new("VARCHAR(16) CHARACTER SET ascii COLLATE ascii_bin"));
            }
            _ => {
                id_col.string_len(16);
            }
        }
        id_col.not_null().primary_key();

        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(id_col)
                    .col(ColumnDef::new(Links::Link).text().not_null())
                    .col(ColumnDef::new(Links::IdentityHash).string_len(40).null())
                    .col(ColumnDef::new(Links::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 按身份查询链接（/userlinks）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_identity_hash")
                    .table(Links::Table)
                    .col(Links::IdentityHash)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_created_at")
                    .table(Links::Table)
                    .col(Links::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_links_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_links_identity_hash").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
    Table,
    Id,
    Link,
    IdentityHash,
    CreatedAt,
}
