use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 交易流水按时间倒序分页
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_user_created")
                    .table(Transaction::Table)
                    .col(Transaction::UserId)
                    .col(Transaction::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 未读角标查询
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_user_read")
                    .table(Notification::Table)
                    .col(Notification::UserId)
                    .col(Notification::IsRead)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_notifications_user_read").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_transactions_user_created").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Transaction {
    #[sea_orm(iden = "transactions")]
    Table,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Notification {
    #[sea_orm(iden = "notifications")]
    Table,
    UserId,
    IsRead,
}
