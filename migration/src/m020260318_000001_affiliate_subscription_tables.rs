use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 referrals 表
        manager
            .create_table(
                Table::create()
                    .table(Referral::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Referral::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Referral::ReferrerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Referral::ReferredUserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Referral::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Referral::IsActive).boolean().not_null().default(true))
                    .to_owned(),
            )
            .await?;

        // 创建 affiliate_sales 表
        manager
            .create_table(
                Table::create()
                    .table(AffiliateSale::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AffiliateSale::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AffiliateSale::ReferralId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AffiliateSale::TransactionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateSale::CommissionAmount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateSale::CommissionRate)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateSale::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(AffiliateSale::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffiliateSale::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 subscription_plans 表
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPlan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionPlan::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlan::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SubscriptionPlan::Description).text().null())
                    .col(
                        ColumnDef::new(SubscriptionPlan::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlan::DurationDays)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(ColumnDef::new(SubscriptionPlan::Features).json().not_null())
                    .col(
                        ColumnDef::new(SubscriptionPlan::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlan::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlan::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 subscription_purchases 表
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPurchase::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionPurchase::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::PlanId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::AmountPaid)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::StartDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::EndDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::TransactionId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPurchase::PurchasedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 notifications 表
        manager
            .create_table(
                Table::create()
                    .table(Notification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notification::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notification::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Notification::Kind).string().not_null())
                    .col(ColumnDef::new(Notification::Title).string().not_null())
                    .col(ColumnDef::new(Notification::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notification::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notification::RelatedObjectId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Notification::RelatedObjectType).string().null())
                    .col(
                        ColumnDef::new(Notification::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notification::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubscriptionPurchase::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubscriptionPlan::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AffiliateSale::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Referral::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Referral {
    #[sea_orm(iden = "referrals")]
    Table,
    Id,
    ReferrerId,
    ReferredUserId,
    JoinedAt,
    IsActive,
}

#[derive(DeriveIden)]
enum AffiliateSale {
    #[sea_orm(iden = "affiliate_sales")]
    Table,
    Id,
    ReferralId,
    TransactionId,
    CommissionAmount,
    CommissionRate,
    Status,
    CreatedAt,
    PaidAt,
}

#[derive(DeriveIden)]
enum SubscriptionPlan {
    #[sea_orm(iden = "subscription_plans")]
    Table,
    Id,
    Name,
    Description,
    Price,
    DurationDays,
    Features,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubscriptionPurchase {
    #[sea_orm(iden = "subscription_purchases")]
    Table,
    Id,
    UserId,
    PlanId,
    AmountPaid,
    Status,
    StartDate,
    EndDate,
    TransactionId,
    PurchasedAt,
}

#[derive(DeriveIden)]
enum Notification {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    UserId,
    Kind,
    Title,
    Message,
    IsRead,
    RelatedObjectId,
    RelatedObjectType,
    CreatedAt,
}
