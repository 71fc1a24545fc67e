use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 transactions 表（账本，只追加）
        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transaction::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transaction::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Transaction::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transaction::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::Currency)
                            .string()
                            .not_null()
                            .default("NGN"),
                    )
                    .col(
                        ColumnDef::new(Transaction::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Transaction::Reference)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Transaction::Description).text().not_null())
                    .col(ColumnDef::new(Transaction::Metadata).json().null())
                    .col(
                        ColumnDef::new(Transaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transaction::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 余额汇总按 (user, status) 过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_user_status")
                    .table(Transaction::Table)
                    .col(Transaction::UserId)
                    .col(Transaction::Status)
                    .to_owned(),
            )
            .await?;

        // 创建 manual_deposits 表
        manager
            .create_table(
                Table::create()
                    .table(ManualDeposit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ManualDeposit::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ManualDeposit::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ManualDeposit::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ManualDeposit::DepositorName).string().not_null())
                    .col(ColumnDef::new(ManualDeposit::DepositDate).date().not_null())
                    .col(ColumnDef::new(ManualDeposit::ProofUrl).string().null())
                    .col(
                        ColumnDef::new(ManualDeposit::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(ManualDeposit::AdminNotes).text().null())
                    .col(ColumnDef::new(ManualDeposit::ReviewedBy).big_integer().null())
                    .col(
                        ColumnDef::new(ManualDeposit::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ManualDeposit::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 site_settings 表（单行配置）
        manager
            .create_table(
                Table::create()
                    .table(SiteSetting::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteSetting::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::Currency)
                            .string()
                            .not_null()
                            .default("NGN"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::CurrencyRate)
                            .decimal_len(10, 4)
                            .not_null()
                            .default("1.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::DepositFeePct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("1.5"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::TransferFeePct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("0.5"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::WithdrawFeePct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("1.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::WithdrawFixedFee)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("50.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::JobSaleFeePct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("2.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::CourseSaleFeePct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("3.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::ProductSaleFeePct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("2.5"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::MentorshipFeePct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("5.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::MinWithdrawalAmount)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("1000.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::ReferralCommissionPct)
                            .decimal_len(5, 2)
                            .not_null()
                            .default("5.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::ReferralSignupReward)
                            .decimal_len(12, 2)
                            .not_null()
                            .default("0.0"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::AutoApproveCommissions)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::DepositMode)
                            .string()
                            .not_null()
                            .default("manual"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::WithdrawalMode)
                            .string()
                            .not_null()
                            .default("manual"),
                    )
                    .col(ColumnDef::new(SiteSetting::ManualBankName).string().null())
                    .col(ColumnDef::new(SiteSetting::ManualAccountNumber).string().null())
                    .col(ColumnDef::new(SiteSetting::ManualAccountName).string().null())
                    .col(
                        ColumnDef::new(SiteSetting::AccountReferencePrefix)
                            .string()
                            .not_null()
                            .default("VINAJI"),
                    )
                    .col(ColumnDef::new(SiteSetting::DefaultBankCode).string().null())
                    .col(
                        ColumnDef::new(SiteSetting::PauseJobUploading)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::PauseCourseUploading)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::PauseAffiliates)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::SiteTitle)
                            .string()
                            .not_null()
                            .default("Vinaji NG"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::ContactEmail)
                            .string()
                            .not_null()
                            .default("support@vinaji.com"),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SiteSetting::UpdatedAt)
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
            .drop_table(Table::drop().table(SiteSetting::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ManualDeposit::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_transactions_user_status").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transaction::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Transaction {
    #[sea_orm(iden = "transactions")]
    Table,
    Id,
    UserId,
    Kind,
    Amount,
    Currency,
    Status,
    Reference,
    Description,
    Metadata,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum ManualDeposit {
    #[sea_orm(iden = "manual_deposits")]
    Table,
    Id,
    UserId,
    Amount,
    DepositorName,
    DepositDate,
    ProofUrl,
    Status,
    AdminNotes,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SiteSetting {
    #[sea_orm(iden = "site_settings")]
    Table,
    Id,
    Currency,
    CurrencyRate,
    DepositFeePct,
    TransferFeePct,
    WithdrawFeePct,
    WithdrawFixedFee,
    JobSaleFeePct,
    CourseSaleFeePct,
    ProductSaleFeePct,
    MentorshipFeePct,
    MinWithdrawalAmount,
    ReferralCommissionPct,
    ReferralSignupReward,
    AutoApproveCommissions,
    DepositMode,
    WithdrawalMode,
    ManualBankName,
    ManualAccountNumber,
    ManualAccountName,
    AccountReferencePrefix,
    DefaultBankCode,
    PauseJobUploading,
    PauseCourseUploading,
    PauseAffiliates,
    SiteTitle,
    ContactEmail,
    CreatedAt,
    UpdatedAt,
}
