use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 kyc_verifications 表
        manager
            .create_table(
                Table::create()
                    .table(KycVerification::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KycVerification::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(KycVerification::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(KycVerification::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(KycVerification::IdType).string().not_null())
                    .col(ColumnDef::new(KycVerification::IdNumber).string().not_null())
                    .col(
                        ColumnDef::new(KycVerification::LegalFirstName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KycVerification::LegalLastName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(KycVerification::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(KycVerification::Address).text().not_null())
                    .col(ColumnDef::new(KycVerification::City).string().not_null())
                    .col(ColumnDef::new(KycVerification::State).string().not_null())
                    .col(
                        ColumnDef::new(KycVerification::Country)
                            .string()
                            .not_null()
                            .default("Nigeria"),
                    )
                    .col(ColumnDef::new(KycVerification::PostalCode).string().null())
                    .col(
                        ColumnDef::new(KycVerification::IdDocumentFrontUrl)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(KycVerification::IdDocumentBackUrl)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(KycVerification::SelfieUrl).string().null())
                    .col(
                        ColumnDef::new(KycVerification::ProviderCustomerReference)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(KycVerification::ProvisioningError)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(KycVerification::RejectionReason).text().null())
                    .col(
                        ColumnDef::new(KycVerification::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(KycVerification::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(KycVerification::ReviewedBy).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // 创建 virtual_accounts 表
        manager
            .create_table(
                Table::create()
                    .table(VirtualAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VirtualAccount::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VirtualAccount::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(VirtualAccount::AccountNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(VirtualAccount::AccountName).string().not_null())
                    .col(ColumnDef::new(VirtualAccount::BankName).string().not_null())
                    .col(ColumnDef::new(VirtualAccount::BankCode).string().not_null())
                    .col(ColumnDef::new(VirtualAccount::Reference).string().not_null())
                    .col(
                        ColumnDef::new(VirtualAccount::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(VirtualAccount::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VirtualAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VirtualAccount::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个用户每家银行只保留一个虚拟账户
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_virtual_accounts_user_bank")
                    .table(VirtualAccount::Table)
                    .col(VirtualAccount::UserId)
                    .col(VirtualAccount::BankCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // webhook 按 reference 定位账户
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_virtual_accounts_reference")
                    .table(VirtualAccount::Table)
                    .col(VirtualAccount::Reference)
                    .to_owned(),
            )
            .await?;

        // 创建 provider_banks 表
        manager
            .create_table(
                Table::create()
                    .table(ProviderBank::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderBank::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderBank::BankCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProviderBank::BankName).string().not_null())
                    .col(
                        ColumnDef::new(ProviderBank::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ProviderBank::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProviderBank::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 bank_preferences 表
        manager
            .create_table(
                Table::create()
                    .table(BankPreference::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankPreference::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankPreference::UserId).big_integer().not_null())
                    .col(ColumnDef::new(BankPreference::BankCode).string().not_null())
                    .col(
                        ColumnDef::new(BankPreference::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(BankPreference::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bank_preferences_user_bank")
                    .table(BankPreference::Table)
                    .col(BankPreference::UserId)
                    .col(BankPreference::BankCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_bank_preferences_user_bank").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankPreference::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProviderBank::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_virtual_accounts_reference").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_virtual_accounts_user_bank").to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VirtualAccount::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(KycVerification::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum KycVerification {
    #[sea_orm(iden = "kyc_verifications")]
    Table,
    Id,
    UserId,
    Status,
    IdType,
    IdNumber,
    LegalFirstName,
    LegalLastName,
    DateOfBirth,
    Address,
    City,
    State,
    Country,
    PostalCode,
    IdDocumentFrontUrl,
    IdDocumentBackUrl,
    SelfieUrl,
    ProviderCustomerReference,
    ProvisioningError,
    RejectionReason,
    SubmittedAt,
    ReviewedAt,
    ReviewedBy,
}

#[derive(DeriveIden)]
enum VirtualAccount {
    #[sea_orm(iden = "virtual_accounts")]
    Table,
    Id,
    UserId,
    AccountNumber,
    AccountName,
    BankName,
    BankCode,
    Reference,
    IsActive,
    IsPrimary,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProviderBank {
    #[sea_orm(iden = "provider_banks")]
    Table,
    Id,
    BankCode,
    BankName,
    IsActive,
    IsDefault,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BankPreference {
    #[sea_orm(iden = "bank_preferences")]
    Table,
    Id,
    UserId,
    BankCode,
    IsActive,
    CreatedAt,
}
